//! Rasterises scenes onto a drawing surface.
//!
//! The terminal surface packs 2×4 pixels into every cell using braille
//! glyphs, so one cell can show up to eight dots in a single colour.

use ratatui::prelude::*;

use crate::scene::{Point, Primitive, Scene, Stroke, Viewport};

/// Dash length in pixels for guide strokes (on, then off).
const DASH: usize = 3;

/// A raster the renderer can paint on. Dimensions are fixed for the
/// lifetime of the surface.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, background: Color);
    fn plot(&mut self, x: i32, y: i32, color: Color);
    /// Text anchored at the cell containing pixel `(x, y)`.
    fn label(&mut self, x: i32, y: i32, text: &str, color: Color);

    fn viewport(&self) -> Viewport {
        let (w, h) = self.size();
        Viewport::new(w, h)
    }

    fn is_empty(&self) -> bool {
        let (w, h) = self.size();
        w == 0 || h == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn { primitives: usize },
    /// Zero-size surface; nothing was touched.
    Skipped,
}

/// Repaints the whole surface with `scene`.
pub fn draw<S: Surface + ?Sized>(surface: &mut S, scene: &Scene) -> RenderOutcome {
    if surface.is_empty() {
        return RenderOutcome::Skipped;
    }
    surface.clear(scene.background);
    for primitive in &scene.primitives {
        draw_primitive(surface, primitive);
    }
    RenderOutcome::Drawn { primitives: scene.len() }
}

fn draw_primitive<S: Surface + ?Sized>(surface: &mut S, primitive: &Primitive) {
    match primitive {
        Primitive::Circle { center, radius, color, filled: true } => {
            fill_circle(surface, *center, *radius, *color)
        }
        Primitive::Circle { center, radius, color, filled: false } => {
            stroke_circle(surface, *center, *radius, *color)
        }
        Primitive::Line { from, to, color, stroke } => {
            let mut dash = 0;
            stroke_segment(surface, *from, *to, *color, *stroke, &mut dash);
        }
        Primitive::Polyline { points, color, stroke } => {
            let mut dash = 0;
            for pair in points.windows(2) {
                stroke_segment(surface, pair[0], pair[1], *color, *stroke, &mut dash);
            }
        }
        Primitive::Polygon { points, color } => fill_polygon(surface, points, *color),
        Primitive::Label { at, text, color } => {
            surface.label(at.x.round() as i32, at.y.round() as i32, text, *color)
        }
    }
}

fn pixel(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Bresenham cells from `(x0, y0)` to `(x1, y1)`, both ends included.
pub fn line_cells(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cx = x0;
    let mut cy = y0;
    loop {
        cells.push((cx, cy));
        if cx == x1 && cy == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; cx += sx; }
        if e2 <= dx { err += dx; cy += sy; }
    }
    cells
}

/// `dash` carries the pattern phase across the segments of a polyline.
fn stroke_segment<S: Surface + ?Sized>(
    surface: &mut S,
    from: Point,
    to: Point,
    color: Color,
    stroke: Stroke,
    dash: &mut usize,
) {
    let (x0, y0) = pixel(from);
    let (x1, y1) = pixel(to);
    let (w, h) = surface.size();
    // Segments far outside the surface would only burn cycles
    let limit = 4 * (w.max(h) as i32 + 1);
    if [x0, y0, x1, y1].iter().any(|v| v.abs() > limit) {
        return;
    }
    for (x, y) in line_cells(x0, y0, x1, y1) {
        let on = match stroke {
            Stroke::Solid => true,
            Stroke::Dashed => (*dash / DASH) % 2 == 0,
        };
        if on {
            surface.plot(x, y, color);
        }
        *dash += 1;
    }
}

fn fill_circle<S: Surface + ?Sized>(surface: &mut S, center: Point, radius: f64, color: Color) {
    let r = radius.max(0.5);
    let (cx, cy) = pixel(center);
    let reach = r.ceil() as i32;
    for dy in -reach..=reach {
        let span = (r * r - (dy * dy) as f64).max(0.0).sqrt().round() as i32;
        if (dy * dy) as f64 > r * r {
            continue;
        }
        for dx in -span..=span {
            surface.plot(cx + dx, cy + dy, color);
        }
    }
}

fn stroke_circle<S: Surface + ?Sized>(surface: &mut S, center: Point, radius: f64, color: Color) {
    let segments = ((std::f64::consts::TAU * radius).ceil() as usize).max(12);
    let mut dash = 0;
    let mut prev = center.polar(radius, 0.0);
    for i in 1..=segments {
        let next = center.polar(radius, std::f64::consts::TAU * i as f64 / segments as f64);
        stroke_segment(surface, prev, next, color, Stroke::Solid, &mut dash);
        prev = next;
    }
}

/// Even-odd scanline fill sampled at pixel centres, plus the outline so
/// slivers thinner than a pixel still show.
fn fill_polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Point], color: Color) {
    if points.len() < 3 {
        return;
    }
    let (_, h) = surface.size();
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor().max(0.0) as i32;
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil().min(h as f64) as i32;

    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y..max_y {
        let sy = y as f64 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks(2) {
            if let [start, end] = pair {
                let x0 = (start - 0.5).ceil() as i32;
                let x1 = (end - 0.5).floor() as i32;
                for x in x0..=x1 {
                    surface.plot(x, y, color);
                }
            }
        }
    }

    let mut dash = 0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        stroke_segment(surface, a, b, color, Stroke::Solid, &mut dash);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    bits: u8,
    color: Color,
    glyph: Option<char>,
}

/// Terminal raster: each cell holds a braille pattern (or a label glyph)
/// and one foreground colour. The last colour plotted in a cell wins.
#[derive(Debug, Clone)]
pub struct BrailleSurface {
    cols: usize,
    rows: usize,
    background: Color,
    cells: Vec<Cell>,
}

impl BrailleSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        let background = Color::Reset;
        Self {
            cols,
            rows,
            background,
            cells: vec![Cell { bits: 0, color: background, glyph: None }; cols * rows],
        }
    }

    /// Largest surface that fits in `width` × `height` pixels.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        let cols = (width / 2).min(u16::MAX as u32) as u16;
        let rows = (height / 4).min(u16::MAX as u32) as u16;
        Self::new(cols, rows)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (0, 3) => 0x40,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    pub fn is_set(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
            return false;
        }
        let cell = &self.cells[(y as usize / 4) * self.cols + x as usize / 2];
        cell.bits & Self::braille_bit(x as usize % 2, y as usize % 4) != 0
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<Color> {
        if !self.is_set(x, y) {
            return None;
        }
        Some(self.cells[(y as usize / 4) * self.cols + x as usize / 2].color)
    }

    pub fn lit_pixels(&self) -> usize {
        self.cells.iter().map(|c| c.bits.count_ones() as usize).sum()
    }

    /// One `Line` per cell row, runs of equal style merged into one span.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.rows)
            .map(|row| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut run = String::new();
                let mut run_style: Option<Style> = None;
                for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                    let ch = match cell.glyph {
                        Some(g) => g,
                        None if cell.bits != 0 => char::from_u32(0x2800 + cell.bits as u32).unwrap_or(' '),
                        None => ' ',
                    };
                    let style = Style::default().fg(cell.color).bg(self.background);
                    if run_style.is_some_and(|s| s != style) {
                        spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
                    }
                    run_style = Some(style);
                    run.push(ch);
                }
                if let Some(style) = run_style {
                    spans.push(Span::styled(run, style));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Surface for BrailleSurface {
    fn size(&self) -> (u32, u32) {
        ((self.cols * 2) as u32, (self.rows * 4) as u32)
    }

    fn clear(&mut self, background: Color) {
        self.background = background;
        for cell in &mut self.cells {
            *cell = Cell { bits: 0, color: background, glyph: None };
        }
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x as u32 >= w || y as u32 >= h {
            return;
        }
        let cell = &mut self.cells[(y as usize / 4) * self.cols + x as usize / 2];
        cell.bits |= Self::braille_bit(x as usize % 2, y as usize % 4);
        cell.color = color;
    }

    fn label(&mut self, x: i32, y: i32, text: &str, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let row = y as usize / 4;
        if row >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let col = x as usize / 2 + i;
            if col >= self.cols {
                break;
            }
            let cell = &mut self.cells[row * self.cols + col];
            cell.glyph = Some(ch);
            cell.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_dimensions() {
        let s = BrailleSurface::new(10, 5);
        assert_eq!(s.size(), (20, 20));
        let s = BrailleSurface::from_pixels(41, 23);
        assert_eq!((s.cols(), s.rows()), (20, 5));
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let mut s = BrailleSurface::new(20, 10);
        let mut first = Scene::new(Color::Black);
        first.disc(Point::new(10.0, 10.0), 3.0, Color::Red);
        draw(&mut s, &first);
        assert!(s.is_set(10, 10));

        let mut second = Scene::new(Color::Black);
        second.disc(Point::new(30.0, 30.0), 3.0, Color::Red);
        draw(&mut s, &second);
        assert!(!s.is_set(10, 10));
        assert!(s.is_set(30, 30));
    }

    #[test]
    fn test_zero_size_surface_is_skipped() {
        let mut s = BrailleSurface::new(0, 0);
        let scene = Scene::new(Color::Black);
        assert_eq!(draw(&mut s, &scene), RenderOutcome::Skipped);
    }

    #[test]
    fn test_solid_line_covers_endpoints() {
        let mut s = BrailleSurface::new(20, 10);
        let mut scene = Scene::new(Color::Black);
        scene.line(Point::new(2.0, 3.0), Point::new(30.0, 17.0), Color::Green);
        draw(&mut s, &scene);
        assert!(s.is_set(2, 3));
        assert!(s.is_set(30, 17));
        assert_eq!(s.lit_pixels(), line_cells(2, 3, 30, 17).len());
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut s = BrailleSurface::new(20, 4);
        let mut scene = Scene::new(Color::Black);
        scene.dashed_line(Point::new(0.0, 5.0), Point::new(35.0, 5.0), Color::Gray);
        draw(&mut s, &scene);
        assert!(s.is_set(0, 5));
        assert!(!s.is_set(DASH as i32, 5));
        assert_eq!(s.lit_pixels(), 18);
    }

    #[test]
    fn test_filled_polygon_interior() {
        let mut s = BrailleSurface::new(20, 10);
        let mut scene = Scene::new(Color::Black);
        scene.polygon(
            vec![
                Point::new(5.0, 5.0),
                Point::new(25.0, 5.0),
                Point::new(25.0, 25.0),
                Point::new(5.0, 25.0),
            ],
            Color::Blue,
        );
        draw(&mut s, &scene);
        assert!(s.is_set(15, 15));
        assert!(s.is_set(6, 24));
        assert!(!s.is_set(30, 15));
        assert_eq!(s.color_at(15, 15), Some(Color::Blue));
    }

    #[test]
    fn test_filled_circle_radius() {
        let mut s = BrailleSurface::new(20, 10);
        let mut scene = Scene::new(Color::Black);
        scene.disc(Point::new(20.0, 20.0), 4.0, Color::Yellow);
        draw(&mut s, &scene);
        assert!(s.is_set(20, 20));
        assert!(s.is_set(24, 20));
        assert!(s.is_set(20, 16));
        assert!(!s.is_set(25, 20));
        assert!(!s.is_set(24, 24));
    }

    #[test]
    fn test_plot_outside_is_ignored() {
        let mut s = BrailleSurface::new(4, 4);
        s.plot(-1, 0, Color::White);
        s.plot(8, 0, Color::White);
        s.plot(0, 16, Color::White);
        assert_eq!(s.lit_pixels(), 0);
    }

    #[test]
    fn test_lines_merge_equal_styles() {
        let mut s = BrailleSurface::new(6, 1);
        s.clear(Color::Black);
        s.plot(0, 0, Color::Red);
        s.label(8, 0, "+", Color::White);
        let lines = s.to_lines();
        assert_eq!(lines.len(), 1);
        let text: String = lines[0].spans.iter().map(|sp| sp.content.as_ref()).collect();
        assert_eq!(text.chars().count(), 6);
        assert_eq!(text.chars().next(), Some('\u{2801}'));
        assert_eq!(text.chars().nth(4), Some('+'));
    }
}
