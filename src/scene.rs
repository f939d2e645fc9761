//! Per-frame drawable primitives in surface pixel coordinates.
//!
//! A [`Scene`] is rebuilt from scratch every frame and dropped once it has
//! been drawn; nothing in here is retained between frames.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `radius` and `angle` (radians) around `self`.
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        self.offset(radius * angle.cos(), radius * angle.sin())
    }
}

/// Pixel dimensions of the surface a scene is laid out for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width && p.y < self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    /// Guide references: equilibrium lines, axes, paths.
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle {
        center: Point,
        radius: f64,
        color: Color,
        filled: bool,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        color: Color,
    },
    Label {
        at: Point,
        text: String,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            primitives: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn disc(&mut self, center: Point, radius: f64, color: Color) {
        self.push(Primitive::Circle { center, radius, color, filled: true });
    }

    pub fn ring(&mut self, center: Point, radius: f64, color: Color) {
        self.push(Primitive::Circle { center, radius, color, filled: false });
    }

    pub fn line(&mut self, from: Point, to: Point, color: Color) {
        self.push(Primitive::Line { from, to, color, stroke: Stroke::Solid });
    }

    pub fn dashed_line(&mut self, from: Point, to: Point, color: Color) {
        self.push(Primitive::Line { from, to, color, stroke: Stroke::Dashed });
    }

    pub fn polyline(&mut self, points: Vec<Point>, color: Color, stroke: Stroke) {
        if points.len() >= 2 {
            self.push(Primitive::Polyline { points, color, stroke });
        }
    }

    pub fn polygon(&mut self, points: Vec<Point>, color: Color) {
        if points.len() >= 3 {
            self.push(Primitive::Polygon { points, color });
        }
    }

    pub fn label(&mut self, at: Point, text: impl Into<String>, color: Color) {
        self.push(Primitive::Label { at, text: text.into(), color });
    }

    /// Line with a small two-stroke arrowhead at `to`.
    pub fn arrow(&mut self, from: Point, to: Point, color: Color) {
        self.line(from, to, color);
        let heading = (to.y - from.y).atan2(to.x - from.x);
        let head = 4.0;
        for wing in [2.6, -2.6] {
            self.line(to, to.polar(head, heading + wing), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shapes_are_dropped() {
        let mut scene = Scene::new(Color::Black);
        scene.polyline(vec![Point::new(0.0, 0.0)], Color::White, Stroke::Solid);
        scene.polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], Color::White);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_viewport_contains_is_half_open() {
        let vp = Viewport::new(10, 8);
        assert!(vp.contains(Point::new(0.0, 0.0)));
        assert!(vp.contains(Point::new(9.9, 7.9)));
        assert!(!vp.contains(Point::new(10.0, 4.0)));
        assert!(!vp.contains(Point::new(-0.1, 4.0)));
    }

    #[test]
    fn test_arrow_adds_head() {
        let mut scene = Scene::new(Color::Black);
        scene.arrow(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Color::White);
        assert_eq!(scene.len(), 3);
    }
}
