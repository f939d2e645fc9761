use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::models::{ModelInfo, VisualizationKind, REGISTRY};
use crate::progress::Progress;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║  ██████╗  ██╗  ██╗ ██╗   ██╗ ███████╗ ██╗   ██╗ ██╗ ███████╗  ║
 ║  ██╔══██╗ ██║  ██║ ╚██╗ ██╔╝ ██╔════╝ ██║   ██║ ██║ ╚══███╔╝  ║
 ║  ██████╔╝ ███████║  ╚████╔╝  ███████╗ ██║   ██║ ██║   ███╔╝   ║
 ║  ██╔═══╝  ██╔══██║   ╚██╔╝   ╚════██║ ╚██╗ ██╔╝ ██║  ███╔╝    ║
 ║  ██║      ██║  ██║    ██║    ███████║  ╚████╔╝  ██║ ███████╗  ║
 ║  ╚═╝      ╚═╝  ╚═╝    ╚═╝    ╚══════╝   ╚═══╝   ╚═╝ ╚══════╝  ║
 ╚═══════════════════════════════════════════════════════════════╝"#;

const TILE_COLS: usize = 3;

/// Half-brightness version of a tile colour, used for its border.
fn dim(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        other => other,
    }
}

fn render_concept_tile(frame: &mut Frame, area: Rect, info: &ModelInfo, selected: bool, best: Option<u32>) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { dim(info.color) };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let mut lines: Vec<Line> = Vec::new();

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { info.color };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", info.kind.index() + 1), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", info.icon), Style::default()),
        Span::styled(info.title, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ]));

    for summary_line in info.summary.split('\n') {
        lines.push(Line::from(vec![
            Span::styled(summary_line, Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) })),
        ]));
    }

    if let Some(best) = best {
        lines.push(Line::from(vec![
            Span::styled(format!("✓ best {}", best), Style::default().fg(Color::Rgb(80, 200, 120))),
        ]));
    } else if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ Enter to explore", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn concept_details(info: &ModelInfo) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} {}", info.icon, info.title), Style::default().fg(info.color).add_modifier(Modifier::BOLD)),
        ]),
    ];
    if let Some(first) = info.explanation.first() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", first), Style::default().fg(Color::Rgb(100, 100, 120))),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Parameters", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
    ]));
    for spec in info.params {
        let (lo, hi) = spec.range();
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<16}", spec.label), Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled(
                format!("{} {}  ({:.2} to {:.2})", spec.default, spec.unit, lo, hi),
                Style::default().fg(Color::Rgb(140, 140, 140)),
            ),
        ]));
    }
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_concept: usize, show_progress: bool, progress: &Progress) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(12), // Concept tiles (2 rows)
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled(
            "  ⚡ Physics You Can Poke At ⚡  ",
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let concepts_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🔬 Concepts: ↑↓←→ Select, Enter to Explore ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let concepts_inner = concepts_block.inner(chunks[2]);
    frame.render_widget(concepts_block, chunks[2]);

    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(concepts_inner);

    for (row, row_area) in tile_rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(*row_area);
        for (col, tile_area) in cols.iter().enumerate() {
            let idx = row * TILE_COLS + col;
            if let Some(info) = REGISTRY.get(idx) {
                render_concept_tile(frame, *tile_area, info, selected_concept == idx, progress.best(info.kind));
            }
        }
    }

    // Controls area: navigation left, selected concept right
    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Rgb(80, 200, 255)));
    let desc = |d: &'static str| Span::styled(d, Style::default().fg(Color::Rgb(140, 140, 140)));
    let controls = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![key("    Tab / Shift+Tab  "), desc("Switch concept")]),
        Line::from(vec![key("    1-6              "), desc("Open concept")]),
        Line::from(vec![key("    ↑ ↓ ← →         "), desc("Select concept")]),
        Line::from(vec![key("    Enter            "), desc("Open selected")]),
        Line::from(vec![key("    Esc              "), desc("Return to Home")]),
        Line::from(vec![key("    q / Ctrl+C       "), desc("Quit")]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  🎛 In a concept", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![key("    Space            "), desc("Play / Pause")]),
        Line::from(vec![key("    + / -            "), desc("Speed")]),
        Line::from(vec![key("    ↑ ↓  ← →         "), desc("Pick / adjust parameter")]),
        Line::from(vec![key("    R                "), desc("Reset parameters")]),
        Line::from(vec![key("    C                "), desc("Mark complete")]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let selected = VisualizationKind::all()
        .get(selected_concept)
        .copied()
        .unwrap_or(VisualizationKind::Pendulum)
        .info();
    let details = Paragraph::new(concept_details(selected))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
                .title(format!(" {} {} ", selected.icon, selected.title))
                .title_style(Style::default().fg(selected.color).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(details, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled(
            format!("{}/{} explored", progress.completed_count(), REGISTRY.len()),
            Style::default().fg(Color::Rgb(80, 200, 120)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" Progress", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if show_progress {
        render_progress_overlay(frame, area, progress);
    }
}

fn render_progress_overlay(frame: &mut Frame, area: Rect, progress: &Progress) {
    let overlay_w = 46u16.min(area.width.saturating_sub(4));
    let overlay_h = 24u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Progress ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines: Vec<Line> = vec![Line::from("")];

    for (kind, entry) in progress.entries() {
        let info = kind.info();
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", info.icon), Style::default()),
            Span::styled(info.title, Style::default().fg(info.color).add_modifier(Modifier::BOLD)),
        ]));
        match entry {
            Some(entry) => lines.push(Line::from(vec![
                Span::styled("    ✓ best ", Style::default().fg(Color::Rgb(80, 200, 120))),
                Span::styled(
                    format!("{}", entry.best),
                    Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} attempt{})", entry.attempts, if entry.attempts == 1 { "" } else { "s" }),
                    Style::default().fg(Color::Rgb(100, 100, 130)),
                ),
            ])),
            None => lines.push(Line::from(vec![
                Span::styled("    Not explored yet", Style::default().fg(Color::Rgb(60, 60, 80))),
            ])),
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
