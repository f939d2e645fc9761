use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::controller::PlayState;
use crate::models::BACKGROUND;
use crate::params::ParamSpec;
use crate::render::BrailleSurface;
use crate::session::ConceptSession;

const SIDE_PANEL_WIDTH: u16 = 36;
const PARAM_PANEL_HEIGHT: u16 = 14;

struct ConceptLayout {
    status: Rect,
    canvas: Rect,
    params: Rect,
    explanation: Rect,
    help: Rect,
}

fn outer_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 180, 255)))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn canvas_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(Color::Rgb(50, 60, 90)))
        .style(Style::default().bg(BACKGROUND))
}

fn layout(area: Rect) -> ConceptLayout {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Min(6),    // Canvas + side panel
            Constraint::Length(1), // Help
        ])
        .split(inner);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),                   // Canvas
            Constraint::Length(SIDE_PANEL_WIDTH), // Parameters + explanation
        ])
        .split(rows[1]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PARAM_PANEL_HEIGHT),
            Constraint::Min(4),
        ])
        .split(middle[1]);
    ConceptLayout {
        status: rows[0],
        canvas: middle[0],
        params: side[0],
        explanation: side[1],
        help: rows[2],
    }
}

/// Cells available for the drawing surface when a concept fills `area`.
pub fn canvas_area(area: Rect) -> Rect {
    canvas_block().inner(layout(area).canvas)
}

pub fn render_concept(
    frame: &mut Frame,
    area: Rect,
    session: &ConceptSession<BrailleSurface>,
    selected_param: usize,
) {
    let info = session.info();
    let block = outer_block(format!(" {} {} ", info.icon, info.title), info.color);
    frame.render_widget(block, area);
    let parts = layout(area);

    render_status(frame, parts.status, session);

    // Canvas: the surface keeps the size it was mounted with, anything that
    // no longer fits is clipped by the paragraph
    let canvas = canvas_block();
    let canvas_inner = canvas.inner(parts.canvas);
    frame.render_widget(canvas, parts.canvas);
    if let Some(surface) = session.surface() {
        frame.render_widget(Paragraph::new(surface.to_lines()), canvas_inner);
    }

    render_params(frame, parts.params, session, selected_param);

    let mut lines: Vec<Line> = Vec::new();
    for text in info.explanation {
        lines.push(Line::from(Span::styled(*text, Style::default().fg(Color::Rgb(180, 180, 200)))));
        lines.push(Line::from(""));
    }
    let explanation = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(" 📖 About ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(explanation, parts.explanation);

    render_help(frame, parts.help, session.state());
}

fn render_status(frame: &mut Frame, area: Rect, session: &ConceptSession<BrailleSurface>) {
    let state = session.state();
    let state_color = match state {
        PlayState::Running => Color::Rgb(80, 255, 80),
        PlayState::Paused => Color::Yellow,
        PlayState::Stopped => Color::Rgb(140, 140, 160),
    };
    let status = Line::from(vec![
        Span::styled(
            format!("[{}] ", state.label()),
            Style::default().fg(state_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("t = {:.2}s ", session.elapsed()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Speed: ×{:.2} ", session.speed()),
            Style::default().fg(Color::Rgb(255, 200, 80)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Frames: {} ", session.frames_rendered()),
            Style::default().fg(Color::Rgb(100, 100, 140)),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

fn slider(spec: &ParamSpec, value: f64, width: usize) -> String {
    let filled = ((spec.fraction(value) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_params(
    frame: &mut Frame,
    area: Rect,
    session: &ConceptSession<BrailleSurface>,
    selected_param: usize,
) {
    let params = session.params();
    let bar_w = (area.width as usize).saturating_sub(6).min(28);
    let mut lines: Vec<Line> = Vec::new();

    for (i, spec) in params.specs().iter().enumerate() {
        let value = params.get(spec.name).unwrap_or(spec.default);
        let selected = i == selected_param;
        let marker = if selected { "▶ " } else { "  " };
        let label_color = if selected { Color::Rgb(255, 255, 255) } else { Color::Rgb(140, 140, 160) };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{:<12}", spec.label),
                Style::default().fg(label_color).add_modifier(if selected { Modifier::BOLD } else { Modifier::empty() }),
            ),
            Span::styled(
                format!("{:>7.2} {}", value, spec.unit),
                Style::default().fg(Color::Rgb(80, 200, 255)),
            ),
        ]));
        let bar_color = if selected { Color::Rgb(255, 200, 80) } else { Color::Rgb(60, 80, 110) };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(slider(spec, value, bar_w), Style::default().fg(bar_color)),
        ]));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 180, 140)))
            .title(" 🎛 Parameters ")
            .title_style(Style::default().fg(Color::Rgb(80, 255, 200)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(panel, area);
}

fn render_help(frame: &mut Frame, area: Rect, state: PlayState) {
    let (label, color) = match state {
        PlayState::Running => (" SPACE: pause ", Color::Green),
        PlayState::Paused | PlayState::Stopped => (" SPACE: play ", Color::Yellow),
    };
    let help = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().fg(color)),
        Span::styled(
            "│ +/- Speed │ ↑↓ Param │ ←→ Adjust │ R Reset │ C Complete │ Tab Next │ Esc Close",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(help, area);
}
