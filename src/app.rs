use std::sync::mpsc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::config::Config;
use crate::controller::PlayState;
use crate::models::VisualizationKind;
use crate::progress::{Progress, MAX_SCORE};
use crate::render::BrailleSurface;
use crate::session::{Completion, ConceptSession};
use crate::ui;

const MAX_SCORE_DIGITS: usize = 3;
const SPEED_STEP: f64 = 0.25;
const TILE_COLS: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Home,
    Concept(VisualizationKind),
}

const TABS: [Tab; 7] = [
    Tab::Home,
    Tab::Concept(VisualizationKind::Pendulum),
    Tab::Concept(VisualizationKind::Orbit),
    Tab::Concept(VisualizationKind::Spring),
    Tab::Concept(VisualizationKind::Wave),
    Tab::Concept(VisualizationKind::Field),
    Tab::Concept(VisualizationKind::QuantumParticle),
];

impl Tab {
    pub fn all() -> &'static [Tab] {
        &TABS
    }

    pub fn title(&self) -> String {
        match self {
            Tab::Home => " Home ".to_string(),
            Tab::Concept(kind) => format!(" {} ", kind.info().title),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Concept(kind) => kind.index() + 1,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_concept: usize,
    pub selected_param: usize,
    pub session: Option<ConceptSession<BrailleSurface>>,
    pub progress: Progress,
    pub show_progress: bool,
    // Score entry state
    pub entering_score: bool,
    pub score_buffer: String,
    resume_after_entry: bool,
    /// Content area of the last drawn frame; sizes the canvas of the next
    /// concept opened.
    pub content_area: Rect,
    config: Config,
    pending_start: Option<VisualizationKind>,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_concept: 0,
            selected_param: 0,
            session: None,
            progress: Progress::new(),
            show_progress: false,
            entering_score: false,
            score_buffer: String::new(),
            resume_after_entry: false,
            content_area: Rect::default(),
            pending_start: config.start_concept,
            config,
            completions_tx,
            completions_rx,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        // The configured start concept waits for the first layout
        if let Some(kind) = self.pending_start.take() {
            self.open_concept(kind, now);
        }
        if let Some(session) = self.session.as_mut() {
            session.frame(now);
        }
        self.drain_completions();
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Score entry intercepts all input
        if self.entering_score {
            self.handle_score_input(key, now);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab(now);
                } else {
                    self.next_tab(now);
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab(now);
                return;
            }
            KeyCode::Esc => {
                if self.show_progress {
                    self.show_progress = false;
                } else if matches!(self.current_tab, Tab::Concept(_)) {
                    self.go_home();
                }
                return;
            }
            _ => {}
        }

        match self.current_tab {
            Tab::Home => self.handle_home_input(key, now),
            Tab::Concept(_) => self.handle_concept_input(key, now),
        }
    }

    fn handle_home_input(&mut self, key: KeyEvent, now: Instant) {
        let count = VisualizationKind::all().len();
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&kind) = VisualizationKind::all().get(idx) {
                    self.selected_concept = idx;
                    self.open_concept(kind, now);
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_progress = !self.show_progress;
            }
            // Tiles are laid out in rows of three
            KeyCode::Right => self.selected_concept = (self.selected_concept + 1) % count,
            KeyCode::Left => self.selected_concept = (self.selected_concept + count - 1) % count,
            KeyCode::Down | KeyCode::Up => {
                self.selected_concept = (self.selected_concept + TILE_COLS) % count;
            }
            KeyCode::Enter => {
                if let Some(&kind) = VisualizationKind::all().get(self.selected_concept) {
                    self.open_concept(kind, now);
                }
            }
            _ => {}
        }
    }

    fn handle_concept_input(&mut self, key: KeyEvent, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let specs = session.params().specs();
        match key.code {
            KeyCode::Char(' ') => session.toggle(now),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = session.speed() + SPEED_STEP;
                session.set_speed(speed, now);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let speed = session.speed() - SPEED_STEP;
                session.set_speed(speed, now);
            }
            KeyCode::Up if !specs.is_empty() => {
                self.selected_param = (self.selected_param + specs.len() - 1) % specs.len();
            }
            KeyCode::Down if !specs.is_empty() => {
                self.selected_param = (self.selected_param + 1) % specs.len();
            }
            KeyCode::Left | KeyCode::Right => {
                if let Some(spec) = specs.get(self.selected_param) {
                    let steps = if key.code == KeyCode::Left { -1 } else { 1 };
                    session.nudge_parameter(spec.name, steps);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => session.reset(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.resume_after_entry = session.state() == PlayState::Running;
                session.pause(now);
                self.entering_score = true;
                self.score_buffer.clear();
            }
            _ => {}
        }
    }

    fn handle_score_input(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter => {
                let score = self.score_buffer.parse().unwrap_or(0);
                self.entering_score = false;
                self.score_buffer.clear();
                if let Some(session) = self.session.take() {
                    session.complete(score);
                }
                self.drain_completions();
                self.current_tab = Tab::Home;
                self.show_progress = true;
            }
            KeyCode::Backspace => {
                self.score_buffer.pop();
            }
            KeyCode::Esc => {
                self.entering_score = false;
                self.score_buffer.clear();
                if self.resume_after_entry {
                    if let Some(session) = self.session.as_mut() {
                        session.play(now);
                    }
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.score_buffer.len() < MAX_SCORE_DIGITS {
                    let candidate = format!("{}{}", self.score_buffer, c);
                    if candidate.parse::<u32>().is_ok_and(|v| v <= MAX_SCORE) {
                        self.score_buffer = candidate;
                    }
                }
            }
            _ => {}
        }
    }

    /// Tears down the current session, if any, and starts `kind`.
    pub fn open_concept(&mut self, kind: VisualizationKind, now: Instant) {
        if let Some(old) = self.session.take() {
            old.close();
        }

        let tx = self.completions_tx.clone();
        let mut session = ConceptSession::start(kind, move |completion| {
            // The receiver lives as long as the app
            let _ = tx.send(completion);
        });

        let canvas = ui::concept::canvas_area(self.content_area);
        let surface = if canvas.width > 0 && canvas.height > 0 {
            BrailleSurface::new(canvas.width, canvas.height)
        } else {
            let fallback = self.config.fallback_surface;
            BrailleSurface::from_pixels(fallback.width_px, fallback.height_px)
        };
        session.mount(surface);
        session.set_speed(self.config.initial_speed, now);
        if self.config.autoplay {
            session.play(now);
        }

        info!(concept = kind.id(), "concept opened");
        self.session = Some(session);
        self.selected_param = 0;
        self.selected_concept = kind.index();
        self.current_tab = Tab::Concept(kind);
    }

    fn go_home(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        self.current_tab = Tab::Home;
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.progress.record(completion) {
                debug!(concept = completion.concept.id(), "new best score");
            }
        }
    }

    fn switch_to(&mut self, tab: Tab, now: Instant) {
        match tab {
            Tab::Home => self.go_home(),
            Tab::Concept(kind) => self.open_concept(kind, now),
        }
    }

    fn next_tab(&mut self, now: Instant) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()], now);
    }

    fn prev_tab(&mut self, now: Instant) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()], now);
    }
}
