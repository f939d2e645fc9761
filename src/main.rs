use std::io;
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use physviz::app::App;
use physviz::config::Config;
use physviz::event::{Event, EventHandler};
use physviz::{logging, ui};

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    let _log_guard = logging::init(&config).context("initialising logging")?;
    info!(tick_rate_ms = config.tick_rate_ms, "physviz starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(config.tick_rate_ms);
    let mut app = App::new(config);
    let result = run(&mut terminal, &mut app, &event_handler);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("physviz exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("drawing frame")?;

        match events.next().context("event channel closed")? {
            Event::Tick(now) => app.on_tick(now),
            Event::Key(key) => app.on_key(key, Instant::now()),
        }

        if app.should_quit {
            // Dropping the session tears it down
            app.session = None;
            return Ok(());
        }
    }
}
