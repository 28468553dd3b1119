use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::{load_config, resolve_log_dir, resolve_store_path, store_options};
use crate::io::logging;
use crate::io::store::Store;
use crate::session::Session;

use super::input;
use super::render;
use super::theme::Theme;

/// Everything the interactive session needs: state, storage, colors
pub struct App {
    pub session: Session,
    pub store: Store,
    pub theme: Theme,
}

impl App {
    pub fn new(session: Session, store: Store, theme: Theme) -> Self {
        App {
            session,
            store,
            theme,
        }
    }
}

/// Run the TUI application
pub fn run(config_path: Option<&Path>, db: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let _log_guard = logging::init_file_logging(&resolve_log_dir(&config), &config.log.level);

    // Open the store before touching the terminal so lock and open errors
    // print normally
    let store_path = resolve_store_path(&config, db);
    let store = Store::open(&store_path, store_options(&config))?;

    let today = Local::now().date_naive();
    let session = Session::start(&store, today, config.ui.week_start.weekday());
    let mut app = App::new(session, store, Theme::from_config(&config.ui));
    tracing::info!(store = %app.store.path().display(), %today, "session started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.store.close()?;
    tracing::info!("session ended");

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.session.should_quit {
            break;
        }
    }
    Ok(())
}
