//! D&D 5e character sheet TUI.
//!
//! Browse saved characters, create new ones, and track a character at the
//! table: hit points, conditions, spell slots, inventory and coins. Every
//! committed edit is saved immediately.
//!
//! ```bash
//! cargo run -p charsheet -- --data-dir ./party
//! ```

mod app;
mod config;
mod events;
mod focus;
mod modal;
mod screens;
mod session;
mod tasks;
mod ui;

use anyhow::{Context, Result};
use charsheet_core::{CharacterStore, JsonCharacterStore, StaticCatalog};
use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{AppConfig, DATA_DIR_ENV};
use events::AppEvent;

/// Terminal character sheet for D&D 5e
#[derive(Parser, Debug)]
#[command(name = "charsheet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (default: ./charsheet.toml, then <data dir>/charsheet.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding character files
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "charsheet=trace" (RUST_LOG wins when set)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let cwd = std::env::current_dir().context("reading the current directory")?;
    let env_data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    let mut config = AppConfig::load(args.config.as_deref(), &cwd, env_data_dir)?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    init_logging(&config)?;
    tracing::info!(data_dir = %config.data_dir.display(), "Starting charsheet");

    let store: Arc<dyn CharacterStore> = Arc::new(
        JsonCharacterStore::open(&config.data_dir)
            .with_context(|| format!("opening {}", config.data_dir.display()))?,
    );
    let app = App::new(store, Arc::new(StaticCatalog), config.hp_bar_width);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Exited with error");
    }
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        for (task, tag) in app.take_pending() {
            tasks::spawn(task, tag, app.store(), tx.clone());
        }

        // Finished tasks first, then at most one terminal event
        while let Ok(finished) = rx.try_recv() {
            app.handle_event(finished);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Some(input) = AppEvent::from_terminal(event::read()?) {
                app.handle_event(input);
            }
        }

        if app.should_quit {
            tracing::info!("Quitting");
            return Ok(());
        }
    }
}
