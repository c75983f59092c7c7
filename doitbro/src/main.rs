//! `doitbro` — terminal to-do list with live backend sync.
//!
//! Launches the TUI against the built-in in-process backend. Configuration
//! via CLI flags, environment variables, or config file
//! (`~/.config/doitbro/config.toml`).
//!
//! ```bash
//! cargo run --bin doitbro
//!
//! # Sign in as a specific user
//! cargo run --bin doitbro -- --user alice --display-name Alice
//!
//! # Or via environment variables
//! DOITBRO_USER=alice DOITBRO_NAME=Alice cargo run
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use doitbro::app::App;
use doitbro::config::{CliArgs, ClientConfig};
use doitbro::sync::{self, SyncCommand, SyncEvent};
use doitbro::ui;
use doitbro_backend::{MemoryAuth, MemoryStore};
use doitbro_store::identity::Identity;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("doitbro starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("doitbro exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("doitbro.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new()
        .with_max_text_len(config.max_task_text_len)
        .with_timestamp_format(config.timestamp_format.clone());

    // Built-in backend: an in-process store and identity provider.
    let provider = Arc::new(MemoryAuth::new(Identity::new(
        config.user_id.clone(),
        config.display_name.clone(),
    )));
    let store = Arc::new(MemoryStore::new());
    let (cmd_tx, mut evt_rx) = sync::spawn_sync(provider, store, config.to_sync_config());

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending SyncEvents (non-blocking).
        drain_sync_events(&mut app, &mut evt_rx);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(SyncCommand) when a user action
            // requires a backend call (sign-in/out, create, toggle, delete).
            if let Some(cmd) = app.handle_key_event(key) {
                match cmd_tx.try_send(cmd) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        app.status = Some("Sync busy, try again".to_string());
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        app.status = Some("Sync stopped".to_string());
                    }
                }
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(SyncCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Drain all pending `SyncEvent`s from the receiver and apply them to the app.
fn drain_sync_events(app: &mut App, rx: &mut mpsc::Receiver<SyncEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.apply_event(event);
    }
}
