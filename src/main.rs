//! users-manager binary entry point.
//!
//! Parses settings, starts logging and the request runtime, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the terminal
//! state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use users_manager::api::HttpUserApi;
use users_manager::app::{self, AppState, Theme, keymap::Keymap};
use users_manager::config::Settings;
use users_manager::error::{Context, Result};
use users_manager::worker::Dispatcher;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Send `tracing` output to the log file; the terminal is drawn on.
fn init_tracing(settings: &Settings) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_ctx(|| format!("open log file {}", settings.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let settings = Settings::parse();
    settings.validate()?;
    init_tracing(&settings)?;
    tracing::info!(api_url = %settings.api_url, "starting users-manager");

    let runtime = tokio::runtime::Runtime::new().with_ctx(|| "start tokio runtime".to_string())?;
    let (dispatcher, mut outcomes) =
        Dispatcher::new(HttpUserApi::new(settings.api_url.clone()), runtime.handle().clone());

    let mut state = AppState::new(
        Theme::load_or_init(&settings.theme),
        Keymap::load_or_init(&settings.keybinds),
        settings.api_url.clone(),
        settings.export_dir.clone(),
    );

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, &mut state, &dispatcher, &mut outcomes);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    // Pending requests are abandoned; their outcomes have nowhere to go.
    runtime.shutdown_background();
    Ok(())
}
