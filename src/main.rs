use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{fs, io, sync::Arc};

use anyhow::Result;
use clap::Parser;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod meteo;
mod symbols;

use crate::app::{run_app, App};
use crate::config::Config;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    if let Err(err) = init_tracing() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let stored = match Config::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!("ignoring stored config: {err:#}");
            Config::default()
        }
    };
    let initial = args.location.unwrap_or(stored.location);

    let mut app = App::new(Config::config_file_path().ok());
    app.set_query(initial);

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

/// Log to a file; the alternate screen owns stdout while the TUI runs.
fn init_tracing() -> Result<()> {
    let path = Config::log_file_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
