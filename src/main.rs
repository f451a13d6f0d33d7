// nimbus: terminal weather widget.
// Loads config, opens the local store, and runs the TUI until the user quits.

mod app;
mod cache;
mod config;
mod error;
mod favorites;
mod location;
mod logging;
mod preferences;
mod render;
mod retrieval;
mod state;
mod storage;
mod ui;
mod weather;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::app::App;
use crate::config::Config;
use crate::error::{NimbusError, Result};
use crate::storage::{FileStore, MemoryStore, SharedStore, paths};

#[tokio::main]
async fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nimbus: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    if let Some(log_path) = paths::log_path() {
        logging::init(&log_path)?;
    }

    let config = Config::load()?;
    let store = open_store();
    let mut app = App::new(&config, store)?;

    let mut terminal = setup_terminal()?;
    app.start();
    let result = app.run(&mut terminal);
    restore_terminal(&mut terminal)?;

    result.map_err(NimbusError::Io)
}

/// File-backed store in the data directory, or memory if there is none.
fn open_store() -> SharedStore {
    match paths::store_dir() {
        Some(dir) => Arc::new(FileStore::new(dir)),
        None => {
            tracing::warn!("no data directory, favorites and cache will not persist");
            MemoryStore::shared()
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
