//! dwc-tui - Terminal UI for Darwin Core gateways
//!
//! Browse the records of a gateway in a sortable, pageable table, open a
//! record's full detail and see the page's occurrences on a map.

use std::io::{self, stdout};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;

use dwc_core::storage::config::{Config, URL_ENV_VAR};
use dwc_core::utils::logging::{init_file_logger, level_for_verbosity};

mod action;
mod app;
mod components;
mod error;
mod event;
mod layout;
mod service;

use app::App;
use error::TuiResult;

#[derive(Parser, Debug)]
#[command(name = "dwc-tui", version, about = "Terminal UI for Darwin Core gateways")]
struct Args {
    /// Gateway URL (overrides the config file)
    #[arg(long, env = URL_ENV_VAR)]
    url: Option<String>,

    /// Directory holding config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Records per page
    #[arg(long)]
    count: Option<u64>,

    /// Write the log here instead of the config directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> TuiResult<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config_dir.map(|dir| dir.join("config.toml")))?;
    if let Some(count) = args.count {
        config.table.count = count;
    }

    // The terminal belongs to the UI, so logs go to a file
    let log_path = match args.log_file {
        Some(path) => Some(path),
        None => config.log_file_path().ok(),
    };
    if let Some(path) = log_path {
        if let Err(e) = init_file_logger(&path, level_for_verbosity(args.verbose.max(1))) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    // Build the app before touching the terminal so config errors print normally
    let mut app = App::new(&config, args.url)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    // Set panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = app.run_async(&mut terminal).await;

    // Cleanup terminal
    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        log::error!("application error: {}", err);
        eprintln!("Application error: {}", err);
    }

    result
}

/// Restore terminal to normal state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
