//! Logger backends for the `log` facade.
//!
//! `dwc-core` only emits through `log::*` macros. The binaries pick a backend:
//! the CLI writes to stderr, the TUI writes to a file because the terminal is
//! owned by the UI.

use crate::error::StorageError;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Map a `-v` repetition count to a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a stderr logger.
pub fn init_term_logger(level: LevelFilter) -> Result<(), StorageError> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| StorageError::LogInit {
        message: e.to_string(),
    })
}

/// Install a logger that appends to `path`, creating parent directories.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }
    }

    let file = File::create(path).map_err(|source| StorageError::FileIo {
        path: path.to_string_lossy().to_string(),
        source,
    })?;

    WriteLogger::init(level, Config::default(), file).map_err(|e| StorageError::LogInit {
        message: e.to_string(),
    })
}
