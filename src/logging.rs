//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so it logs to a file; every other command logs
//! to stderr. The filter comes from `DIAMOND_LOG` (e.g. `DIAMOND_LOG=debug`).

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::ENV_LOG_FILTER;
use crate::error::AppError;

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr at `warn` unless `DIAMOND_LOG` says otherwise.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `path` at `info` unless `DIAMOND_LOG` says otherwise.
pub fn init_file(path: &Path) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to open log file {}: {e}", path.display())))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
