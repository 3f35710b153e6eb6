//! Tracing setup for the terminal host.
//!
//! The terminal UI owns stdout, so log lines go to a file. Filtering follows
//! `RUST_LOG` (default `warn`), with per-area targets:
//!
//! - `RUST_LOG=debug` - everything
//! - `RUST_LOG=edit=debug,selection=trace` - edit sessions and cursor moves
//! - `RUST_LOG=input=trace` - every dispatched event
//!
//! The log directory is `$GRIDENTRY_LOG_DIR`, falling back to the system
//! temp directory. If it cannot be created, logging is skipped with a
//! warning on stderr.

use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "gridentry.log";

pub fn log_dir() -> PathBuf {
    std::env::var_os("GRIDENTRY_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Creates `dir` if needed and returns it.
pub fn ensure_dir(dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.to_path_buf())
}

/// Installs the global subscriber writing to `<log_dir>/gridentry.log`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = match ensure_dir(&log_dir()) {
        Ok(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(filter),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry().with(file_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("logs");
        assert_eq!(ensure_dir(&nested).unwrap(), nested);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_under_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("plain.txt");
        std::fs::write(&blocker, "x").unwrap();
        assert!(ensure_dir(&blocker.join("logs")).is_err());
    }
}
