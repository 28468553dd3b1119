//! Tracing setup.
//!
//! The interactive session owns the terminal, so its logs go to a file.
//! One-shot CLI commands log to stderr, and only when `TALLY_LOG` is set.
//! Failing to set up logging is never fatal.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var holding an `EnvFilter` directive (e.g. `tally=debug`)
pub const LOG_ENV: &str = "TALLY_LOG";

const LOG_FILE: &str = "tally.log";

/// `TALLY_LOG` if set and valid, else `level` for this crate
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(format!("tally={level}")))
}

/// Log to `<dir>/tally.log`. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init_file_logging(dir: &Path, level: &str) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("warning: could not create log directory {}: {}", dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let result = tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init();
    match result {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// Log to stderr when `TALLY_LOG` is set; otherwise stay silent
pub fn init_stderr_logging() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
