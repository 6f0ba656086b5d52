//! File logging.
//!
//! The terminal belongs to the UI, so log records go to `folio.log` in the
//! platform data directory. The filter is read from `FOLIO_LOG` and defaults
//! to `info`.

use std::fs;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Returns `None`, leaving logging disabled,
/// when the log directory cannot be created.
pub fn init() -> Option<WorkerGuard> {
    let dirs = ProjectDirs::from("", "", "folio")?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).ok()?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "folio.log"));
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
