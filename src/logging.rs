use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TYPEACE_LOG=session=debug`
pub const LOG_ENV: &str = "TYPEACE_LOG";

pub const LOG_FILE: &str = "typeace.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send tracing output to `dir/typeace.log`. Stdout belongs to the TUI.
///
/// Returns `None` when the directory cannot be created or a global subscriber
/// is already installed; the app keeps running without logs in that case.
/// The guard must be held until exit so buffered lines are flushed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
