use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,tella=info";
const LOG_FILE_PREFIX: &str = "tella.log";

/// Default log directory: `<cache dir>/tella/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("tella").join("logs"))
}

/// Installs the global subscriber.
///
/// Logs go to a daily rolling file so they never interleave with the REPL.
/// Without a usable directory they go to stderr. The returned guard must be
/// kept alive until exit to flush the file writer.
pub fn init(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let usable_dir = log_dir
        .or_else(default_log_dir)
        .filter(|dir| fs::create_dir_all(dir).is_ok());

    match usable_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(writer)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}
