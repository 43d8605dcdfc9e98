//! Logging setup
//!
//! Console output always; a daily rolling file in addition when a log
//! directory is configured.

use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "operator_api=info,tower_http=info";

/// Keeps the non-blocking file writer alive; drop flushes it.
pub type LogGuard = Option<tracing_appender::non_blocking::WorkerGuard>;

/// Initialize the global subscriber
pub fn init_logger(log_dir: Option<&str>) -> LogGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let console = fmt::layer().with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let appender = tracing_appender::rolling::daily(log_path, "operator-api");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::registry().with(filter).with(console).init();
    None
}
