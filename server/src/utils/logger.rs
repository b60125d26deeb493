//! Logging infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the given level (default `info`)
//! applies to the server with `tower_http` kept at `info`.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (stdout only)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, optionally writing to a daily-rolled file
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("server={level},tower_http=info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
