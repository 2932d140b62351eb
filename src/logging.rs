//! Tracing setup - log lines go to a file so they never tear the UI

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Failing to open
/// the log file leaves logging disabled; the dashboard still runs.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    if let Some(parent) = config.file.parent() {
        if !parent.as_os_str().is_empty() && std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
    else {
        return;
    };

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
