//! Structured logging setup, grounded in the teacher's `logging::create_logger`
//! (hourly-rotated JSON file appender) plus an `EnvFilter` so `RUST_LOG`
//! controls verbosity the way `llm_devices::logging` does.

use std::path::{Path, PathBuf};

use tracing::subscriber::DefaultGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;

pub fn create_logger(name: &str, log_dir: impl AsRef<Path>) -> anyhow::Result<DefaultGuard> {
    let log_dir: PathBuf = log_dir.as_ref().to_path_buf();
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(name)
        .filename_suffix("json")
        .build(&log_dir)?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = fmt::Subscriber::builder()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_writer(file_appender)
        .finish();

    Ok(tracing::subscriber::set_default(subscriber))
}
