//! Tracing setup: console output plus the log file named in the config.
//!
//! `RUST_LOG` overrides `log.level` when set. The file writer is
//! non-blocking; keep the returned guard alive for the life of the process
//! or buffered lines are lost on exit.

use crate::config::LogConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

pub fn log_file_path(log: &LogConfig) -> PathBuf {
    PathBuf::from(&log.directory).join(&log.filename)
}

/// Filter built from `log.level` alone.
fn configured_filter(log: &LogConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(&log.level)
}

/// `RUST_LOG` wins when set; otherwise `log.level`.
fn env_filter(log: &LogConfig) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => configured_filter(log),
    }
}

pub fn init(log: &LogConfig) -> Result<WorkerGuard, Box<dyn std::error::Error + Send + Sync>> {
    std::fs::create_dir_all(&log.directory)?;
    let appender = tracing_appender::rolling::never(&log.directory, &log.filename);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(log)?)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    tracing::info!(file = %log_file_path(log).display(), "logging initialized");
    Ok(guard)
}
