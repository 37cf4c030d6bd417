//! Logging setup.
//!
//! The terminal UI owns stdout, so interactive sessions log to a daily
//! rolling file. Replays log to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "gridkeys.log";

/// Where log lines go.
pub enum LogTarget {
    File,
    Stderr,
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init(config: &Config, target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
            Ok(None)
        }
        LogTarget::File => {
            let log_dir = log_dir(config);
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("creating log dir {}", log_dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
            Ok(Some(guard))
        }
    }
}

fn log_dir(config: &Config) -> PathBuf {
    config.log_dir.clone().unwrap_or_else(|| {
        ProjectDirs::from("", "", "gridkeys")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("gridkeys"))
    })
}
