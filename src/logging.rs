use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "cricket_terminal.log";

/// Installs a file subscriber when `log_dir` is set.
///
/// The terminal owns stdout, so without a log directory nothing is installed
/// and tracing events are dropped. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir else {
        return Ok(None);
    };

    // `rolling::daily` panics if it cannot create the first file, so check first.
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;
    let probe = dir.join(".cricket_write_test");
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&probe)
        .with_context(|| format!("log directory {} is not writable", dir.display()))?;
    let _ = fs::remove_file(&probe);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cricket_terminal=debug"));
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))?;

    Ok(Some(guard))
}
