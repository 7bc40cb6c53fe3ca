//! Log setup for the `jira-lite` binary.
//!
//! The library only emits `tracing` events. The binary writes them to a
//! daily log file, because stdout carries the JSON response and stderr the
//! error messages a script may want to parse.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Number of daily log files kept before the oldest is removed.
const MAX_LOG_FILES: usize = 7;

/// Filter directive for a `-v` count. `RUST_LOG` overrides it.
///
/// - 0: requests are logged at `info`, failures at `warn`
/// - 1: adds request URLs, statuses and error bodies
/// - 2 or more: everything, including reqwest's connection handling
pub fn filter_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "jira_lite=info,warn",
        1 => "jira_lite=debug,warn",
        _ => "jira_lite=trace,reqwest=debug,info",
    }
}

/// Install the global subscriber.
///
/// Logs go to `<data_local_dir>/jira-lite/logs/jira-lite.<date>.log`. At most
/// `MAX_LOG_FILES` days are kept.
///
/// # Errors
///
/// Fails if the log directory cannot be determined or created, or if a
/// global subscriber is already set.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let log_dir = log_directory()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("jira-lite")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&log_dir)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        verbosity,
        log_dir = %log_dir.display(),
        "jira-lite starting"
    );
    Ok(())
}

/// Directory the log files are written to.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("jira-lite").join("logs"))
}
