use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    constants::{files, logging},
    utils::create_folder_if_not_exists,
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub dir: PathBuf,
    /// Used when `RUST_LOG` is unset
    pub level: String,
    pub stdout: bool,
    /// Older files are deleted on rotation
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(files::LOG_PATH),
            level: logging::LEVEL.to_string(),
            stdout: true,
            max_log_files: logging::MAX_LOG_FILES,
        }
    }
}

/// Install the global subscriber. Keep the guard alive until exit or buffered file lines are lost.
pub fn init(config: &LogConfig) -> anyhow::Result<WorkerGuard> {
    let appender = file_appender(config)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level {:?}", config.level))?;

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    let stdout_layer = config
        .stdout
        .then(|| fmt::layer().with_target(false).with_ansi(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

/// Daily files named `app.<date>.log`, at most `max_log_files` of them (never fewer than one)
fn file_appender(config: &LogConfig) -> anyhow::Result<RollingFileAppender> {
    create_folder_if_not_exists(&config.dir)
        .with_context(|| format!("creating log directory {}", config.dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(files::LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.max_log_files.max(1))
        .build(&config.dir)
        .context("creating rolling log file")
}
