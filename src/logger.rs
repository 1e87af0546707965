//! Logging setup on top of the `log` facade.
//!
//! Records go through a `fern` dispatcher to stderr and/or a log file,
//! depending on [`LoggingConfig`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::config::LoggingConfig;
use crate::constants::{APP_DIR_NAME, LOG_FILE_NAME};

/// Default log file location inside the platform data directory
pub fn get_log_file_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
        .map(|dir| dir.join(APP_DIR_NAME).join(LOG_FILE_NAME))
}

/// Build the dispatcher described by `config` without installing it
pub fn dispatch(config: &LoggingConfig) -> Result<fern::Dispatch> {
    let level: LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // Driver chatter stays quiet unless explicitly enabled
        .level_for("sqlx", LevelFilter::Warn);

    if config.stderr {
        dispatch = dispatch.chain(std::io::stderr());
    }

    let Some(path) = log_file_target(config)? else {
        return Ok(dispatch);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Ok(dispatch.chain(file))
}

/// Log file `config` writes to, if any.
///
/// An explicit `file` is always used. Without one, the default path is only
/// needed when stderr output is off.
pub fn log_file_target(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    match &config.file {
        Some(path) => Ok(Some(path.clone())),
        None if config.stderr => Ok(None),
        None => get_log_file_path().map(Some),
    }
}

/// Install the global logger. Does nothing when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    dispatch(config)?.apply().context("Logger already initialized")?;
    log::debug!("Logging initialized at level {}", config.level);
    Ok(())
}
