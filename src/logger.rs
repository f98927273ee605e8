use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::{self, Profile};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Could not determine data directory")]
    DataDirError,
    #[error("Failed to open log file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Logger already initialized: {0}")]
    SetLoggerError(#[from] log::SetLoggerError),
}

/// Location of the log file for a profile
pub fn get_log_file_path(profile: Profile) -> Result<PathBuf, LoggerError> {
    utils::get_data_dir(profile)
        .map(|dir| dir.join("taskpad.log"))
        .ok_or(LoggerError::DataDirError)
}

/// Route `log` output to a file; the terminal belongs to the TUI
pub fn init(path: &Path, level: log::LevelFilter) -> Result<(), LoggerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}
