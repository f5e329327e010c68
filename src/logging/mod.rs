// src/logging/mod.rs
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::core::config::Config;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Logger already initialised: {0}")]
    AlreadyInitialised(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LoggingError>;

// The terminal belongs to the UI, so log lines go to a file
pub fn init(config: &Config) -> Result<()> {
    let file = open_log_file(&config.log_file)?;

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(true)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
