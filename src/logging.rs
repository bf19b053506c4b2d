use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::AppError;

/// Verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Routes `log` output to `path`.
///
/// The terminal is in raw mode on the alternate screen while playing, so logs
/// never go to stdout or stderr.
pub fn init_file_logger(path: &Path, level: LogLevel) -> Result<(), AppError> {
    let file = File::create(path)?;
    WriteLogger::init(level.into(), Config::default(), file)?;
    Ok(())
}
