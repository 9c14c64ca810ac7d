use crate::settings::HubConfig;
use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// "info", "WARN", ... -> LevelFilter; unknown names fall back to Info
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Opens the session log for appending, creating parent directories.
/// With `clear` the previous content is dropped.
pub fn open_log_file(path: &Path, clear: bool) -> Result<File, std::io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut options = OpenOptions::new();
    options.create(true);
    if clear {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    options.open(path)
}

/// Warnings and errors go to the terminal, everything from `log_level` up
/// goes to the log file.
pub fn init_logging(config: &HubConfig) -> Result<(), LoggingError> {
    let level = parse_level(&config.log_level);
    let file = open_log_file(Path::new(&config.log_file), config.clear_log_on_startup)?;
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Warn,
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, log_config, file),
    ];
    CombinedLogger::init(loggers)?;
    info!("Session started, log level {}", level);
    Ok(())
}

/// One line per tool use: "<tool> Input: <input> Output: <output>"
pub fn log_event(tool: &str, input: &str, output: &str) {
    info!("{} Input: {} Output: {}", tool, input, output);
}
