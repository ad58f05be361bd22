use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use log4rs::Handle;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use thiserror::Error;

use crate::common::constants::CRATE_LOG_TARGET;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} [{T}] {t} - {m}{n}";
const LOG_FILE_NAME: &str = "lexical_search.log";

/// Keeps the log4rs handle so later calls only swap the config.
static LOG4RS_HANDLE: Lazy<Mutex<Option<Handle>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),
    #[error("`log_directory` must be set when `log_in_file` is enabled")]
    MissingLogDirectory,
    #[error("Failed to create log appender: '{0}'")]
    AppenderError(#[from] std::io::Error),
    #[error("Failed to build log4rs config: '{0}'")]
    ConfigError(String),
    #[error("Failed to install logger: '{0}'")]
    SetLoggerError(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    log_directory: Option<PathBuf>,
    log_level: String,
    log_in_file: bool,
    console_display: bool,
    only_record_crate: bool,
}

impl LoggerConfig {
    pub fn new(
        log_directory: Option<PathBuf>,
        log_level: impl Into<String>,
        log_in_file: bool,
        console_display: bool,
        only_record_crate: bool,
    ) -> Self {
        Self { log_directory, log_level: log_level.into(), log_in_file, console_display, only_record_crate }
    }

    /// Console only logging at the given level.
    pub fn console(log_level: impl Into<String>) -> Self {
        Self::new(None, log_level, false, true, true)
    }

    fn level(&self) -> Result<LevelFilter, LoggerError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| LoggerError::InvalidLevel(self.log_level.clone()))
    }

    pub fn build_logger_config(&self) -> Result<Config, LoggerError> {
        let level = self.level()?;
        let mut appenders: Vec<&str> = Vec::new();
        let mut builder = Config::builder();

        if self.console_display {
            let console = ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build();
            builder = builder.appender(
                Appender::builder()
                    .filter(Box::new(ThresholdFilter::new(level)))
                    .build("console", Box::new(console)),
            );
            appenders.push("console");
        }

        if self.log_in_file {
            let directory = self.log_directory.as_ref().ok_or(LoggerError::MissingLogDirectory)?;
            let file = FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                .build(directory.join(LOG_FILE_NAME))?;
            builder = builder.appender(
                Appender::builder()
                    .filter(Box::new(ThresholdFilter::new(level)))
                    .build("file", Box::new(file)),
            );
            appenders.push("file");
        }

        let config = if self.only_record_crate {
            builder
                .logger(
                    Logger::builder()
                        .appenders(appenders.iter().copied())
                        .additive(false)
                        .build(CRATE_LOG_TARGET, level),
                )
                .build(Root::builder().build(LevelFilter::Off))
        } else {
            builder.build(Root::builder().appenders(appenders.iter().copied()).build(level))
        };
        config.map_err(|e| LoggerError::ConfigError(e.to_string()))
    }
}

pub struct SearchLogger;

impl SearchLogger {
    /// Installs (or re-configures) the global log4rs logger.
    pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
        let log4rs_config = config.build_logger_config()?;
        Self::update_log4rs_handler(&LOG4RS_HANDLE, log4rs_config)
    }

    fn update_log4rs_handler(handle: &Mutex<Option<Handle>>, config: Config) -> Result<(), LoggerError> {
        let mut guard = handle.lock();
        match guard.as_ref() {
            Some(existing) => existing.set_config(config),
            None => *guard = Some(log4rs::init_config(config)?),
        }
        Ok(())
    }
}
