mod logger_config;

pub use logger_config::{LoggerConfig, LoggerError, SearchLogger};
