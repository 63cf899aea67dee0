//! Console logger implementation

use super::traits::{LogLevel, Logger};

/// Environment variable holding the minimum level for `ConsoleLogger::from_env`
pub const LOG_LEVEL_ENV: &str = "AWSENVSEC_LOG_LEVEL";

/// A logger that writes to stderr
///
/// Everything goes to stderr because stdout carries the rendered variables,
/// which callers usually `eval` or redirect into a file.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with default prefix and level
    pub fn new() -> Self {
        Self {
            prefix: "[awsenvsec]".to_string(),
            min_level: LogLevel::default(),
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Set the minimum level that gets written
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Create a console logger whose level comes from `AWSENVSEC_LOG_LEVEL`
    ///
    /// Unset or unparseable values fall back to the default level.
    pub fn from_env() -> Self {
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self::new().with_level(level)
    }

    /// The minimum level this logger writes
    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        eprintln!("{} {}: {}", self.prefix, level, message);
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.write(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }
}
