//! Configuration errors

/// Errors that end a run before anything is fetched
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No AWS region configured")]
    MissingRegion,

    #[error("Output flag was: {0}. It must be either \"env\" or \"json\"")]
    InvalidOutputMode(String),

    #[error("Configuration error, {0}")]
    ClientConstruction(String),
}

impl ConfigError {
    /// Create a client construction error
    pub fn client(message: impl Into<String>) -> Self {
        Self::ClientConstruction(message.into())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
