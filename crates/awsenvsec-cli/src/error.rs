//! Errors that end the process

use std::process::ExitCode;

use thiserror::Error;

use awsenvsec_core::config::ConfigError;
use awsenvsec_core::presenter::PresentError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Present(#[from] PresentError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error
    ///
    /// An unknown output mode is a usage error and gets 2, like other
    /// command-line mistakes.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(ConfigError::InvalidOutputMode(_)) => 2,
            _ => 1,
        }
    }

    /// Whether usage text should accompany the message
    pub fn shows_usage(&self) -> bool {
        self.exit_code() == 2
    }
}

impl From<&CliError> for ExitCode {
    fn from(err: &CliError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let usage: CliError = ConfigError::InvalidOutputMode("xml".into()).into();
        assert_eq!(usage.exit_code(), 2);
        assert!(usage.shows_usage());

        let config: CliError = ConfigError::client("profile not found").into();
        assert_eq!(config.exit_code(), 1);
        assert!(!config.shows_usage());

        let io: CliError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert_eq!(io.exit_code(), 1);
    }
}
