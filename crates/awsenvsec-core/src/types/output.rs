//! Output mode selection

use std::str::FromStr;

use crate::config::ConfigError;

/// How the merged variables are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No mode given: `export KEY=$"value"` lines for shell `eval`
    #[default]
    Export,
    /// Sorted `KEY="value"` lines under a timestamped header
    Env,
    /// Indented JSON object under a timestamped header
    Json,
}

impl OutputMode {
    /// Resolve an optional, user-supplied mode
    ///
    /// `None` and the empty string mean "no mode". Anything other than
    /// `env` or `json` is rejected; matching is case-sensitive.
    pub fn parse_optional(value: Option<&str>) -> Result<Self, ConfigError> {
        match value {
            None | Some("") => Ok(OutputMode::Export),
            Some(v) => v.parse(),
        }
    }

    /// Whether this mode prints the timestamped header
    pub fn has_header(&self) -> bool {
        !matches!(self, OutputMode::Export)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Export => "export",
            OutputMode::Env => "env",
            OutputMode::Json => "json",
        }
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "env" => Ok(OutputMode::Env),
            "json" => Ok(OutputMode::Json),
            other => Err(ConfigError::InvalidOutputMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
