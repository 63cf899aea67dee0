//! Immutable run settings

use std::env;

use super::error::{ConfigError, ConfigResult};
use crate::types::OutputMode;

/// Region used when neither a flag nor `AWS_REGION` provides one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable supplying the default region
pub const REGION_ENV: &str = "AWS_REGION";

/// Environment variable supplying the default secrets path filter
pub const SECRETS_PATH_ENV: &str = "SM_PATH";

/// Environment variable supplying the default parameters path prefix
pub const PARAMETERS_PATH_ENV: &str = "PS_PATH";

/// Settings for one run of the pipeline
///
/// Built with `from_env` (or `new` for pure defaults) and then refined with
/// the `with_*` methods, which always win over environment defaults.
///
/// # Example
///
/// ```
/// use awsenvsec_core::config::RunConfig;
/// use awsenvsec_core::types::OutputMode;
///
/// let config = RunConfig::new()
///     .with_secrets_path("product/dev/var")
///     .with_output_mode(OutputMode::Json);
/// assert_eq!(config.region, "us-east-1");
/// assert!(config.wants_secrets());
/// assert!(!config.wants_parameters());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Named credentials profile; `None` uses the default credential chain
    pub profile: Option<String>,
    pub region: String,
    /// Name filter for the secrets listing
    pub secrets_path: Option<String>,
    /// Path prefix for the parameters listing
    pub parameters_path: Option<String>,
    /// Descend below `parameters_path`
    pub recursive: bool,
    pub output_mode: OutputMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfig {
    /// Defaults only, no environment lookup
    pub fn new() -> Self {
        Self {
            profile: None,
            region: DEFAULT_REGION.to_string(),
            secrets_path: None,
            parameters_path: None,
            recursive: false,
            output_mode: OutputMode::Export,
        }
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for the known variables
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut config = Self::new();
        if let Some(region) = get(REGION_ENV) {
            config.region = region;
        }
        config.secrets_path = get(SECRETS_PATH_ENV);
        config.parameters_path = get(PARAMETERS_PATH_ENV);
        config
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into()).filter(|p: &String| !p.is_empty());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_secrets_path(mut self, path: impl Into<String>) -> Self {
        self.secrets_path = Some(path.into());
        self
    }

    pub fn with_parameters_path(mut self, path: impl Into<String>) -> Self {
        self.parameters_path = Some(path.into());
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Secrets path, if one was requested and is non-empty
    pub fn secrets_filter(&self) -> Option<&str> {
        self.secrets_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Parameters path, if one was requested and is non-empty
    pub fn parameters_prefix(&self) -> Option<&str> {
        self.parameters_path.as_deref().filter(|p| !p.is_empty())
    }

    pub fn wants_secrets(&self) -> bool {
        self.secrets_filter().is_some()
    }

    pub fn wants_parameters(&self) -> bool {
        self.parameters_prefix().is_some()
    }

    /// Check the settings a store client needs before it is built
    pub fn validate(&self) -> ConfigResult<()> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        Ok(())
    }
}
