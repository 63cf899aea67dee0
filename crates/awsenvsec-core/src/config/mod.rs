//! Run configuration
//!
//! A `RunConfig` is built once at startup from environment defaults plus
//! explicit overrides, then passed by reference into the pipeline.

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{
    RunConfig, DEFAULT_REGION, PARAMETERS_PATH_ENV, REGION_ENV, SECRETS_PATH_ENV,
};
