//! AWS-backed remote store client
//!
//! Implements `RemoteStoreClient` on top of Secrets Manager and SSM Parameter
//! Store. The SDK is async, so each call is driven to completion on a
//! private current-thread runtime.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::types::{Filter, FilterNameStringType};
use tokio::runtime::{Builder, Runtime};

use awsenvsec_core::config::{ConfigError, ConfigResult, RunConfig};
use awsenvsec_core::logging::SharedLogger;
use awsenvsec_core::stores::{Page, RemoteStoreClient, StoreError, StoreResult};
use awsenvsec_core::types::{Parameter, StoreKind};
use awsenvsec_core::log_debug;

pub struct AwsRemoteStore {
    name: String,
    runtime: Runtime,
    secrets: aws_sdk_secretsmanager::Client,
    parameters: aws_sdk_ssm::Client,
    logger: SharedLogger,
}

impl AwsRemoteStore {
    /// Build clients for the configured region and profile
    ///
    /// Credentials are resolved here, so a missing profile or absent
    /// credentials fail the run before anything is listed.
    pub fn connect(config: &RunConfig, logger: SharedLogger) -> ConfigResult<Self> {
        config.validate()?;

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::client(format!("failed to start runtime: {}", e)))?;

        let sdk_config = runtime.block_on(load_sdk_config(config))?;
        log_debug!(
            logger,
            "Connected to region {} with profile {}",
            config.region,
            config.profile.as_deref().unwrap_or("<default>")
        );

        Ok(Self {
            name: format!("aws:{}", config.region),
            secrets: aws_sdk_secretsmanager::Client::new(&sdk_config),
            parameters: aws_sdk_ssm::Client::new(&sdk_config),
            runtime,
            logger,
        })
    }
}

async fn load_sdk_config(config: &RunConfig) -> ConfigResult<SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    let sdk_config = loader.load().await;

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| ConfigError::client("no credentials provider available"))?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| ConfigError::client(DisplayErrorContext(&e).to_string()))?;

    Ok(sdk_config)
}

fn max_results(page_size: usize) -> i32 {
    i32::try_from(page_size).unwrap_or(i32::MAX)
}

impl RemoteStoreClient for AwsRemoteStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_secret_names_page(
        &self,
        path_filter: &str,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<String>> {
        let filter = Filter::builder()
            .key(FilterNameStringType::Name)
            .values(path_filter)
            .build();
        let request = self
            .secrets
            .list_secrets()
            .filters(filter)
            .max_results(max_results(page_size))
            .set_next_token(next_token.map(str::to_string));

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| StoreError::listing(StoreKind::Secrets, DisplayErrorContext(&e)))?;

        let names: Vec<String> = output
            .secret_list()
            .iter()
            .filter_map(|entry| entry.name().map(str::to_string))
            .collect();
        log_debug!(self.logger, "Listed {} secret names", names.len());

        Ok(Page::new(names, output.next_token().map(str::to_string)))
    }

    fn get_secret_value(&self, name: &str) -> StoreResult<String> {
        let request = self.secrets.get_secret_value().secret_id(name);
        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| StoreError::lookup(name, DisplayErrorContext(&e)))?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| StoreError::MissingValue(name.to_string()))
    }

    fn list_parameters_page(
        &self,
        path_prefix: &str,
        recursive: bool,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<Parameter>> {
        let request = self
            .parameters
            .get_parameters_by_path()
            .path(path_prefix)
            .recursive(recursive)
            .with_decryption(true)
            .max_results(max_results(page_size))
            .set_next_token(next_token.map(str::to_string));

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| StoreError::listing(StoreKind::Parameters, DisplayErrorContext(&e)))?;

        let parameters: Vec<Parameter> = output
            .parameters()
            .iter()
            .filter_map(|p| Some(Parameter::new(p.name()?, p.value()?)))
            .collect();
        log_debug!(self.logger, "Listed {} parameters", parameters.len());

        Ok(Page::new(parameters, output.next_token().map(str::to_string)))
    }
}

impl std::fmt::Debug for AwsRemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsRemoteStore")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_results_saturates() {
        assert_eq!(max_results(10), 10);
        assert_eq!(max_results(usize::MAX), i32::MAX);
    }
}
