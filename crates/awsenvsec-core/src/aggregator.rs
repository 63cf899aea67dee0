//! Merging both stores into one result map

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::RunConfig;
use crate::decoder::EntryDecoder;
use crate::logging::SharedLogger;
use crate::stores::{list_parameters, list_secret_names, RemoteStoreClient, StoreResult};
use crate::types::{NormalizedPair, RawEntry, StoreKind};
use crate::{log_debug, log_error, log_warn};

/// Final key/value mapping of a run
///
/// Keys are unique and iterate in sorted order. Later merges overwrite
/// earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultMap {
    entries: BTreeMap<String, String>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing any earlier value for the same key
    pub fn merge(&mut self, pair: NormalizedPair) {
        self.entries.insert(pair.key, pair.value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Extend<NormalizedPair> for ResultMap {
    fn extend<I: IntoIterator<Item = NormalizedPair>>(&mut self, iter: I) {
        for pair in iter {
            self.merge(pair);
        }
    }
}

impl FromIterator<NormalizedPair> for ResultMap {
    fn from_iter<I: IntoIterator<Item = NormalizedPair>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Runs the secrets pipeline, then the parameters pipeline, and merges both
///
/// Remote failures never escape: a failed listing drops that store's whole
/// contribution, a failed secret lookup drops that one secret, and both are
/// reported through the logger.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use awsenvsec_core::aggregator::Aggregator;
/// use awsenvsec_core::config::RunConfig;
/// use awsenvsec_core::logging::NoOpLogger;
/// use awsenvsec_core::stores::MemoryRemoteStore;
///
/// let store = MemoryRemoteStore::new();
/// store.insert_secret("app/dev/creds", r#"{"user":"admin"}"#);
/// store.insert_parameter("/app/dev/USER", "operator");
///
/// let config = RunConfig::new()
///     .with_secrets_path("app/dev")
///     .with_parameters_path("/app/dev");
/// let result = Aggregator::new(&store, Arc::new(NoOpLogger::new())).run(&config);
///
/// // Parameters are merged last and win
/// assert_eq!(result.get("USER"), Some("operator"));
/// ```
pub struct Aggregator<'a> {
    client: &'a dyn RemoteStoreClient,
    logger: SharedLogger,
}

impl<'a> Aggregator<'a> {
    pub fn new(client: &'a dyn RemoteStoreClient, logger: SharedLogger) -> Self {
        Self { client, logger }
    }

    /// Build the result map for `config`
    pub fn run(&self, config: &RunConfig) -> ResultMap {
        let mut result = ResultMap::new();

        if let Some(filter) = config.secrets_filter() {
            result.extend(self.contribution(StoreKind::Secrets, self.collect_secrets(filter)));
        }

        if let Some(prefix) = config.parameters_prefix() {
            result.extend(self.contribution(
                StoreKind::Parameters,
                self.collect_parameters(prefix, config.recursive),
            ));
        }

        log_debug!(self.logger, "Merged {} variables", result.len());
        result
    }

    /// Pairs from every secret matching `filter`, in listing order
    pub fn collect_secrets(&self, filter: &str) -> StoreResult<Vec<NormalizedPair>> {
        let decoder = EntryDecoder::new(self.client);
        let mut pairs = Vec::new();

        for name in list_secret_names(self.client, filter) {
            let entry = RawEntry::named(name?);
            match decoder.decode_secret(&entry) {
                Ok(decoded) => pairs.extend(decoded),
                Err(e) => log_warn!(self.logger, "Skipping secret {}: {}", entry.name, e),
            }
        }

        log_debug!(
            self.logger,
            "{} produced {} pairs for filter {:?}",
            StoreKind::Secrets,
            pairs.len(),
            filter
        );
        Ok(pairs)
    }

    /// Pairs from every parameter under `prefix`, in listing order
    pub fn collect_parameters(&self, prefix: &str, recursive: bool) -> StoreResult<Vec<NormalizedPair>> {
        let decoder = EntryDecoder::new(self.client);
        let mut pairs = Vec::new();

        for parameter in list_parameters(self.client, prefix, recursive) {
            let entry = RawEntry::from(parameter?);
            pairs.extend(decoder.decode_parameter(&entry)?);
        }

        log_debug!(
            self.logger,
            "{} produced {} pairs for path {:?} (recursive: {})",
            StoreKind::Parameters,
            pairs.len(),
            prefix,
            recursive
        );
        Ok(pairs)
    }

    /// A store's pairs, or nothing if its pipeline failed
    fn contribution(
        &self,
        store: StoreKind,
        outcome: StoreResult<Vec<NormalizedPair>>,
    ) -> Vec<NormalizedPair> {
        match outcome {
            Ok(pairs) => pairs,
            Err(e) => {
                log_error!(self.logger, "{}", e);
                match store {
                    StoreKind::Secrets => log_error!(
                        self.logger,
                        "There was an issue retrieving secrets from AWS Secrets Manager."
                    ),
                    StoreKind::Parameters => log_error!(
                        self.logger,
                        "There was an issue retrieving secrets from AWS Parameter Store. Please check the path."
                    ),
                }
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for Aggregator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("client", &self.client.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::logging::{LogLevel, MemoryLogger};
    use crate::stores::{MemoryRemoteStore, MAX_PAGES, PAGE_SIZE};

    fn both_paths() -> RunConfig {
        RunConfig::new()
            .with_secrets_path("product/dev")
            .with_parameters_path("/product/dev")
    }

    fn run(store: &MemoryRemoteStore, config: &RunConfig) -> (ResultMap, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        let result = Aggregator::new(store, logger.clone()).run(config);
        (result, logger)
    }

    #[test]
    fn test_result_map_last_write_wins() {
        let mut map = ResultMap::new();
        map.merge(NormalizedPair::new("FOO", "a"));
        map.merge(NormalizedPair::new("FOO", "b"));
        assert_eq!(map.get("FOO"), Some("b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_result_map_iterates_sorted() {
        let map: ResultMap = vec![
            NormalizedPair::new("ZED", "1"),
            NormalizedPair::new("ALPHA", "2"),
            NormalizedPair::new("MID", "3"),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["ALPHA", "MID", "ZED"]);
    }

    #[test]
    fn test_merges_both_stores() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/creds", r#"{"db_user": "admin", "db_pass": "pw"}"#);
        store.insert_secret("product/dev/API_TOKEN", "tok");
        store.insert_parameter("/product/dev/DB_HOST", "db.internal");

        let (result, _) = run(&store, &both_paths());

        assert_eq!(result.len(), 4);
        assert_eq!(result.get("DB_USER"), Some("admin"));
        assert_eq!(result.get("DB_PASS"), Some("pw"));
        assert_eq!(result.get("API_TOKEN"), Some("tok"));
        assert_eq!(result.get("DB_HOST"), Some("db.internal"));
    }

    #[test]
    fn test_parameters_win_over_secrets() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/FOO", "a");
        store.insert_parameter("/product/dev/FOO", "b");

        let (result, _) = run(&store, &both_paths());
        assert_eq!(result.get("FOO"), Some("b"));
    }

    #[test]
    fn test_parameters_win_regardless_of_page_position() {
        let store = MemoryRemoteStore::new();
        store.insert_parameter("/product/dev/FOO", "b");
        for i in 0..15 {
            store.insert_parameter(format!("/product/dev/P{}", i), "p");
        }
        for i in 0..15 {
            store.insert_secret(format!("product/dev/S{}", i), "s");
        }
        store.insert_secret("product/dev/FOO", "a");

        let (result, _) = run(&store, &both_paths());
        assert_eq!(result.get("FOO"), Some("b"));
        assert_eq!(result.len(), 31);
    }

    #[test]
    fn test_structured_field_overrides_scalar_in_same_store() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/TOKEN", "scalar");
        store.insert_secret("product/dev/bundle", r#"{"token": "from-json"}"#);

        let (result, _) = run(&store, &RunConfig::new().with_secrets_path("product/dev"));
        assert_eq!(result.get("TOKEN"), Some("from-json"));
    }

    #[test]
    fn test_no_paths_yields_empty_map() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/FOO", "a");
        store.insert_parameter("/product/dev/BAR", "b");

        let (result, _) = run(&store, &RunConfig::new());
        assert!(result.is_empty());
        assert_eq!(store.secret_pages_requested(), 0);
        assert_eq!(store.parameter_pages_requested(), 0);
    }

    #[test]
    fn test_only_requested_store_contributes() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/FOO", "a");
        store.insert_parameter("/product/dev/BAR", "b");

        let (result, _) = run(&store, &RunConfig::new().with_parameters_path("/product/dev"));
        assert!(!result.contains_key("FOO"));
        assert_eq!(result.get("BAR"), Some("b"));
    }

    #[test]
    fn test_secret_listing_failure_drops_only_secrets() {
        let store = MemoryRemoteStore::new();
        for i in 0..12 {
            store.insert_secret(format!("product/dev/S{}", i), "s");
        }
        store.insert_parameter("/product/dev/BAR", "b");
        store.fail_secret_listing_at_page(1);

        let (result, logger) = run(&store, &both_paths());

        // Pairs from the first, successful page are abandoned too
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("BAR"), Some("b"));
        assert!(logger.contains(LogLevel::Error, "AWS Secrets Manager"));
    }

    #[test]
    fn test_parameter_listing_failure_keeps_secrets() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/FOO", "a");
        store.insert_parameter("/product/dev/FOO", "b");
        store.fail_parameter_listing_at_page(0);

        let (result, logger) = run(&store, &both_paths());

        assert_eq!(result.get("FOO"), Some("a"));
        assert!(logger.contains(LogLevel::Error, "Please check the path"));
    }

    #[test]
    fn test_lookup_failure_skips_one_secret() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/GOOD", "ok");
        store.insert_secret("product/dev/BAD", "never seen");
        store.fail_lookup("product/dev/BAD");

        let (result, logger) = run(&store, &RunConfig::new().with_secrets_path("product/dev"));

        assert_eq!(result.get("GOOD"), Some("ok"));
        assert!(!result.contains_key("BAD"));
        assert!(logger.contains(LogLevel::Warn, "product/dev/BAD"));
        assert!(logger.messages_at(LogLevel::Error).is_empty());
    }

    #[test]
    fn test_diagnostics_never_contain_values() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/creds", r#"{"password": "s3cr3t-value"}"#);

        let (_, logger) = run(&store, &RunConfig::new().with_secrets_path("product/dev"));
        assert!(logger.entries().iter().all(|(_, m)| !m.contains("s3cr3t-value")));
    }

    #[test]
    fn test_page_cap_limits_processed_items() {
        let store = MemoryRemoteStore::new();
        for i in 0..(MAX_PAGES * PAGE_SIZE + 20) {
            store.insert_parameter(format!("/product/dev/P{:04}", i), "v");
        }

        let (result, logger) = run(&store, &RunConfig::new().with_parameters_path("/product/dev"));

        assert_eq!(result.len(), 500);
        assert!(result.contains_key("P0499"));
        assert!(!result.contains_key("P0500"));
        assert!(logger.messages_at(LogLevel::Error).is_empty());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let store = MemoryRemoteStore::new();
        store.insert_secret("product/dev/creds", r#"{"a": "1", "b": 2}"#);
        store.insert_parameter("/product/dev/C", "3");
        let config = both_paths();

        let (first, _) = run(&store, &config);
        let (second, _) = run(&store, &config);
        assert_eq!(first, second);
    }
}
