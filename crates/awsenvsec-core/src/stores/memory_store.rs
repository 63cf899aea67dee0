//! In-memory remote store

use std::collections::HashSet;

use parking_lot::RwLock;

use super::traits::{Page, RemoteStoreClient, StoreError, StoreResult};
use crate::types::{Parameter, StoreKind};

#[derive(Debug, Default)]
struct Counters {
    secret_pages: usize,
    parameter_pages: usize,
    lookups: usize,
}

#[derive(Debug, Default)]
struct Failures {
    secret_listing_page: Option<usize>,
    parameter_listing_page: Option<usize>,
    lookups: HashSet<String>,
}

/// In-memory secrets vault and parameter store
///
/// Entries keep insertion order and are paged through with opaque offset
/// tokens, so tests see the same page sequence every time. Listings and
/// lookups can be made to fail, and the number of page requests is counted.
///
/// Secret names match a filter when they start with it. Parameter names
/// match a path when they live directly under it, or anywhere below it when
/// listing recursively.
///
/// # Example
///
/// ```
/// use awsenvsec_core::stores::{MemoryRemoteStore, RemoteStoreClient};
///
/// let store = MemoryRemoteStore::new();
/// store.insert_parameter("/product/dev/DB_HOST", "db.internal");
///
/// let page = store.list_parameters_page("/product/dev", false, 10, None).unwrap();
/// assert_eq!(page.items[0].value, "db.internal");
/// ```
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    secrets: RwLock<Vec<(String, String)>>,
    parameters: RwLock<Vec<Parameter>>,
    counters: RwLock<Counters>,
    failures: RwLock<Failures>,
}

impl MemoryRemoteStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a secret
    pub fn insert_secret(&self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        let mut secrets = self.secrets.write();
        match secrets.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => secrets.push((name, value)),
        }
    }

    /// Add or replace a parameter
    pub fn insert_parameter(&self, name: impl Into<String>, value: impl Into<String>) {
        let parameter = Parameter::new(name, value);
        let mut parameters = self.parameters.write();
        match parameters.iter_mut().find(|p| p.name == parameter.name) {
            Some(existing) => existing.value = parameter.value,
            None => parameters.push(parameter),
        }
    }

    /// Make the secrets listing fail when page `page` (zero-based) is requested
    pub fn fail_secret_listing_at_page(&self, page: usize) {
        self.failures.write().secret_listing_page = Some(page);
    }

    /// Make the parameters listing fail when page `page` (zero-based) is requested
    pub fn fail_parameter_listing_at_page(&self, page: usize) {
        self.failures.write().parameter_listing_page = Some(page);
    }

    /// Make value lookups for `name` fail
    pub fn fail_lookup(&self, name: impl Into<String>) {
        self.failures.write().lookups.insert(name.into());
    }

    /// Remove every injected failure
    pub fn clear_failures(&self) {
        *self.failures.write() = Failures::default();
    }

    /// Number of secret listing pages requested so far
    pub fn secret_pages_requested(&self) -> usize {
        self.counters.read().secret_pages
    }

    /// Number of parameter listing pages requested so far
    pub fn parameter_pages_requested(&self) -> usize {
        self.counters.read().parameter_pages
    }

    /// Number of secret value lookups so far
    pub fn lookups(&self) -> usize {
        self.counters.read().lookups
    }

    pub fn secret_count(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.read().len()
    }
}

/// Decode an offset token
fn offset(store: StoreKind, token: Option<&str>) -> StoreResult<usize> {
    match token {
        None => Ok(0),
        Some(t) => t
            .parse()
            .map_err(|_| StoreError::listing(store, format!("invalid next token: {}", t))),
    }
}

/// Slice one page out of `matching`, starting at the token's offset
fn page_of<T: Clone>(matching: &[T], start: usize, page_size: usize) -> Page<T> {
    let end = matching.len().min(start.saturating_add(page_size.max(1)));
    let items = matching.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
    let next_token = (end < matching.len()).then(|| end.to_string());
    Page::new(items, next_token)
}

fn under_path(prefix: &str, name: &str, recursive: bool) -> bool {
    let prefix = prefix.trim_end_matches('/');
    let rest = match name.strip_prefix(prefix).and_then(|r| r.strip_prefix('/')) {
        Some(rest) if !rest.is_empty() => rest,
        _ => return false,
    };
    recursive || !rest.contains('/')
}

impl RemoteStoreClient for MemoryRemoteStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_secret_names_page(
        &self,
        path_filter: &str,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<String>> {
        let page_index = {
            let mut counters = self.counters.write();
            counters.secret_pages += 1;
            counters.secret_pages - 1
        };
        if self.failures.read().secret_listing_page == Some(page_index) {
            return Err(StoreError::listing(StoreKind::Secrets, "injected listing failure"));
        }

        let start = offset(StoreKind::Secrets, next_token)?;
        let matching: Vec<String> = self
            .secrets
            .read()
            .iter()
            .filter(|(name, _)| name.starts_with(path_filter))
            .map(|(name, _)| name.clone())
            .collect();
        Ok(page_of(&matching, start, page_size))
    }

    fn get_secret_value(&self, name: &str) -> StoreResult<String> {
        self.counters.write().lookups += 1;
        if self.failures.read().lookups.contains(name) {
            return Err(StoreError::lookup(name, "injected lookup failure"));
        }

        self.secrets
            .read()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| StoreError::lookup(name, "secret not found"))
    }

    fn list_parameters_page(
        &self,
        path_prefix: &str,
        recursive: bool,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<Parameter>> {
        let page_index = {
            let mut counters = self.counters.write();
            counters.parameter_pages += 1;
            counters.parameter_pages - 1
        };
        if self.failures.read().parameter_listing_page == Some(page_index) {
            return Err(StoreError::listing(StoreKind::Parameters, "injected listing failure"));
        }

        let start = offset(StoreKind::Parameters, next_token)?;
        let matching: Vec<Parameter> = self
            .parameters
            .read()
            .iter()
            .filter(|p| under_path(path_prefix, &p.name, recursive))
            .cloned()
            .collect();
        Ok(page_of(&matching, start, page_size))
    }
}
