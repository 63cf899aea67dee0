//! Core traits and types for remote store access

use thiserror::Error;

use crate::types::{Parameter, StoreKind};

/// Errors reported by a remote store client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("There was a problem listing from {store}: {message}")]
    Listing { store: StoreKind, message: String },

    #[error("There was a problem decrypting the secret {name}: {message}")]
    Lookup { name: String, message: String },

    #[error("Secret {0} has no string value")]
    MissingValue(String),
}

impl StoreError {
    /// Create a listing error
    pub fn listing(store: StoreKind, message: impl std::fmt::Display) -> Self {
        Self::Listing {
            store,
            message: message.to_string(),
        }
    }

    /// Create a lookup error
    pub fn lookup(name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Lookup {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A final page
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// Read-only access to a secrets vault and a parameter store
///
/// Implementations own transport, authentication and decryption. Each call
/// fetches exactly one page or one value; pagination bounds are applied by
/// `list_secret_names` and `list_parameters`.
///
/// # Example
///
/// ```
/// use awsenvsec_core::stores::{MemoryRemoteStore, RemoteStoreClient};
///
/// let store = MemoryRemoteStore::new();
/// store.insert_secret("product/dev/api", "{\"token\":\"abc\"}");
///
/// let page = store.list_secret_names_page("product/dev", 10, None).unwrap();
/// assert_eq!(page.items, vec!["product/dev/api".to_string()]);
/// assert_eq!(store.get_secret_value("product/dev/api").unwrap(), "{\"token\":\"abc\"}");
/// ```
pub trait RemoteStoreClient: Send + Sync {
    /// Human-readable name of this client
    fn name(&self) -> &str;

    /// List one page of secret names matching `path_filter`
    fn list_secret_names_page(
        &self,
        path_filter: &str,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<String>>;

    /// Resolve the decrypted value of one secret
    fn get_secret_value(&self, name: &str) -> StoreResult<String>;

    /// List one page of decrypted parameters under `path_prefix`
    fn list_parameters_page(
        &self,
        path_prefix: &str,
        recursive: bool,
        page_size: usize,
        next_token: Option<&str>,
    ) -> StoreResult<Page<Parameter>>;
}
