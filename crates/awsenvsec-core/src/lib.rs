//! awsenvsec core
//!
//! Transport-agnostic pipeline that turns secrets and parameters from two
//! remote stores into one flat set of environment variables.
//!
//! Data flows leaf-first through:
//! - `stores`: the `RemoteStoreClient` capability set and bounded pagination
//! - `decoder`: value resolution and JSON-object detection
//! - `normalize`: environment variable names from paths and field names
//! - `aggregator`: last-writer-wins merge of both stores
//! - `presenter`: `export` lines, sorted env lines, or indented JSON
//!
//! ```rust
//! use std::sync::Arc;
//! use awsenvsec_core::{Aggregator, MemoryRemoteStore, NoOpLogger, OutputMode, Presenter, RunConfig};
//!
//! let store = MemoryRemoteStore::new();
//! store.insert_secret("product/dev/DB_PASSWORD", "hunter2");
//!
//! let config = RunConfig::new().with_secrets_path("product/dev");
//! let result = Aggregator::new(&store, Arc::new(NoOpLogger::new())).run(&config);
//!
//! let out = Presenter::new(OutputMode::Export, "").render(&result).unwrap();
//! assert_eq!(out, "export DB_PASSWORD=$\"hunter2\"\n");
//! ```

pub mod types;
pub mod stores;
pub mod decoder;
pub mod normalize;
pub mod aggregator;
pub mod presenter;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use types::{DecodedValue, NormalizedPair, OutputMode, Parameter, RawEntry, StoreKind};

pub use stores::{
    MemoryRemoteStore, Page, RemoteStoreClient, StoreError, StoreResult,
    list_parameters, list_secret_names, MAX_PAGES, PAGE_SIZE,
};

pub use decoder::{classify, EntryDecoder};

pub use normalize::{key_from_field, key_from_path};

pub use aggregator::{Aggregator, ResultMap};

pub use presenter::{PresentError, PresentResult, Presenter};

pub use config::{ConfigError, ConfigResult, RunConfig};

pub use logging::{ConsoleLogger, LogLevel, Logger, MemoryLogger, NoOpLogger, SharedLogger};
