//! Remote store abstractions
//!
//! This module provides:
//! - `RemoteStoreClient`, the capability set the pipeline needs from a
//!   secrets vault and a parameter store
//! - Bounded, lazy pagination over that client
//! - `MemoryRemoteStore`, an in-memory client for tests and embedding

mod traits;
mod pagination;
mod memory_store;

pub use traits::{Page, RemoteStoreClient, StoreError, StoreResult};
pub use pagination::{list_parameters, list_secret_names, Pages, MAX_PAGES, PAGE_SIZE};
pub use memory_store::MemoryRemoteStore;
