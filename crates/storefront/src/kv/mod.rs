//! Key-value persistence port.
//!
//! The storefront persists each collection as one serialized text blob under
//! one string key. [`KeyValueStore`] is the only thing the stores know about
//! storage; adapters decide where the text lives.
//!
//! # Adapters
//!
//! - [`MemoryStore`] - in-process map, with switchable failure modes for tests
//! - [`FileStore`] - one file per key inside a data directory
//!
//! There is no atomicity across keys.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Standard storage keys used across the application.
pub mod keys {
    /// Cart snapshot (array of line items).
    pub const CART_ITEMS: &str = "cartItems";
    /// Favorites snapshot (array of products).
    pub const FAVORITES: &str = "favorites";
}

/// Errors raised by key-value adapters.
#[derive(Debug, Error)]
pub enum KvError {
    /// Filesystem operation failed.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Async string-keyed text storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), KvError>;

    /// Delete `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), KvError>;
}
