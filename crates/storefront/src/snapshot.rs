//! Whole-collection snapshots stored under a single key.
//!
//! Stores never persist incrementally: every operation reads the full
//! snapshot, mutates it in memory and writes it back. Reading classifies the
//! stored text so "nothing saved yet" and "saved but unreadable" stay
//! distinguishable, while [`SnapshotLoad::into_items`] is the one place both
//! collapse into an empty collection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::kv::KeyValueStore;

/// Outcome of reading a snapshot key.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotLoad<T> {
    /// Nothing stored under the key (or an empty value).
    Missing,
    /// The stored text decoded successfully.
    Loaded(Vec<T>),
    /// The key could not be read or its text did not decode.
    Corrupt {
        /// Human-readable cause, for logs and tests.
        reason: String,
    },
}

impl<T> SnapshotLoad<T> {
    /// Decode failure and absence both recover as an empty collection.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Loaded(items) => items,
            Self::Missing | Self::Corrupt { .. } => Vec::new(),
        }
    }

    /// Whether the stored data had to be discarded.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Decode raw stored text into a snapshot.
#[must_use]
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> SnapshotLoad<T> {
    match raw {
        None => SnapshotLoad::Missing,
        Some(text) if text.trim().is_empty() => SnapshotLoad::Missing,
        Some(text) => match serde_json::from_str::<Vec<T>>(text) {
            Ok(items) => SnapshotLoad::Loaded(items),
            Err(e) => SnapshotLoad::Corrupt {
                reason: e.to_string(),
            },
        },
    }
}

/// Encode a collection as snapshot text.
///
/// # Errors
///
/// Returns `serde_json::Error` if an item cannot be serialized.
pub fn encode<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Read and classify the snapshot stored under `key`, logging any recovery.
pub async fn load<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> SnapshotLoad<T> {
    let loaded = match kv.get(key).await {
        Ok(raw) => decode(raw.as_deref()),
        Err(e) => {
            error!(key = %key, error = %e, "Failed to read snapshot");
            SnapshotLoad::Corrupt {
                reason: e.to_string(),
            }
        }
    };

    if let SnapshotLoad::Corrupt { reason } = &loaded {
        warn!(key = %key, reason = %reason, "Recovering unreadable snapshot as empty");
    }

    loaded
}

/// Encode and write a snapshot. Failures are logged and reported as `false`.
pub async fn save<T: Serialize>(kv: &dyn KeyValueStore, key: &str, items: &[T]) -> bool {
    let text = match encode(items) {
        Ok(text) => text,
        Err(e) => {
            error!(key = %key, error = %e, "Failed to encode snapshot");
            return false;
        }
    };

    match kv.set(key, text).await {
        Ok(()) => true,
        Err(e) => {
            error!(key = %key, error = %e, "Failed to write snapshot");
            false
        }
    }
}
