//! In-memory key-value adapter.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, KvError};

/// Key-value store backed by a `HashMap`.
///
/// Cheaply cloneable; clones share the same map. Reads and writes can be
/// switched into a failing mode to exercise fail-soft callers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`remove` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.entries.read().await.is_empty()
    }

    fn check_writes(&self) -> Result<(), KvError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("fail_reads", &self.inner.fail_reads.load(Ordering::SeqCst))
            .field("fail_writes", &self.inner.fail_writes.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.inner.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), KvError> {
        self.check_writes()?;
        self.inner
            .entries
            .write()
            .await
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KvError> {
        self.check_writes()?;
        self.inner.entries.write().await.remove(key);
        Ok(())
    }
}
