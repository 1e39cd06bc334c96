//! Favorites store.
//!
//! Owns the favorites snapshot under [`keys::FAVORITES`]: full product records
//! with set semantics keyed by product id. Same fail-soft rules as the cart.

use std::sync::Arc;

use emarket_core::{Product, ProductId};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::kv::{KeyValueStore, keys};
use crate::snapshot::{self, SnapshotLoad};

/// Handle to the persisted favorites list.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<FavoritesStoreInner>,
}

struct FavoritesStoreInner {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    /// Create a favorites store over a key-value backend.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(FavoritesStoreInner {
                kv,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Read and classify the stored snapshot.
    pub async fn load_snapshot(&self) -> SnapshotLoad<Product> {
        snapshot::load(self.inner.kv.as_ref(), keys::FAVORITES).await
    }

    /// All favorites, empty if nothing readable is stored.
    pub async fn get_favorites(&self) -> Vec<Product> {
        self.load_snapshot().await.into_items()
    }

    /// Whether `product_id` is currently a favorite.
    pub async fn is_favorite(&self, product_id: &ProductId) -> bool {
        contains(&self.get_favorites().await, product_id)
    }

    /// Add `product` unless it is already present. Returns the updated list.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_favorites(&self, product: &Product) -> Vec<Product> {
        let _guard = self.inner.write_lock.lock().await;
        let mut favorites = self.get_favorites().await;
        if !self.insert(&mut favorites, product).await {
            debug!("Product already in favorites");
        }
        favorites
    }

    /// Remove `product_id`. Returns the updated list.
    #[instrument(skip(self))]
    pub async fn remove_from_favorites(&self, product_id: &ProductId) -> Vec<Product> {
        let _guard = self.inner.write_lock.lock().await;
        let mut favorites = self.get_favorites().await;
        self.delete(&mut favorites, product_id).await;
        favorites
    }

    /// Flip the favorite state of `product`.
    ///
    /// Returns `true` if the product is a favorite afterwards.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle_favorite(&self, product: &Product) -> bool {
        let _guard = self.inner.write_lock.lock().await;
        let mut favorites = self.get_favorites().await;
        if contains(&favorites, &product.id) {
            self.delete(&mut favorites, &product.id).await;
            false
        } else {
            self.insert(&mut favorites, product).await;
            true
        }
    }

    /// Append and persist; `false` if the id was already present.
    async fn insert(&self, favorites: &mut Vec<Product>, product: &Product) -> bool {
        if contains(favorites, &product.id) {
            return false;
        }
        favorites.push(product.clone());
        if self.persist(favorites).await {
            info!(name = %product.name, "Added to favorites");
        }
        true
    }

    async fn delete(&self, favorites: &mut Vec<Product>, product_id: &ProductId) {
        favorites.retain(|favorite| &favorite.id != product_id);
        if self.persist(favorites).await {
            info!("Removed from favorites");
        }
    }

    /// Write the snapshot; `false` if the write failed (already logged).
    async fn persist(&self, favorites: &[Product]) -> bool {
        snapshot::save(self.inner.kv.as_ref(), keys::FAVORITES, favorites).await
    }
}

fn contains(favorites: &[Product], product_id: &ProductId) -> bool {
    favorites.iter().any(|favorite| &favorite.id == product_id)
}
