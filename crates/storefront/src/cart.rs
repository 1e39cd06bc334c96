//! Cart store.
//!
//! Owns the cart snapshot under [`keys::CART_ITEMS`]: an insertion-ordered
//! array of line items with at most one line per product id. Every operation
//! re-reads the full snapshot, mutates it and writes it back.
//!
//! All operations are fail-soft. An unreadable snapshot is treated as an
//! empty cart, and a failed write is logged while the updated list is still
//! returned to the caller (no rollback, no retry).

use std::sync::Arc;

use emarket_core::{CartLineItem, Product, ProductId, QuantityChange};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::kv::{KeyValueStore, keys};
use crate::snapshot::{self, SnapshotLoad};

/// Handle to the persisted cart.
///
/// Cheaply cloneable via `Arc`. Clones share one lock, so concurrent
/// mutations through the same handle never lose updates. Independent handles
/// over the same backend are not coordinated.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Create a cart store over a key-value backend.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                kv,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Read and classify the stored snapshot.
    pub async fn load_snapshot(&self) -> SnapshotLoad<CartLineItem> {
        snapshot::load(self.inner.kv.as_ref(), keys::CART_ITEMS).await
    }

    /// Current line items, empty if nothing readable is stored.
    pub async fn get_cart_items(&self) -> Vec<CartLineItem> {
        self.load_snapshot().await.into_items()
    }

    /// Add one unit of `product`, appending a new line on first add.
    ///
    /// Returns the updated cart.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product) -> Vec<CartLineItem> {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.get_cart_items().await;

        match items.iter_mut().find(|item| item.id() == &product.id) {
            Some(item) => item.increment(),
            None => items.push(CartLineItem::new(product.clone())),
        }

        if self.persist(&items).await {
            info!(name = %product.name, "Product added to cart");
        }
        items
    }

    /// Increase or decrease the quantity of a line.
    ///
    /// Decreasing a line at quantity 1 removes it. An unknown `product_id`
    /// is a no-op and nothing is written. Returns the updated cart.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: &ProductId,
        change: QuantityChange,
    ) -> Vec<CartLineItem> {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.get_cart_items().await;

        let Some(index) = items.iter().position(|item| item.id() == product_id) else {
            debug!("Product not in cart, nothing to update");
            return items;
        };

        let keep = items.get_mut(index).is_some_and(|item| match change {
            QuantityChange::Increase => {
                item.increment();
                true
            }
            QuantityChange::Decrease => item.decrement(),
        });
        if !keep {
            items.remove(index);
            debug!("Quantity reached zero, line removed");
        }

        if self.persist(&items).await {
            debug!(lines = items.len(), "Cart saved");
        }
        items
    }

    /// Remove the line for `product_id`. Returns the updated cart.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Vec<CartLineItem> {
        let _guard = self.inner.write_lock.lock().await;
        let mut items = self.get_cart_items().await;
        items.retain(|item| item.id() != product_id);
        if self.persist(&items).await {
            debug!(lines = items.len(), "Cart saved");
        }
        items
    }

    /// Total quantity across all lines; 0 when nothing readable is stored.
    pub async fn get_cart_item_count(&self) -> u32 {
        item_count(&self.get_cart_items().await)
    }

    /// Sum of `price * quantity` across all lines.
    pub async fn get_total_price(&self) -> f64 {
        total_price(&self.get_cart_items().await)
    }

    /// Write the snapshot; `false` if the write failed (already logged).
    async fn persist(&self, items: &[CartLineItem]) -> bool {
        snapshot::save(self.inner.kv.as_ref(), keys::CART_ITEMS, items).await
    }
}

/// Total quantity of `items`, saturating at `u32::MAX`.
#[must_use]
pub fn item_count(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |sum, item| sum.saturating_add(item.quantity.get()))
}

/// Floating-point total of `items`. Lines with a non-numeric price add nothing.
#[must_use]
pub fn total_price(items: &[CartLineItem]) -> f64 {
    items
        .iter()
        .map(|item| {
            item.line_total().unwrap_or_else(|| {
                warn!(
                    product_id = %item.id(),
                    price = %item.product.price,
                    "Ignoring non-numeric price in cart total"
                );
                0.0
            })
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn store() -> (MemoryStore, CartStore) {
        let kv = MemoryStore::new();
        let cart = CartStore::new(Arc::new(kv.clone()));
        (kv, cart)
    }

    fn shoe() -> Product {
        Product::new("1", "Shoe", "20")
    }

    fn quantities(items: &[CartLineItem]) -> Vec<(&str, u32)> {
        items
            .iter()
            .map(|item| (item.id().as_str(), item.quantity.get()))
            .collect()
    }

    #[tokio::test]
    async fn test_add_twice_increments_single_line() {
        let (_, cart) = store();
        cart.add_to_cart(&shoe()).await;
        let items = cart.add_to_cart(&shoe()).await;

        assert_eq!(quantities(&items), vec![("1", 2)]);
        assert_eq!(cart.get_cart_items().await, items);
    }

    #[tokio::test]
    async fn test_add_appends_in_insertion_order() {
        let (_, cart) = store();
        cart.add_to_cart(&Product::new("b", "Bag", "5")).await;
        cart.add_to_cart(&Product::new("a", "Axe", "7")).await;
        let items = cart.add_to_cart(&Product::new("b", "Bag", "5")).await;

        assert_eq!(quantities(&items), vec![("b", 2), ("a", 1)]);
    }

    #[tokio::test]
    async fn test_decrease_from_one_removes_line() {
        let (_, cart) = store();
        cart.add_to_cart(&shoe()).await;
        cart.add_to_cart(&Product::new("2", "Hat", "3")).await;

        let items = cart
            .update_quantity(&ProductId::new("1"), QuantityChange::Decrease)
            .await;
        assert_eq!(quantities(&items), vec![("2", 1)]);
        assert_eq!(cart.get_cart_item_count().await, 1);
    }

    #[tokio::test]
    async fn test_increase_and_decrease() {
        let (_, cart) = store();
        cart.add_to_cart(&shoe()).await;
        let id = ProductId::new("1");

        cart.update_quantity(&id, QuantityChange::Increase).await;
        cart.update_quantity(&id, QuantityChange::Increase).await;
        let items = cart.update_quantity(&id, QuantityChange::Decrease).await;
        assert_eq!(quantities(&items), vec![("1", 2)]);
    }

    #[tokio::test]
    async fn test_update_unknown_product_does_not_write() {
        let (kv, cart) = store();
        let items = cart
            .update_quantity(&ProductId::new("missing"), QuantityChange::Increase)
            .await;
        assert!(items.is_empty());
        assert!(kv.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_from_cart() {
        let (_, cart) = store();
        cart.add_to_cart(&shoe()).await;
        cart.add_to_cart(&Product::new("2", "Hat", "3")).await;

        let items = cart.remove_from_cart(&ProductId::new("1")).await;
        assert_eq!(quantities(&items), vec![("2", 1)]);
        assert_eq!(cart.get_cart_items().await, items);
    }

    #[tokio::test]
    async fn test_count_and_total() {
        let (_, cart) = store();
        assert_eq!(cart.get_cart_item_count().await, 0);
        assert!(cart.get_total_price().await.abs() < f64::EPSILON);

        cart.add_to_cart(&shoe()).await;
        cart.add_to_cart(&shoe()).await;
        cart.add_to_cart(&Product::new("2", "Sock", "2.5")).await;

        assert_eq!(cart.get_cart_item_count().await, 3);
        assert!((cart.get_total_price().await - 42.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_total_ignores_non_numeric_price() {
        let (_, cart) = store();
        cart.add_to_cart(&shoe()).await;
        cart.add_to_cart(&Product::new("x", "Mystery", "ask")).await;
        assert!((cart.get_total_price().await - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_recovers_as_empty() {
        let (kv, cart) = store();
        kv.set(keys::CART_ITEMS, "not json".to_string()).await.unwrap();

        assert!(cart.load_snapshot().await.is_corrupt());
        assert_eq!(cart.get_cart_item_count().await, 0);

        // The next successful write replaces the corrupt value.
        let items = cart.add_to_cart(&shoe()).await;
        assert_eq!(quantities(&items), vec![("1", 1)]);
        assert!(matches!(cart.load_snapshot().await, SnapshotLoad::Loaded(_)));
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_distinguishable() {
        let (_, cart) = store();
        assert_eq!(cart.load_snapshot().await, SnapshotLoad::Missing);
    }

    #[tokio::test]
    async fn test_write_failure_still_returns_update() {
        let (kv, cart) = store();
        kv.set_fail_writes(true);

        let items = cart.add_to_cart(&shoe()).await;
        assert_eq!(quantities(&items), vec![("1", 1)]);
        assert_eq!(cart.get_cart_items().await, Vec::new());
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_stored_cart() {
        let (kv, cart) = store();
        cart.add_to_cart(&shoe()).await;

        kv.set_fail_writes(true);
        assert!(cart.remove_from_cart(&shoe().id).await.is_empty());
        let items = cart
            .update_quantity(&shoe().id, QuantityChange::Increase)
            .await;
        assert_eq!(quantities(&items), vec![("1", 2)]);
        assert_eq!(quantities(&cart.get_cart_items().await), vec![("1", 1)]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_through_one_handle() {
        let (_, cart) = store();
        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let cart = cart.clone();
                tokio::spawn(async move { cart.add_to_cart(&shoe()).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(cart.get_cart_item_count().await, 20);
    }
}
