//! Cart badge notifier.
//!
//! Publishes the total cart quantity to any number of observers through a
//! `tokio::sync::watch` channel. The count is only recomputed on an explicit
//! [`CartBadge::refresh`]; nothing watches storage, so a cart mutation that
//! skips the refresh leaves the badge stale until the next one.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::cart::CartStore;

/// Observable cart quantity, owned by the application root.
#[derive(Clone)]
pub struct CartBadge {
    inner: Arc<CartBadgeInner>,
}

struct CartBadgeInner {
    cart: CartStore,
    sender: watch::Sender<u32>,
}

impl CartBadge {
    /// Create a badge reading from `cart`. The count starts at 0.
    #[must_use]
    pub fn new(cart: CartStore) -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            inner: Arc::new(CartBadgeInner { cart, sender }),
        }
    }

    /// Last published count.
    #[must_use]
    pub fn count(&self) -> u32 {
        *self.inner.sender.borrow()
    }

    /// Observe the count. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.inner.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Re-read the cart and publish the total to every subscriber.
    ///
    /// Subscribers are woken even when the total is unchanged.
    pub async fn refresh(&self) -> u32 {
        let count = self.inner.cart.get_cart_item_count().await;
        self.inner.sender.send_replace(count);
        debug!(
            count,
            subscribers = self.inner.sender.receiver_count(),
            "Cart badge refreshed"
        );
        count
    }
}

impl std::fmt::Debug for CartBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartBadge")
            .field("count", &self.count())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
