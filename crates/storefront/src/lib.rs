//! eMarket storefront library.
//!
//! Cart and favorites persistence over a key-value store, the product
//! catalog with client-side filtering and pagination, and the cart badge.
//! [`Storefront`] composes them into one application root.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod badge;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod kv;
pub mod snapshot;
pub mod state;

pub use badge::CartBadge;
pub use cart::CartStore;
pub use catalog::{CatalogClient, CatalogError, CatalogViewModel, ProductSource};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use favorites::FavoritesStore;
pub use kv::{FileStore, KeyValueStore, KvError, MemoryStore};
pub use state::Storefront;
