//! Application root shared across screens.
//!
//! [`Storefront`] composes the key-value backend, both stores, the catalog
//! client and the cart badge, and exposes the shopper actions that pair a
//! store mutation with the badge refresh it requires.

use std::sync::Arc;

use emarket_core::{CartLineItem, Product, ProductId, QuantityChange};
use tracing::{debug, info, instrument};

use crate::badge::CartBadge;
use crate::cart::CartStore;
use crate::catalog::{CatalogClient, CatalogError, CatalogViewModel, FilterError, ProductSource};
use crate::config::StorefrontConfig;
use crate::error::add_breadcrumb;
use crate::favorites::FavoritesStore;
use crate::kv::{FileStore, KeyValueStore};

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and owns every long-lived
/// component. There is no global state; pass it where it is needed.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    catalog: Arc<dyn ProductSource>,
    cart: CartStore,
    favorites: FavoritesStore,
    badge: CartBadge,
}

impl Storefront {
    /// Build the production composition: file-backed storage under
    /// `config.data_dir` and the HTTP catalog client.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.data_dir));
        let catalog: Arc<dyn ProductSource> = Arc::new(CatalogClient::new(&config));
        Self::with_parts(config, kv, catalog)
    }

    /// Compose from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        kv: Arc<dyn KeyValueStore>,
        catalog: Arc<dyn ProductSource>,
    ) -> Self {
        let cart = CartStore::new(Arc::clone(&kv));
        let favorites = FavoritesStore::new(kv);
        let badge = CartBadge::new(cart.clone());

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                catalog,
                cart,
                favorites,
                badge,
            }),
        }
    }

    /// Initialize the badge from the persisted cart.
    pub async fn start(&self) -> u32 {
        self.inner.badge.refresh().await
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product source.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductSource {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the favorites store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    /// Get a reference to the cart badge.
    #[must_use]
    pub fn badge(&self) -> &CartBadge {
        &self.inner.badge
    }

    /// A catalog view model loaded from this storefront's product source.
    pub async fn load_catalog(&self) -> CatalogViewModel {
        let mut catalog = CatalogViewModel::new();
        catalog.load(self.catalog()).await;
        catalog
    }

    /// Load the catalog, apply the given filters and reveal up to `pages`
    /// pages.
    ///
    /// A failed fetch is not an error: the view model is left in
    /// [`LoadPhase::Failed`](crate::catalog::LoadPhase::Failed) with nothing
    /// visible.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `max_price` is not a number.
    pub async fn browse_catalog(
        &self,
        search: Option<&str>,
        max_price: Option<&str>,
        pages: usize,
    ) -> Result<CatalogViewModel, FilterError> {
        let mut catalog = self.load_catalog().await;
        if let Some(search) = search {
            catalog.set_search(search);
        }
        if let Some(max_price) = max_price {
            catalog.apply_price_filter(max_price)?;
        }
        for _ in 1..pages {
            if !catalog.load_more() {
                break;
            }
        }
        Ok(catalog)
    }

    /// Look up a product in the catalog, falling back to the stored
    /// favorite record when the catalog cannot supply it.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the product is in neither.
    #[instrument(skip(self))]
    pub async fn find_product(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        match self.catalog().get_product(product_id).await {
            Ok(product) => Ok(product),
            Err(e) => {
                let favorite = self
                    .inner
                    .favorites
                    .get_favorites()
                    .await
                    .into_iter()
                    .find(|favorite| &favorite.id == product_id);
                match favorite {
                    Some(product) => {
                        debug!(error = %e, "Using stored favorite record");
                        Ok(product)
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Add one unit to the cart and refresh the badge.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product) -> Vec<CartLineItem> {
        let items = self.inner.cart.add_to_cart(product).await;
        self.inner.badge.refresh().await;
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));
        info!("{} has been added to cart!", product.name);
        items
    }

    /// Change a line quantity and refresh the badge.
    #[instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        product_id: &ProductId,
        change: QuantityChange,
    ) -> Vec<CartLineItem> {
        let items = self.inner.cart.update_quantity(product_id, change).await;
        self.inner.badge.refresh().await;
        add_breadcrumb(
            "cart",
            "Changed quantity",
            Some(&[
                ("product_id", product_id.as_str()),
                ("change", &change.to_string()),
            ]),
        );
        items
    }

    /// Remove a line from the cart and refresh the badge.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Vec<CartLineItem> {
        let items = self.inner.cart.remove_from_cart(product_id).await;
        self.inner.badge.refresh().await;
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", product_id.as_str())]));
        items
    }

    /// Flip the favorite state of `product`. Returns the new state.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn toggle_favorite(&self, product: &Product) -> bool {
        let favorite = self.inner.favorites.toggle_favorite(product).await;
        add_breadcrumb(
            "favorites",
            "Toggled favorite",
            Some(&[("product_id", product.id.as_str())]),
        );
        if favorite {
            info!("{} has been added to favorites!", product.name);
        } else {
            info!("{} has been removed from favorites!", product.name);
        }
        favorite
    }
}
