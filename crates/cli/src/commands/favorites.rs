//! Favorites commands.

use emarket_core::ProductId;
use emarket_storefront::{Result, Storefront};
use tracing::info;

use super::catalog::product_line;

/// List favorites in insertion order.
pub async fn list(storefront: &Storefront) {
    let favorites = storefront.favorites().get_favorites().await;
    if favorites.is_empty() {
        info!("No favorites yet");
        return;
    }
    for product in &favorites {
        info!("{}", product_line(product));
    }
}

/// Add a catalog product to favorites.
///
/// # Errors
///
/// Returns an error if neither the catalog nor favorites hold the product.
pub async fn add(storefront: &Storefront, product_id: &ProductId) -> Result<()> {
    let product = storefront.find_product(product_id).await?;
    let favorites = storefront.favorites().add_to_favorites(&product).await;
    info!("Favorites: {}", favorites.len());
    Ok(())
}

/// Remove a product from favorites. Works for products no longer in the
/// catalog.
pub async fn remove(storefront: &Storefront, product_id: &ProductId) {
    let favorites = storefront.favorites().remove_from_favorites(product_id).await;
    info!("Favorites: {}", favorites.len());
}

/// Flip the favorite state of a catalog product.
///
/// # Errors
///
/// Returns an error if neither the catalog nor favorites hold the product.
pub async fn toggle(storefront: &Storefront, product_id: &ProductId) -> Result<()> {
    let product = storefront.find_product(product_id).await?;
    storefront.toggle_favorite(&product).await;
    Ok(())
}
