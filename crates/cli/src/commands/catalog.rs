//! Catalog listing and product detail.

use emarket_core::{Product, ProductId};
use emarket_storefront::catalog::LoadPhase;
use emarket_storefront::{Result, Storefront};
use tracing::{info, warn};

/// List up to `pages` pages of the catalog after applying the filters.
///
/// An unreachable catalog lists nothing.
///
/// # Errors
///
/// Returns an error if `max_price` is not a number.
pub async fn list(
    storefront: &Storefront,
    search: Option<&str>,
    max_price: Option<&str>,
    pages: usize,
) -> Result<()> {
    let catalog = storefront.browse_catalog(search, max_price, pages).await?;

    if catalog.phase() == LoadPhase::Failed {
        warn!("Catalog is unavailable, try again later");
    }
    for product in catalog.visible() {
        info!("{}", product_line(product));
    }
    info!(
        "Showing {} of {} products (page {}{})",
        catalog.visible().len(),
        catalog.filtered_len(),
        catalog.page(),
        if catalog.has_more() { ", more available" } else { "" }
    );
    Ok(())
}

/// Show one product with its favorite state.
///
/// # Errors
///
/// Returns an error if neither the catalog nor favorites hold the product.
pub async fn show(storefront: &Storefront, product_id: &ProductId) -> Result<()> {
    let product = storefront.find_product(product_id).await?;
    let favorite = storefront.favorites().is_favorite(product_id).await;

    info!("{}", product.name);
    info!("  ID: {}", product.id);
    info!("  Price: {}", product.price.display());
    if !product.image.is_empty() {
        info!("  Image: {}", product.image);
    }
    if !product.description.is_empty() {
        info!("  {}", product.description);
    }
    info!("  Favorite: {}", if favorite { "yes" } else { "no" });
    Ok(())
}

/// One-line summary used by the listing commands.
pub fn product_line(product: &Product) -> String {
    format!("[{}] {} - {}", product.id, product.name, product.price.display())
}
