//! Cart commands.

use emarket_core::{ProductId, QuantityChange, format_amount};
use emarket_storefront::cart::total_price;
use emarket_storefront::{Result, Storefront};
use tracing::info;

/// List cart lines and the total.
pub async fn show(storefront: &Storefront) {
    let items = storefront.cart().get_cart_items().await;
    if items.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for item in &items {
        info!(
            "[{}] {} x{} - {}",
            item.id(),
            item.product.name,
            item.quantity,
            item.line_total()
                .map_or_else(|| item.product.price.display(), format_amount)
        );
    }
    info!("Total: {}", format_amount(total_price(&items)));
}

/// Print the badge count.
pub fn count(storefront: &Storefront) {
    info!("{}", storefront.badge().count());
}

/// Print the cart total.
pub async fn total(storefront: &Storefront) {
    info!("{}", format_amount(storefront.cart().get_total_price().await));
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if neither the catalog nor favorites hold the product.
pub async fn add(storefront: &Storefront, product_id: &ProductId) -> Result<()> {
    let product = storefront.find_product(product_id).await?;
    storefront.add_to_cart(&product).await;
    info!("Cart: {} item(s)", storefront.badge().count());
    Ok(())
}

/// Increase or decrease a line quantity.
pub async fn change(storefront: &Storefront, product_id: &ProductId, change: QuantityChange) {
    let items = storefront.change_quantity(product_id, change).await;
    match items.iter().find(|item| item.id() == product_id) {
        Some(item) => info!("{} x{}", item.product.name, item.quantity),
        None => info!("{product_id} is not in the cart"),
    }
    info!("Cart: {} item(s)", storefront.badge().count());
}

/// Remove a line.
pub async fn remove(storefront: &Storefront, product_id: &ProductId) {
    storefront.remove_from_cart(product_id).await;
    info!("Cart: {} item(s)", storefront.badge().count());
}
