//! Catalog products and cart line items.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;

/// A product as returned by the remote catalog.
///
/// Treated as immutable. Fields this crate does not model (`brand`, `model`,
/// `createdAt`, ...) are kept in [`Product::extra`] so favorites and cart
/// snapshots store the full record verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name, matched by the search filter.
    pub name: String,
    /// Unit price as decimal text.
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Long description for the detail screen.
    #[serde(default)]
    pub description: String,
    /// Any other catalog fields, preserved as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra catalog fields.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: String::new(),
            description: String::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// A product plus a quantity within the cart.
///
/// Serialized flat: the product fields and `quantity` live side by side, as
/// `{"id": "1", "name": "Shoe", "price": "20", "quantity": 2}`. Quantity is a
/// [`NonZeroU32`], so a persisted `0` fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    /// A fresh line item with quantity 1.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The product identifier of this line.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Add one unit, saturating at `u32::MAX`.
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Remove one unit.
    ///
    /// Returns `false` when the line would drop to zero; the quantity is left
    /// untouched and the caller is expected to remove the line.
    pub fn decrement(&mut self) -> bool {
        match NonZeroU32::new(self.quantity.get() - 1) {
            Some(quantity) => {
                self.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Unit price times quantity, or `None` if the price is not numeric.
    #[must_use]
    pub fn line_total(&self) -> Option<f64> {
        self.product
            .price
            .to_f64()
            .map(|unit| unit * f64::from(self.quantity.get()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults_missing_fields() {
        let product: Product =
            serde_json::from_str(r#"{"id":"1","name":"Shoe","price":"20"}"#).unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert!(product.image.is_empty());
        assert!(product.description.is_empty());
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_product_preserves_unknown_fields() {
        let json = r#"{"id":"3","name":"Lamp","price":"99","brand":"Acme","createdAt":"2023-07-17T07:21:02.529Z"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.extra.get("brand"), Some(&Value::from("Acme")));

        let back: Value = serde_json::to_value(&product).unwrap();
        assert_eq!(back["createdAt"], "2023-07-17T07:21:02.529Z");
    }

    #[test]
    fn test_line_item_serializes_flat() {
        let mut item = CartLineItem::new(Product::new("1", "Shoe", "20"));
        item.increment();

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["quantity"], 2);
        assert!(value.get("product").is_none());

        let decoded: CartLineItem = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, item);
        assert!(decoded.product.extra.get("quantity").is_none());
    }

    #[test]
    fn test_line_item_rejects_zero_quantity() {
        let json = r#"{"id":"1","name":"Shoe","price":"20","quantity":0}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut item = CartLineItem::new(Product::new("1", "Shoe", "20"));
        item.increment();
        assert!(item.decrement());
        assert_eq!(item.quantity.get(), 1);
        assert!(!item.decrement());
        assert_eq!(item.quantity.get(), 1);
    }

    #[test]
    fn test_line_total() {
        let mut item = CartLineItem::new(Product::new("1", "Shoe", "19.5"));
        item.increment();
        assert!((item.line_total().unwrap() - 39.0).abs() < f64::EPSILON);

        let broken = CartLineItem::new(Product::new("2", "Mystery", "?"));
        assert!(broken.line_total().is_none());
    }
}
