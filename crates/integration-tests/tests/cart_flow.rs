//! End-to-end shopper flows against file-backed storage.
//!
//! Each test gets its own temporary data directory, so runs are isolated and
//! leave nothing behind.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use emarket_core::{Product, ProductId, QuantityChange};
use emarket_integration_tests::{FlakySource, file_storefront, numbered_products};
use emarket_storefront::catalog::{CatalogViewModel, LoadPhase, PAGE_SIZE, ProductSource};
use emarket_storefront::kv::keys;
use emarket_storefront::snapshot::SnapshotLoad;
use emarket_storefront::{FileStore, KeyValueStore, Storefront, StorefrontConfig};

#[tokio::test]
async fn test_shopper_adds_and_adjusts_cart() {
    let dir = tempfile::tempdir().unwrap();
    let storefront = file_storefront(dir.path(), Vec::new());
    let shoe = Product::new("1", "Shoe", "20");

    assert_eq!(storefront.start().await, 0);

    storefront.add_to_cart(&shoe).await;
    let items = storefront.add_to_cart(&shoe).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity.get(), 2);
    assert_eq!(storefront.badge().count(), 2);
    assert!((storefront.cart().get_total_price().await - 40.0).abs() < f64::EPSILON);

    storefront
        .change_quantity(&shoe.id, QuantityChange::Decrease)
        .await;
    let items = storefront
        .change_quantity(&shoe.id, QuantityChange::Decrease)
        .await;
    assert!(items.is_empty());
    assert_eq!(storefront.badge().count(), 0);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let shoe = Product::new("1", "Shoe", "20").with_image("https://example.com/shoe.png");
    let hat = Product::new("2", "Hat", "5.50");

    {
        let storefront = file_storefront(dir.path(), Vec::new());
        storefront.add_to_cart(&shoe).await;
        storefront.add_to_cart(&hat).await;
        storefront.add_to_cart(&shoe).await;
    }

    let restarted = file_storefront(dir.path(), Vec::new());
    assert_eq!(restarted.start().await, 3);

    let items = restarted.cart().get_cart_items().await;
    let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(items[0].product, shoe);
    assert!((restarted.cart().get_total_price().await - 45.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_corrupt_cart_file_recovers_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store
        .set(keys::CART_ITEMS, "{not json".to_string())
        .await
        .unwrap();

    let storefront = file_storefront(dir.path(), Vec::new());
    assert!(storefront.cart().load_snapshot().await.is_corrupt());
    assert_eq!(storefront.start().await, 0);

    // The next mutation overwrites the unreadable snapshot.
    storefront.add_to_cart(&Product::new("1", "Shoe", "20")).await;
    assert!(matches!(
        storefront.cart().load_snapshot().await,
        SnapshotLoad::Loaded(items) if items.len() == 1
    ));
}

#[tokio::test]
async fn test_favorites_are_idempotent_and_independent_of_cart() {
    let dir = tempfile::tempdir().unwrap();
    let storefront = file_storefront(dir.path(), Vec::new());
    let lamp = Product::new("7", "Lamp", "30");

    storefront.favorites().add_to_favorites(&lamp).await;
    let favorites = storefront.favorites().add_to_favorites(&lamp).await;
    assert_eq!(favorites, vec![lamp.clone()]);
    assert!(storefront.cart().get_cart_items().await.is_empty());

    assert!(!storefront.toggle_favorite(&lamp).await);
    assert!(storefront.favorites().get_favorites().await.is_empty());

    // Removing an unknown id is harmless.
    let favorites = storefront
        .favorites()
        .remove_from_favorites(&ProductId::new("404"))
        .await;
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_favorites_keep_unknown_catalog_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let record = r#"{"id":"3","name":"Bentley Focus","price":"51.00","brand":"Lamborghini","model":"CTS"}"#;
    let product: Product = serde_json::from_str(record).unwrap();

    let storefront = file_storefront(dir.path(), Vec::new());
    storefront.favorites().add_to_favorites(&product).await;

    let raw = store.get(keys::FAVORITES).await.unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["brand"], "Lamborghini");
    assert_eq!(stored[0]["model"], "CTS");
}

#[tokio::test]
async fn test_catalog_pages_through_twenty_five_products() {
    let dir = tempfile::tempdir().unwrap();
    let storefront = file_storefront(dir.path(), numbered_products(25));
    let mut catalog = storefront.load_catalog().await;

    assert_eq!(catalog.phase(), LoadPhase::Loaded);
    assert_eq!(catalog.visible().len(), PAGE_SIZE);
    assert!(catalog.load_more());
    assert_eq!(catalog.visible().len(), 24);
    assert!(catalog.load_more());
    assert_eq!(catalog.visible().len(), 25);
    assert!(!catalog.load_more());

    catalog.apply_price_filter("10").unwrap();
    let ids: Vec<&str> = catalog.visible().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
    assert!(!catalog.has_more());

    catalog.set_search("product 1");
    let ids: Vec<&str> = catalog.visible().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "10"]);

    catalog.clear_filters();
    assert_eq!(catalog.filtered_len(), 25);
    assert_eq!(catalog.page(), 1);
}

#[tokio::test]
async fn test_catalog_retry_after_failure() {
    let source = FlakySource::new(numbered_products(3));
    let mut catalog = CatalogViewModel::new();

    catalog.load(&source).await;
    assert_eq!(catalog.phase(), LoadPhase::Failed);
    assert!(catalog.visible().is_empty());

    source.recover();
    catalog.load(&source).await;
    assert_eq!(catalog.phase(), LoadPhase::Loaded);
    assert_eq!(catalog.visible().len(), 3);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_browsing_an_unreachable_catalog_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(FlakySource::new(numbered_products(15)));
    let config = StorefrontConfig::new("http://127.0.0.1:1/products", dir.path()).unwrap();
    let storefront = Storefront::with_parts(
        config,
        Arc::new(FileStore::new(dir.path())),
        Arc::clone(&source) as Arc<dyn ProductSource>,
    );

    let catalog = storefront
        .browse_catalog(Some("product"), Some("10"), 2)
        .await
        .unwrap();
    assert_eq!(catalog.phase(), LoadPhase::Failed);
    assert!(catalog.visible().is_empty());
    assert_eq!(catalog.filtered_len(), 0);

    source.recover();
    let catalog = storefront.browse_catalog(None, None, 2).await.unwrap();
    assert_eq!(catalog.phase(), LoadPhase::Loaded);
    assert_eq!(catalog.visible().len(), 15);
}

#[tokio::test]
async fn test_retired_favorite_can_still_be_added_to_cart() {
    let dir = tempfile::tempdir().unwrap();
    let storefront = file_storefront(dir.path(), numbered_products(2));
    let retired = Product::new("99", "Retired lamp", "12.50");
    storefront.favorites().add_to_favorites(&retired).await;

    let product = storefront.find_product(&retired.id).await.unwrap();
    storefront.add_to_cart(&product).await;

    assert_eq!(storefront.badge().count(), 1);
    assert!((storefront.cart().get_total_price().await - 12.5).abs() < f64::EPSILON);
}
