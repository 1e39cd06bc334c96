//! HTTP catalog client against a local listener.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use emarket_core::ProductId;
use emarket_integration_tests::StubCatalogServer;
use emarket_storefront::catalog::{CatalogClient, CatalogError, ProductSource};
use emarket_storefront::{Storefront, StorefrontConfig};

const CATALOG: &str = r#"[
    {"createdAt":"2023-07-17T07:21:02.529Z","name":"Bentley Focus","image":"https://loremflickr.com/640/480/food","price":"51.00","description":"Quo sint","model":"CTS","brand":"Lamborghini","id":"1"},
    {"createdAt":"2023-07-17T02:49:46.692Z","name":"Aston Martin Durango","image":"https://loremflickr.com/640/480/food","price":"374.00","description":"Aut sint","model":"Roadster","brand":"Smart","id":"2"}
]"#;

fn config(url: &str) -> StorefrontConfig {
    StorefrontConfig::new(url, tempfile::tempdir().unwrap().path()).unwrap()
}

#[tokio::test]
async fn test_fetches_and_caches_catalog() {
    let server = StubCatalogServer::start(200, CATALOG).await.unwrap();
    let client = CatalogClient::new(&config(server.url()));

    let products = client.fetch_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].name, "Aston Martin Durango");
    assert_eq!(products[0].extra["brand"], "Lamborghini");

    client.fetch_products().await.unwrap();
    assert_eq!(server.hits(), 1);

    client.invalidate().await;
    client.fetch_products().await.unwrap();
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let server = StubCatalogServer::start(200, CATALOG).await.unwrap();
    let mut config = config(server.url());
    config.catalog_cache_ttl = Duration::from_millis(50);
    let client = CatalogClient::new(&config);

    client.fetch_products().await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    client.fetch_products().await.unwrap();
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = StubCatalogServer::start(500, "oops").await.unwrap();
    let client = CatalogClient::new(&config(server.url()));

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 500, ref body } if body == "oops"));
}

#[tokio::test]
async fn test_error_body_is_truncated() {
    let server = StubCatalogServer::start(503, "x".repeat(1_000)).await.unwrap();
    let client = CatalogClient::new(&config(server.url()));

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 503, ref body } if body.len() == 200));
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = StubCatalogServer::start(200, r#"{"items":[]}"#).await.unwrap();
    let client = CatalogClient::new(&config(server.url()));

    assert!(matches!(
        client.fetch_products().await,
        Err(CatalogError::Parse(_))
    ));
}

#[tokio::test]
async fn test_get_product_by_id() {
    let server = StubCatalogServer::start(200, CATALOG).await.unwrap();
    let client = CatalogClient::new(&config(server.url()));

    let product = client.get_product(&ProductId::new("2")).await.unwrap();
    assert_eq!(product.price.as_str(), "374.00");
    assert!(matches!(
        client.get_product(&ProductId::new("99")).await,
        Err(CatalogError::NotFound(_))
    ));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_storefront_adds_fetched_product_to_cart() {
    let server = StubCatalogServer::start(200, CATALOG).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storefront = Storefront::new(StorefrontConfig::new(server.url(), dir.path()).unwrap());

    let product = storefront
        .catalog()
        .get_product(&ProductId::new("1"))
        .await
        .unwrap();
    storefront.add_to_cart(&product).await;

    assert_eq!(storefront.badge().count(), 1);
    assert!(dir.path().join("cartItems.json").exists());
}
