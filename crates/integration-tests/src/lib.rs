//! Integration tests for eMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emarket-integration-tests
//! ```
//!
//! Everything runs in-process: storage goes to a temporary directory and the
//! catalog is either an in-memory product list or a local HTTP listener.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart, favorites and badge against file-backed storage
//! - `catalog_client` - HTTP catalog client against a local listener

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use emarket_core::Product;
use emarket_storefront::catalog::{CatalogError, ProductSource};
use emarket_storefront::{FileStore, Storefront, StorefrontConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// `count` products with ids `"1"..=count` and prices `"1".."count"`.
#[must_use]
pub fn numbered_products(count: usize) -> Vec<Product> {
    (1..=count)
        .map(|n| Product::new(n.to_string(), format!("Product {n}"), n.to_string()))
        .collect()
}

/// A storefront over file storage in `data_dir` and a fixed product list.
///
/// # Panics
///
/// Panics if the placeholder catalog URL is rejected.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn file_storefront(data_dir: &std::path::Path, products: Vec<Product>) -> Storefront {
    let config = StorefrontConfig::new("http://127.0.0.1:1/products", data_dir).unwrap();
    Storefront::with_parts(
        config,
        Arc::new(FileStore::new(data_dir)),
        Arc::new(products),
    )
}

/// Product source that fails until [`FlakySource::recover`] is called.
#[derive(Debug, Default)]
pub struct FlakySource {
    products: Vec<Product>,
    healthy: std::sync::atomic::AtomicBool,
    calls: AtomicUsize,
}

impl FlakySource {
    /// A failing source that will serve `products` once recovered.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Start serving products.
    pub fn recover(&self) {
        self.healthy.store(true, Ordering::SeqCst);
    }

    /// Number of fetches so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for FlakySource {
    async fn fetch_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(Arc::from(self.products.as_slice()))
        } else {
            Err(CatalogError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }
}

/// A local HTTP endpoint answering every request with one fixed response.
#[derive(Debug)]
pub struct StubCatalogServer {
    url: String,
    hits: Arc<AtomicUsize>,
}

impl StubCatalogServer {
    /// Bind an ephemeral port and serve `body` with `status` until the
    /// runtime shuts down.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(status: u16, body: impl Into<String>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/products", listener.local_addr()?);
        let hits = Arc::new(AtomicUsize::new(0));
        let body: Arc<str> = Arc::from(body.into());

        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = Arc::clone(&body);
                tokio::spawn(async move {
                    let mut request = [0_u8; 4096];
                    let _ = socket.read(&mut request).await;
                    let response = format!(
                        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        reason(status),
                        body.len(),
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Ok(Self { url, hits })
    }

    /// Endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requests accepted so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
