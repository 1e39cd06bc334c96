//! Product catalog: remote source and client-side view model.
//!
//! # Architecture
//!
//! - The remote endpoint returns the entire catalog as one JSON array; there
//!   is no server-side pagination, filtering or query parameters
//! - [`CatalogClient`] fetches it with `reqwest` and keeps the decoded list in
//!   an in-process `moka` cache
//! - [`CatalogViewModel`] filters and paginates the fetched list locally
//!
//! # Example
//!
//! ```rust,ignore
//! use emarket_storefront::catalog::{CatalogClient, CatalogViewModel};
//!
//! let client = CatalogClient::new(&config);
//! let mut catalog = CatalogViewModel::new();
//! catalog.load(&client).await;
//! catalog.set_search("shoe");
//! while catalog.load_more() {}
//! ```

mod view;

pub use view::{CatalogFilters, CatalogViewModel, FilterError, LoadPhase, PAGE_SIZE};

use std::sync::Arc;

use async_trait::async_trait;
use emarket_core::{Product, ProductId};
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::StorefrontConfig;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with the requested id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

/// Anything that can produce the full product list.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch every product, in catalog order.
    async fn fetch_products(&self) -> Result<Arc<[Product]>, CatalogError>;

    /// Find one product by id (product detail screen).
    async fn get_product(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        self.fetch_products()
            .await?
            .iter()
            .find(|product| &product.id == product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }
}

/// A fixed in-memory product list.
#[async_trait]
impl ProductSource for Vec<Product> {
    async fn fetch_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        Ok(Arc::from(self.as_slice()))
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

const CACHE_KEY: &str = "products";
const ERROR_BODY_LIMIT: usize = 200;
const LOG_BODY_LIMIT: usize = 500;

/// HTTP client for the remote product catalog.
///
/// The decoded product list is cached for the configured TTL so re-mounting
/// the catalog in the same process does not hit the network again.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Cache<&'static str, Arc<[Product]>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.catalog_url.to_string(),
                cache,
            }),
        }
    }

    /// The configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Drop the cached product list so the next fetch hits the network.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(CACHE_KEY).await;
    }

    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    async fn fetch_remote(&self) -> Result<Arc<[Product]>, CatalogError> {
        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let products = parse_products(&body)?;
        debug!(count = products.len(), "Fetched catalog");
        Ok(Arc::from(products))
    }
}

#[async_trait]
impl ProductSource for CatalogClient {
    async fn fetch_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(cached) = self.inner.cache.get(CACHE_KEY).await {
            debug!(count = cached.len(), "Cache hit for catalog");
            return Ok(cached);
        }

        let products = self.fetch_remote().await?;
        self.inner
            .cache
            .insert(CACHE_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }
}

/// Decode a catalog response body.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the body is not a JSON array of products.
pub fn parse_products(body: &str) -> Result<Vec<Product>, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Failed to parse catalog response"
        );
        CatalogError::Parse(e)
    })
}
