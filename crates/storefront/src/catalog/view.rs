//! Client-side filtering and infinite-scroll pagination over the catalog.
//!
//! The view model holds three lists:
//!
//! - `all` - the full fetched catalog, never modified after the fetch
//! - `filtered` - `all` narrowed by the active filters, in fetch order
//! - `visible` - the first `page * PAGE_SIZE` entries of `filtered`
//!
//! Filters are always re-applied to `all`, never to an already filtered set.

use std::sync::Arc;

use emarket_core::{Product, PriceError, parse_decimal};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::{CatalogError, ProductSource};

/// Products revealed per page.
pub const PAGE_SIZE: usize = 12;

/// Errors raised by filter input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The max-price text is not a number.
    #[error("invalid max price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// Fetch lifecycle of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// Products available.
    Loaded,
    /// Fetch failed; the product list stays empty.
    Failed,
}

/// Active filter predicates, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    /// Case-insensitive substring matched against product names.
    pub search: String,
    /// Inclusive upper bound on price.
    pub max_price: Option<Decimal>,
}

impl CatalogFilters {
    /// Whether `product` passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.matches_price(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.max_price.is_none_or(|max| {
            product
                .price
                .to_decimal()
                .is_ok_and(|price| price <= max)
        })
    }
}

/// Filtered, paginated view over one catalog fetch.
#[derive(Debug, Default)]
pub struct CatalogViewModel {
    phase: LoadPhase,
    all: Arc<[Product]>,
    filtered: Vec<Product>,
    visible: Vec<Product>,
    filters: CatalogFilters,
    page: usize,
}

impl CatalogViewModel {
    /// An idle view model with no products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog from `source` and show the first page.
    ///
    /// A call while a fetch is already in flight does nothing.
    pub async fn load(&mut self, source: &dyn ProductSource) {
        if !self.begin_load() {
            return;
        }
        let result = source.fetch_products().await;
        self.finish_load(result);
    }

    /// Enter the `Loading` phase. Returns `false` if already loading.
    pub fn begin_load(&mut self) -> bool {
        if self.phase == LoadPhase::Loading {
            debug!("Catalog fetch already in flight");
            return false;
        }
        self.phase = LoadPhase::Loading;
        true
    }

    /// Settle a fetch started with [`begin_load`](Self::begin_load).
    #[instrument(skip_all)]
    pub fn finish_load(&mut self, result: Result<Arc<[Product]>, CatalogError>) {
        match result {
            Ok(products) => {
                debug!(count = products.len(), "Catalog loaded");
                self.all = products;
                self.phase = LoadPhase::Loaded;
                self.refilter();
            }
            Err(e) => {
                error!(error = %e, "Error fetching products");
                self.phase = LoadPhase::Failed;
            }
        }
    }

    /// Set the search text and restart from page 1.
    pub fn set_search(&mut self, text: &str) {
        text.clone_into(&mut self.filters.search);
        self.refilter();
    }

    /// Set the max-price filter from user text and restart from page 1.
    ///
    /// Empty text leaves the filters unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPrice`] if the text is not a number;
    /// the filters are left unchanged.
    pub fn apply_price_filter(&mut self, text: &str) -> Result<(), FilterError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        self.filters.max_price = Some(parse_decimal(text)?);
        self.refilter();
        Ok(())
    }

    /// Remove every filter and restart from page 1.
    pub fn clear_filters(&mut self) {
        self.filters = CatalogFilters::default();
        self.refilter();
    }

    /// Reveal the next page.
    ///
    /// Returns `false` (and does nothing) while a fetch is in flight or when
    /// every filtered product is already visible.
    pub fn load_more(&mut self) -> bool {
        if self.phase == LoadPhase::Loading || !self.has_more() {
            return false;
        }
        self.show_page(self.page + 1);
        true
    }

    /// Current fetch phase.
    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// Products currently revealed, in catalog order.
    #[must_use]
    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    /// Every fetched product, unfiltered.
    #[must_use]
    pub fn all_products(&self) -> &[Product] {
        &self.all
    }

    /// Number of products passing the filters.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Last revealed page (1-based), 0 before the first load.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Whether more filtered products remain beyond the visible window.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page * PAGE_SIZE < self.filtered.len()
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    /// Recompute the filtered set from the full catalog and show page 1.
    fn refilter(&mut self) {
        self.filtered = self
            .all
            .iter()
            .filter(|product| self.filters.matches(product))
            .cloned()
            .collect();
        self.show_page(1);
    }

    /// Page 1 replaces the visible window; later pages append to it.
    fn show_page(&mut self, page: usize) {
        let start = (page - 1) * PAGE_SIZE;
        let slice = self.filtered.iter().skip(start).take(PAGE_SIZE).cloned();
        if page == 1 {
            self.visible = slice.collect();
        } else {
            self.visible.extend(slice);
        }
        self.page = page;
        debug!(
            page,
            visible = self.visible.len(),
            filtered = self.filtered.len(),
            "Catalog page shown"
        );
    }
}
