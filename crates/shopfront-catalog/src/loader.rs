//! The catalog currently on display, and the fetches that replace it.
//!
//! A [`CatalogLoader`] owns the product listing the storefront shows plus the
//! category list used to filter it. Every load either replaces the listing
//! wholesale or, on failure, leaves it exactly as it was.
//!
//! Loads take `&self` so that a category switch can be issued while an
//! earlier load is still in flight. Whichever response resolves last wins,
//! unless stale-response discarding is enabled, in which case only the most
//! recently issued request may write.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use shopfront_core::{AppConfig, Category, Product, ProductId};

use crate::client::CatalogClient;
use crate::error::CatalogError;

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    categories: Vec<Category>,
}

/// Marks one catalog fetch as in flight for as long as it is alive.
struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn start(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct CatalogLoader {
    client: CatalogClient,
    state: Mutex<CatalogState>,
    in_flight: AtomicUsize,
    latest_request: AtomicU64,
    discard_stale_responses: bool,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            state: Mutex::new(CatalogState::default()),
            in_flight: AtomicUsize::new(0),
            latest_request: AtomicU64::new(0),
            discard_stale_responses: false,
        }
    }

    /// Drop product responses that resolve after a newer request was issued.
    #[must_use]
    pub fn discard_stale_responses(mut self, enabled: bool) -> Self {
        self.discard_stale_responses = enabled;
        self
    }

    /// Builds a loader, and its client, from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let client = CatalogClient::from_config(config)?;
        Ok(Self::new(client).discard_stale_responses(config.discard_stale_responses))
    }

    /// Replaces the listing with the full catalog.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it; the listing is unchanged.
    pub async fn load_all(&self) -> Result<(), CatalogError> {
        let url = crate::client::products_url(self.client.base_url())?;
        self.load_listing(&url).await
    }

    /// Replaces the listing with the products behind a category reference.
    ///
    /// `None` is a no-op, so callers can pass an unresolved selection
    /// straight through.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it; the listing is unchanged.
    pub async fn load_category(&self, category_url: Option<&str>) -> Result<(), CatalogError> {
        let Some(url) = category_url else {
            tracing::debug!("no category reference selected, keeping current listing");
            return Ok(());
        };
        self.load_listing(url).await
    }

    /// Resolves `name` against the loaded categories and loads its listing.
    ///
    /// An unknown name leaves everything untouched.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it; the listing is unchanged.
    pub async fn select_category(&self, name: &str) -> Result<(), CatalogError> {
        let url = self.category_url(name);
        if url.is_none() {
            tracing::debug!(category = name, "category not found, selection ignored");
        }
        self.load_category(url.as_deref()).await
    }

    /// Fetches and stores the category list.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it at `warn`; the stored list
    /// is unchanged. Callers are free to ignore it.
    pub async fn load_categories(&self) -> Result<(), CatalogError> {
        match self.client.fetch_categories().await {
            Ok(categories) => {
                tracing::debug!(count = categories.len(), "categories loaded");
                self.lock_state().categories = categories;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "error fetching categories");
                Err(error)
            }
        }
    }

    /// `true` while at least one product fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock_state().products.clone()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.lock_state().categories.clone()
    }

    #[must_use]
    pub fn find_product(&self, id: ProductId) -> Option<Product> {
        self.lock_state()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    #[must_use]
    pub fn category_url(&self, name: &str) -> Option<String> {
        self.lock_state()
            .categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.url.clone())
    }

    async fn load_listing(&self, url: &str) -> Result<(), CatalogError> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::start(&self.in_flight);

        match self.client.fetch_products_from(url).await {
            Ok(products) => {
                if self.discard_stale_responses
                    && self.latest_request.load(Ordering::SeqCst) != token
                {
                    tracing::debug!(url, token, "discarding stale catalog response");
                    return Ok(());
                }
                let count = products.len();
                self.lock_state().products = products;
                tracing::info!(url, count, "catalog listing loaded");
                Ok(())
            }
            Err(error) => {
                tracing::error!(url, %error, "error fetching products");
                Err(error)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
