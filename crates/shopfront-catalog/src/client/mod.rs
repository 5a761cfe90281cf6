//! HTTP client for the public catalog API.

mod urls;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use shopfront_core::{AppConfig, Category, Product};

use crate::error::CatalogError;
use crate::types::ProductsResponse;

pub use urls::{categories_url, products_url};

/// HTTP client for the catalog's product and category listings.
///
/// Maps 404 and other non-2xx responses to typed errors. Each call makes a
/// single attempt; there is no retry or backoff.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        // Fail at construction rather than on the first request.
        products_url(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.catalog_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full product listing from `<base>/products`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: HTTP 404.
    /// - [`CatalogError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`CatalogError::Http`]: network, TLS or timeout failure.
    /// - [`CatalogError::Deserialize`]: body is not a product listing.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = products_url(&self.base_url)?;
        self.fetch_products_from(&url).await
    }

    /// Fetches a product listing from an arbitrary listing URL, such as a
    /// category reference returned by [`Self::fetch_categories`].
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidUrl`] if `url` does not parse, otherwise the
    /// same as [`Self::fetch_products`].
    pub async fn fetch_products_from(&self, url: &str) -> Result<Vec<Product>, CatalogError> {
        let url = reqwest::Url::parse(url).map_err(|e| CatalogError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let response: ProductsResponse = self
            .get_json(url.as_str(), &format!("product listing from {url}"))
            .await?;

        tracing::debug!(
            url = %url,
            returned = response.products.len(),
            total = ?response.total,
            "fetched product listing"
        );
        Ok(response.products)
    }

    /// Fetches the category list from `<base>/products/categories`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_products`].
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let url = categories_url(&self.base_url)?;
        self.get_json(&url, &format!("categories from {url}")).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| CatalogError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
