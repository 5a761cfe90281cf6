//! Endpoint URL construction for the catalog client.

use crate::error::CatalogError;

/// Builds the full product listing URL for a catalog base.
///
/// Given `"https://dummyjson.com/"`, returns `"https://dummyjson.com/products"`.
/// A path prefix on the base is kept (`"http://host/api"` becomes
/// `"http://host/api/products"`).
///
/// # Errors
///
/// Returns [`CatalogError::InvalidUrl`] if the result is not an absolute URL.
pub fn products_url(base_url: &str) -> Result<String, CatalogError> {
    join(base_url, "products")
}

/// Builds the category list URL for a catalog base.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidUrl`] if the result is not an absolute URL.
pub fn categories_url(base_url: &str) -> Result<String, CatalogError> {
    join(base_url, "products/categories")
}

fn join(base_url: &str, path: &str) -> Result<String, CatalogError> {
    let raw = format!("{}/{path}", base_url.trim_end_matches('/'));
    let url = reqwest::Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl {
        url: base_url.to_owned(),
        reason: format!("\"{raw}\" is not a valid URL: {e}"),
    })?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(CatalogError::InvalidUrl {
            url: base_url.to_owned(),
            reason: "catalog base must be an absolute http(s) URL".to_owned(),
        });
    }
    Ok(url.to_string())
}
