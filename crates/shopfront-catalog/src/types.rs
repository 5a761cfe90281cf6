//! Response envelopes for the catalog API.
//!
//! `GET /products` and `GET /products/category/{slug}` share one shape:
//!
//! ```text
//! {"products": [...], "total": 194, "skip": 0, "limit": 30}
//! ```
//!
//! Only `total` is kept, for logging; the storefront shows whatever page the
//! endpoint returns by default. `GET /products/categories` returns a
//! bare JSON array of categories and needs no envelope.

use serde::Deserialize;
use shopfront_core::Product;

/// Top-level response from a product listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
}
