pub mod client;
pub mod error;
pub mod loader;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use loader::CatalogLoader;
pub use types::ProductsResponse;
