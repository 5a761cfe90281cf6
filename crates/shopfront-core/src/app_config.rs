use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for the catalog client and the cart store.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Origin of the catalog API; `/products` and `/products/categories`
    /// are resolved against it.
    pub catalog_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Directory holding one JSON file per storage key.
    pub storage_dir: PathBuf,
    /// Storage key the cart is written under.
    pub cart_key: String,
    /// When `true`, a catalog response that resolves after a newer catalog
    /// request was issued is dropped instead of overwriting the listing.
    pub discard_stale_responses: bool,
}
