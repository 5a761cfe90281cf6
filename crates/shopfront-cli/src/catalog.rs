//! Catalog command handlers: product listings and the category list.

use std::fmt::Write as _;

use anyhow::Context as _;
use shopfront_catalog::CatalogLoader;
use shopfront_core::{AppConfig, Product};

use crate::cart::open_cart;

/// A loaded catalog plus the category it ended up showing.
pub(crate) struct Listing {
    pub(crate) loader: CatalogLoader,
    /// `None` when the full catalog is shown, including after a fallback.
    pub(crate) category: Option<String>,
}

impl Listing {
    pub(crate) fn heading(&self) -> &str {
        self.category.as_deref().unwrap_or("All")
    }
}

/// Loads the full catalog and, when `category` is given, switches to that
/// category's listing.
///
/// A failed initial load is an error. A category that cannot be resolved or
/// fetched leaves the full listing in place, as a storefront would.
pub(crate) async fn load_listing(
    config: &AppConfig,
    category: Option<&str>,
) -> anyhow::Result<Listing> {
    let loader = CatalogLoader::from_config(config).context("failed to build catalog client")?;
    loader
        .load_all()
        .await
        .context("failed to load product catalog")?;

    let mut shown = None;
    if let Some(name) = category {
        // Errors are already logged by the loader.
        let _ = loader.load_categories().await;
        if loader.category_url(name).is_none() {
            tracing::warn!(category = name, "unknown category, showing all products");
        } else if let Err(error) = loader.select_category(name).await {
            tracing::warn!(
                category = name,
                %error,
                "category listing unavailable, showing all products"
            );
        } else {
            shown = Some(name.to_owned());
        }
    }

    Ok(Listing {
        loader,
        category: shown,
    })
}

/// Prints the current listing with the cart's item count as a header.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub(crate) async fn run_products(
    config: &AppConfig,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let listing = load_listing(config, category).await?;
    let cart = open_cart(config);

    println!(
        "{} products | cart: {}",
        listing.heading(),
        cart.total_quantity()
    );
    print!("{}", render_listing(&listing.loader.products()));
    Ok(())
}

/// Prints the category names, one per line.
///
/// # Errors
///
/// Returns an error if the category list cannot be fetched.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let loader = CatalogLoader::from_config(config).context("failed to build catalog client")?;
    loader
        .load_categories()
        .await
        .context("failed to load categories")?;

    for category in loader.categories() {
        println!("{}", category.name);
    }
    Ok(())
}

pub(crate) fn render_listing(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products to show.\n".to_string();
    }

    let mut out = String::new();
    for p in products {
        let _ = writeln!(
            out,
            "[{id}] {title}  ${price} ({discount}% off)  rating {rating}  in stock: {stock}",
            id = p.id,
            title = p.title,
            price = p.price,
            discount = p.discount_percentage,
            rating = p.rating,
            stock = p.stock,
        );
    }
    out
}
