//! Cart command handlers.

use std::fmt::Write as _;

use anyhow::Context as _;
use clap::Subcommand;
use shopfront_cart::{CartStorage, CartStore, FileStorage};
use shopfront_core::{AppConfig, ProductId};

use crate::catalog::load_listing;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show cart lines and totals
    Show,
    /// Add one unit of a product from the current listing
    Add {
        product_id: ProductId,

        /// Look the product up in this category's listing
        #[arg(long)]
        category: Option<String>,
    },
    /// Change a line's quantity by a signed amount; zero or below removes it
    Update {
        product_id: ProductId,

        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove a product's line
    Remove { product_id: ProductId },
}

/// Opens the cart persisted under the configured storage directory and key.
pub(crate) fn open_cart(config: &AppConfig) -> CartStore<FileStorage> {
    CartStore::hydrate(FileStorage::new(&config.storage_dir), config.cart_key.clone())
}

/// Runs one cart command and prints the resulting cart.
///
/// # Errors
///
/// Returns an error if the product to add is not in the listing, the
/// catalog cannot be loaded, or the cart cannot be written.
pub(crate) async fn run_cart(config: &AppConfig, command: CartCommands) -> anyhow::Result<()> {
    let mut cart = open_cart(config);

    match command {
        CartCommands::Show => {}
        CartCommands::Add {
            product_id,
            category,
        } => {
            let listing = load_listing(config, category.as_deref()).await?;
            let product = listing.loader.find_product(product_id).ok_or_else(|| {
                anyhow::anyhow!("product {product_id} is not in the current listing")
            })?;
            cart.add_to_cart(&product).context("failed to save cart")?;
        }
        CartCommands::Update { product_id, delta } => {
            if cart.get(product_id).is_none() {
                tracing::warn!(product_id, "product is not in the cart, nothing to update");
            }
            cart.update_quantity(product_id, delta)
                .context("failed to save cart")?;
        }
        CartCommands::Remove { product_id } => {
            cart.remove_item(product_id).context("failed to save cart")?;
        }
    }

    print!("{}", render_cart(&cart));
    Ok(())
}

pub(crate) fn render_cart<S: CartStorage>(cart: &CartStore<S>) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Your cart ({} items)", cart.total_quantity());
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "[{id}] {title}  ${price} x {qty} = ${total:.2}",
            id = line.id(),
            title = line.product.title,
            price = line.product.price,
            qty = line.quantity,
            total = line.line_total(),
        );
    }
    let _ = writeln!(out, "Total: ${}", cart.formatted_total_price());
    out
}
