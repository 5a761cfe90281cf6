mod cart;
mod catalog;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;

#[derive(Debug, Parser)]
#[command(name = "shopfront")]
#[command(about = "Browse the product catalog and manage a local shopping cart")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally filtered to one category
    Products {
        /// Category name as shown by `shopfront categories`
        #[arg(long)]
        category: Option<String>,
    },
    /// List the available categories
    Categories,
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shopfront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, base_url = %config.catalog_base_url, "config loaded");

    match cli.command {
        Some(Commands::Products { category }) => {
            catalog::run_products(&config, category.as_deref()).await?;
        }
        Some(Commands::Categories) => catalog::run_categories(&config).await?,
        Some(Commands::Cart { command }) => cart::run_cart(&config, command).await?,
        None => catalog::run_products(&config, None).await?,
    }

    Ok(())
}
