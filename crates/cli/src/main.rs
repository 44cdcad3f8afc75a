//! Dessert Shop CLI - Catalog inspection and order tally tools.
//!
//! # Usage
//!
//! ```bash
//! # List the built-in dessert menu
//! ds-cli catalog list
//!
//! # List one category from a custom catalog file
//! ds-cli catalog list --category cake --file catalog.json
//!
//! # Show a single product
//! ds-cli catalog show 2
//!
//! # Validate a catalog file before deploying it
//! ds-cli catalog validate catalog.json
//!
//! # Tally an order (each --product adds one unit)
//! ds-cli order -p 2 -p 2 -p 7
//! ```
//!
//! When `--file` is omitted, `STOREFRONT_CATALOG_PATH` is used if set,
//! otherwise the built-in dessert menu.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dessert_shop_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "ds-cli")]
#[command(author, version, about = "Dessert shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate product catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Tally an order against the catalog without placing it
    Order {
        /// Product to add (repeat to add more units)
        #[arg(short, long = "product", required = true)]
        products: Vec<ProductId>,

        /// Catalog JSON file
        #[arg(short, long, env = "STOREFRONT_CATALOG_PATH")]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only products in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Catalog JSON file
        #[arg(short, long, env = "STOREFRONT_CATALOG_PATH")]
        file: Option<PathBuf>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: ProductId,

        /// Catalog JSON file
        #[arg(short, long, env = "STOREFRONT_CATALOG_PATH")]
        file: Option<PathBuf>,
    },
    /// Validate a catalog JSON file
    Validate {
        /// Catalog JSON file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env so STOREFRONT_CATALOG_PATH matches the server's
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, file } => {
                commands::catalog::list(file.as_deref(), category.as_deref()).await?;
            }
            CatalogAction::Show { id, file } => {
                commands::catalog::show(file.as_deref(), id).await?;
            }
            CatalogAction::Validate { file } => {
                commands::catalog::validate(&file).await?;
            }
        },
        Commands::Order { products, file } => {
            commands::order::tally(file.as_deref(), &products).await?;
        }
    }
    Ok(())
}
