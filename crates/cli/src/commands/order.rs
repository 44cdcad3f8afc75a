//! Order tally command.
//!
//! Builds a cart from a list of product IDs and prints the confirmation
//! the storefront would return at checkout. Nothing is placed or stored.

use std::path::Path;

use chrono::Utc;
use tracing::info;

use dessert_shop_core::{Cart, Catalog, OrderId, ProductId};
use dessert_shop_storefront::state::load_catalog;

/// Error building an order from product IDs.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// Add one unit per listed product to a fresh cart.
///
/// Repeated IDs increment the quantity. Unknown IDs fail the whole tally
/// so a typo never produces a silently short order.
///
/// # Errors
///
/// Returns [`OrderError::UnknownProduct`] for the first ID not in the catalog.
pub fn build_cart(catalog: &Catalog, products: &[ProductId]) -> Result<Cart, OrderError> {
    let mut cart = Cart::new();
    for &id in products {
        let product = catalog.get(id).ok_or(OrderError::UnknownProduct(id))?;
        cart.add_item(product);
    }
    Ok(cart)
}

/// Tally an order and print its confirmation.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or a product is unknown.
pub async fn tally(
    file: Option<&Path>,
    products: &[ProductId],
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(file).await?;
    let cart = build_cart(&catalog, products)?;

    let confirmation = cart
        .confirm(OrderId::generate(), Utc::now())
        .ok_or("Order is empty")?;

    info!("Order {}", confirmation.order_id);
    for line in &confirmation.lines {
        info!(
            "  {:>3} x {:<32} {:>8}",
            line.quantity,
            line.name,
            line.line_total.display()
        );
    }
    info!(
        "  {} items, total {}",
        confirmation.item_count,
        confirmation.total.display()
    );

    Ok(())
}
