//! Order confirmation snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cart::Cart;
use crate::types::{OrderId, Price, ProductId};

/// One line of a confirmed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// A cart frozen at the moment the customer confirmed it.
///
/// Confirmation does not depend on the cart afterwards, so the cart can be
/// reset for the next order while the confirmation is still being shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub total: Price,
    pub item_count: u32,
}

impl OrderConfirmation {
    /// Build a confirmation from the cart's current lines.
    ///
    /// Returns `None` when the cart is empty: there is nothing to order.
    #[must_use]
    pub fn from_cart(cart: &Cart, order_id: OrderId, placed_at: DateTime<Utc>) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.id(),
                name: item.product.name.clone(),
                thumbnail: item.product.image.thumbnail.clone(),
                quantity: item.quantity(),
                unit_price: item.product.price,
                line_total: item.line_total(),
            })
            .collect();

        Some(Self {
            order_id,
            placed_at,
            lines,
            total: cart.total(),
            item_count: cart.item_count(),
        })
    }
}
