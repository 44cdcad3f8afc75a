//! Checkout route handler.
//!
//! Checkout confirms the visitor's cart as an order and starts a new one.
//! There is no payment step: the confirmation is the end of the flow.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use dessert_shop_core::OrderConfirmation;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::OptionalSessionCart;
use crate::state::AppState;

/// Order confirmation returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    #[serde(flatten)]
    pub order: OrderConfirmation,
    pub total_display: String,
}

impl From<OrderConfirmation> for ConfirmationView {
    fn from(order: OrderConfirmation) -> Self {
        let total_display = order.total.display();
        Self {
            order,
            total_display,
        }
    }
}

/// Confirm the order and reset the cart.
///
/// Returns 400 if there is nothing in the cart to order.
#[instrument(skip(state, cart_id))]
pub async fn confirm(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
) -> Result<(StatusCode, Json<ConfirmationView>)> {
    let empty = || AppError::BadRequest("cart is empty".to_string());

    let cart_id = cart_id.ok_or_else(empty)?;
    let order = state.carts().checkout(cart_id).await?.ok_or_else(empty)?;

    let order_id = order.order_id.to_string();
    add_breadcrumb(
        "checkout",
        "Order confirmed",
        Some(&[("order_id", order_id.as_str())]),
    );

    Ok((StatusCode::CREATED, Json(ConfirmationView::from(order))))
}
