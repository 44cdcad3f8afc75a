//! Cart route handlers.
//!
//! Cart IDs are stored in the session and map to carts held by the cart
//! store. Every handler returns the cart as it stands after the operation.
//! Removing or updating a product that is not in the cart is not an error:
//! the response carries the unchanged cart and a `"kind": "unchanged"` change.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use dessert_shop_core::{Cart, CartChange, CartItem, CurrencyCode, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{OptionalSessionCart, ensure_cart_id};
use crate::services::CartUpdate;
use crate::state::AppState;

/// Cart line data returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Cart data returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub total_display: String,
    pub currency: CurrencyCode,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.id(),
            name: item.product.name.clone(),
            category: item.product.category.clone(),
            thumbnail: item.product.image.thumbnail.clone(),
            quantity: item.quantity(),
            unit_price: item.product.price.amount,
            line_total: item.line_total().amount,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total = cart.total();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: total.amount,
            total_display: total.display(),
            currency: total.currency_code,
            item_count: cart.item_count(),
        }
    }
}

/// Response for cart mutations.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    pub change: CartChange,
}

impl From<CartUpdate> for CartResponse {
    fn from(update: CartUpdate) -> Self {
        Self {
            cart: CartView::from(&update.cart),
            change: update.change,
        }
    }
}

impl CartResponse {
    fn unchanged() -> Self {
        Self {
            cart: CartView::empty(),
            change: CartChange::Unchanged,
        }
    }
}

/// Cart count badge response.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Show the visitor's cart.
#[instrument(skip(state, cart_id))]
pub async fn show(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
) -> Result<Json<CartView>> {
    let Some(cart_id) = cart_id else {
        return Ok(Json(CartView::empty()));
    };

    let cart = state.carts().get(cart_id).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add one unit of a product to the cart.
///
/// Creates the visitor's cart if they don't have one yet. Unknown products
/// are rejected before any session is started.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    let product = state
        .catalog()
        .get(request.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", request.product_id)))?;

    let cart_id = ensure_cart_id(&session).await?;
    let product_id = product.id.to_string();
    let update = state.carts().add_item(cart_id, product).await?;
    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(Json(CartResponse::from(update)))
}

/// Set the quantity of a product in the cart.
///
/// A quantity of zero or less removes the product.
#[instrument(skip(state, cart_id))]
pub async fn update(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let Some(cart_id) = cart_id else {
        return Ok(Json(CartResponse::unchanged()));
    };

    let update = state
        .carts()
        .update_quantity(cart_id, product_id, request.quantity)
        .await?;
    Ok(Json(CartResponse::from(update)))
}

/// Remove a product from the cart.
#[instrument(skip(state, cart_id))]
pub async fn remove(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let Some(cart_id) = cart_id else {
        return Ok(Json(CartResponse::unchanged()));
    };

    let update = state.carts().remove_item(cart_id, product_id).await?;
    Ok(Json(CartResponse::from(update)))
}

/// Empty the cart.
#[instrument(skip(state, cart_id))]
pub async fn clear(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
) -> Result<Json<CartResponse>> {
    let Some(cart_id) = cart_id else {
        return Ok(Json(CartResponse::unchanged()));
    };

    let update = state.carts().clear(cart_id).await?;
    Ok(Json(CartResponse::from(update)))
}

/// Get the cart count badge.
#[instrument(skip(state, cart_id))]
pub async fn count(
    State(state): State<AppState>,
    OptionalSessionCart(cart_id): OptionalSessionCart,
) -> Result<Json<CountResponse>> {
    let count = match cart_id {
        Some(cart_id) => state.carts().get(cart_id).await?.item_count(),
        None => 0,
    };

    Ok(Json(CountResponse { count }))
}
