//! Product route handlers.
//!
//! The catalog is static, so these handlers only read from `AppState`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dessert_shop_core::{CurrencyCode, Product, ProductId, ProductImage};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product data returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub price_display: String,
    pub currency: CurrencyCode,
    pub image: ProductImage,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.amount,
            price_display: product.price.display(),
            currency: product.price.currency_code,
            image: product.image.clone(),
        }
    }
}

/// Product listing filters.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<ProductView>> {
    let catalog = state.catalog();
    let products = match query.category.as_deref() {
        Some(category) => catalog.by_category(category).map(ProductView::from).collect(),
        None => catalog.products().iter().map(ProductView::from).collect(),
    };

    Json(products)
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(id)
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List the catalog's categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    )
}
