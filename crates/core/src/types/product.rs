//! Product types.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Image variants for a product, one per layout breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Small square image used in cart and order summaries.
    pub thumbnail: String,
    /// Image for narrow viewports.
    pub mobile: String,
    /// Image for medium viewports.
    pub tablet: String,
    /// Image for wide viewports.
    pub desktop: String,
}

/// A product in the catalog.
///
/// Products are immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub image: ProductImage,
}
