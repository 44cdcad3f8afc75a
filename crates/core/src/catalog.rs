//! Static product catalog.
//!
//! The catalog is loaded once (from JSON or the built-in dessert list) and is
//! read-only afterwards. Loading validates the whole list up front so the rest
//! of the system can assume every product is well formed.
//!
//! # File Format
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "name": "Waffle with Berries",
//!     "category": "Waffle",
//!     "price": "6.50",
//!     "image": {
//!       "thumbnail": "./assets/images/image-waffle-thumbnail.jpg",
//!       "mobile": "./assets/images/image-waffle-mobile.jpg",
//!       "tablet": "./assets/images/image-waffle-tablet.jpg",
//!       "desktop": "./assets/images/image-waffle-desktop.jpg"
//!     }
//!   }
//! ]
//! ```
//!
//! `price` may be a JSON string or number. An optional `currency` field
//! (`"USD"`, `"EUR"`, ...) defaults to USD.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{CurrencyCode, Price, Product, ProductId, ProductImage};

/// Built-in dessert menu.
const DESSERTS_JSON: &str = include_str!("../data/desserts.json");

/// Highest accepted unit price.
///
/// Keeps line totals and cart totals far inside `Decimal` range even at the
/// largest quantity a cart allows.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {0} is priced above the {MAX_UNIT_PRICE} limit")]
    PriceTooHigh(ProductId),
    #[error("product {id} is priced in {found}, catalog uses {expected}")]
    MixedCurrency {
        id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
}

/// Catalog entry as it appears in the data file.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    category: String,
    price: Decimal,
    #[serde(default)]
    currency: CurrencyCode,
    image: ProductImage,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            price: Price::new(record.price, record.currency),
            image: record.image,
        }
    }
}

/// Read-only list of products, in file order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if any product ID repeats, a name is blank, a price is
    /// negative or above [`MAX_UNIT_PRICE`], or the products use more than one
    /// currency.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        let expected = products
            .first()
            .map_or_else(CurrencyCode::default, |p| p.price.currency_code);

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(product.id));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if product.price.amount > MAX_UNIT_PRICE {
                return Err(CatalogError::PriceTooHigh(product.id));
            }
            if product.price.currency_code != expected {
                return Err(CatalogError::MixedCurrency {
                    id: product.id,
                    expected,
                    found: product.price.currency_code,
                });
            }
        }

        Ok(Self { products, index })
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or validation fails.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(json)?;
        Self::from_products(records.into_iter().map(Product::from).collect())
    }

    /// The built-in dessert menu.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data file is invalid.
    pub fn desserts() -> Result<Self, CatalogError> {
        Self::from_json(DESSERTS_JSON)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// Products in a category (case-insensitive match).
    pub fn by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Distinct categories in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record_json(id: i32, name: &str, price: &str) -> String {
        format!(
            r#"{{"id":{id},"name":"{name}","category":"Cake","price":{price},
            "image":{{"thumbnail":"t","mobile":"m","tablet":"t","desktop":"d"}}}}"#
        )
    }

    #[test]
    fn test_desserts_catalog_loads() {
        let catalog = Catalog::desserts().unwrap();
        assert_eq!(catalog.len(), 9);

        let brulee = catalog.get(ProductId::new(2)).unwrap();
        assert_eq!(brulee.name, "Vanilla Bean Crème Brûlée");
        assert_eq!(brulee.price.display(), "$7.00");
        assert!(brulee.image.thumbnail.ends_with("creme-brulee-thumbnail.jpg"));
    }

    #[test]
    fn test_get_unknown_id() {
        let catalog = Catalog::desserts().unwrap();
        assert!(catalog.get(ProductId::new(404)).is_none());
    }

    #[test]
    fn test_products_keep_file_order() {
        let catalog = Catalog::desserts().unwrap();
        let ids: Vec<i32> = catalog.products().iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_by_category_is_case_insensitive() {
        let catalog = Catalog::desserts().unwrap();
        let cakes: Vec<_> = catalog.by_category("cake").collect();
        assert_eq!(cakes.len(), 1);
        assert_eq!(cakes[0].name, "Red Velvet Cake");
        assert_eq!(catalog.by_category("Soup").count(), 0);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::desserts().unwrap();
        let categories = catalog.categories();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories[0], "Waffle");
        assert_eq!(categories[8], "Panna Cotta");
    }

    #[test]
    fn test_from_json_accepts_numeric_price() {
        let json = format!("[{}]", record_json(1, "Cake", "4.5"));
        let catalog = Catalog::from_json(&json).unwrap();
        let cake = catalog.get(ProductId::new(1)).unwrap();
        assert_eq!(cake.price.amount, Decimal::new(45, 1));
        assert_eq!(cake.price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = format!(
            "[{},{}]",
            record_json(1, "Cake", "\"4.50\""),
            record_json(1, "Other Cake", "\"5.00\"")
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_from_json_rejects_negative_price() {
        let json = format!("[{}]", record_json(3, "Cake", "\"-1.00\""));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice(_)));
    }

    #[test]
    fn test_from_json_rejects_price_above_limit() {
        let json = format!(
            "[{}]",
            record_json(3, "Cake", "\"40000000000000000000000000000\"")
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::PriceTooHigh(_)));

        let json = format!("[{}]", record_json(3, "Cake", "\"1000000.00\""));
        assert!(Catalog::from_json(&json).is_ok());
    }

    #[test]
    fn test_from_json_rejects_blank_name() {
        let json = format!("[{}]", record_json(3, "  ", "\"1.00\""));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName(_)));
    }

    #[test]
    fn test_from_json_rejects_mixed_currency() {
        let euro = r#"{"id":2,"name":"Tart","category":"Pie","price":"3.00","currency":"EUR",
            "image":{"thumbnail":"t","mobile":"m","tablet":"t","desktop":"d"}}"#;
        let json = format!("[{},{euro}]", record_json(1, "Cake", "\"4.50\""));
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MixedCurrency {
                expected: CurrencyCode::USD,
                found: CurrencyCode::EUR,
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
    }
}
