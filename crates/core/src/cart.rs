//! Shopping cart state.
//!
//! A [`Cart`] is an owned value holding the line items of the current order.
//! It is mutated only through [`Cart::add_item`], [`Cart::remove_item`],
//! [`Cart::update_quantity`] and [`Cart::clear`]. The total and item count
//! are never stored; they are computed from the items on every read.
//!
//! Operations on product IDs that are not in the cart are no-ops. They are
//! reported as [`CartChange::Unchanged`] so callers can tell without the cart
//! treating them as errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::OrderConfirmation;
use crate::types::{CurrencyCode, OrderId, Price, Product, ProductId};

/// A product plus its requested quantity.
///
/// The quantity is always at least one; an item whose quantity would reach
/// zero is removed from the cart instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product ID of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Number of units of the product in the cart.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartChange {
    /// A new line was appended with quantity one.
    Added,
    /// An existing line's quantity went up by one.
    Incremented { quantity: u32 },
    /// An existing line's quantity was set.
    QuantitySet { quantity: u32 },
    /// A line was removed.
    Removed,
    /// All lines were removed.
    Cleared,
    /// Nothing changed (unknown product ID, same quantity, or already empty).
    Unchanged,
}

impl CartChange {
    /// Whether the cart's contents changed.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The current order's line items, unique by product ID, in the order they
/// were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Add one unit of a product.
    ///
    /// Increments the quantity if the product is already in the cart,
    /// otherwise appends a new line with quantity one.
    pub fn add_item(&mut self, product: &Product) -> CartChange {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return CartChange::Incremented {
                quantity: item.quantity,
            };
        }

        self.items.push(CartItem::new(product.clone()));
        CartChange::Added
    }

    /// Remove the line for a product, if present.
    pub fn remove_item(&mut self, id: ProductId) -> CartChange {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                CartChange::Removed
            }
            None => CartChange::Unchanged,
        }
    }

    /// Set the quantity of a product's line.
    ///
    /// A quantity of zero or less removes the line. Unknown IDs are ignored.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> CartChange {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) if item.quantity == quantity => CartChange::Unchanged,
            Some(item) => {
                item.quantity = quantity;
                CartChange::QuantitySet { quantity }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> CartChange {
        if self.items.is_empty() {
            return CartChange::Unchanged;
        }
        self.items.clear();
        CartChange::Cleared
    }

    /// Currency of the cart's prices.
    ///
    /// Catalogs are single-currency, so the first line decides. An empty cart
    /// reports the default currency.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.items
            .first()
            .map_or_else(CurrencyCode::default, |item| {
                item.product.price.currency_code
            })
    }

    /// Sum of `price * quantity` over all lines, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount = self
            .items
            .iter()
            .fold(Decimal::ZERO, |total, item| {
                total.saturating_add(item.line_total().amount)
            });
        Price::new(amount, self.currency())
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Snapshot the cart as a confirmed order.
    ///
    /// Returns `None` for an empty cart. The cart itself is left untouched;
    /// starting a new order is a separate [`Cart::clear`].
    #[must_use]
    pub fn confirm(
        &self,
        order_id: OrderId,
        placed_at: DateTime<Utc>,
    ) -> Option<OrderConfirmation> {
        OrderConfirmation::from_cart(self, order_id, placed_at)
    }
}
