//! Dessert Shop Core - Catalog, cart and order types.
//!
//! This crate provides the domain model shared by all dessert shop components:
//! - `storefront` - JSON API serving the catalog and per-session carts
//! - `cli` - Command-line tools for inspecting catalogs and tallying orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! network, no async. Cart mutation is synchronous on an owned [`Cart`];
//! whoever owns the cart decides how access to it is serialized.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and products
//! - [`catalog`] - Static, validated product list
//! - [`cart`] - Cart state and mutation operations
//! - [`order`] - Order confirmation snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartChange, CartItem};
pub use catalog::{Catalog, CatalogError};
pub use order::{OrderConfirmation, OrderLine};
pub use types::*;
