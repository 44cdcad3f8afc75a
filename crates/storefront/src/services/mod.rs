//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_store` - Owns every live cart; handlers talk to it through `CartHandle`

pub mod cart_store;

pub use cart_store::{CartHandle, CartStore, CartStoreError, CartUpdate};
