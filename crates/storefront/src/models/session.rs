//! Session-related types.
//!
//! The session stores only the ID of the visitor's cart; the cart itself
//! lives in the cart store.

/// Session keys.
pub mod keys {
    /// Key for storing the visitor's cart ID.
    pub const CART_ID: &str = "cart_id";
}
