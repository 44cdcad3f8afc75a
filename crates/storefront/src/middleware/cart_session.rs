//! Session cart lookup.
//!
//! Each visitor's cart is identified by a [`CartId`] stored in their session.
//! Read-only handlers use [`OptionalSessionCart`], which never creates a
//! session. Handlers that add to the cart call [`ensure_cart_id`] once the
//! request has been validated, so a rejected request never starts a session.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use dessert_shop_core::CartId;

use crate::error::AppError;
use crate::models::session_keys;

/// Get the session's cart ID, minting and storing one if it has none.
///
/// # Errors
///
/// Returns an error if the session store fails.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(session: Session) -> Result<String> {
///     let cart_id = ensure_cart_id(&session).await?;
///     Ok(cart_id.to_string())
/// }
/// ```
pub async fn ensure_cart_id(session: &Session) -> Result<CartId, AppError> {
    if let Some(cart_id) = session.get::<CartId>(session_keys::CART_ID).await? {
        return Ok(cart_id);
    }

    let cart_id = CartId::generate();
    session.insert(session_keys::CART_ID, cart_id).await?;
    tracing::debug!(%cart_id, "Assigned new cart to session");

    Ok(cart_id)
}

/// Extractor for the visitor's cart ID, if they have one.
pub struct OptionalSessionCart(pub Option<CartId>);

impl<S> FromRequestParts<S> for OptionalSessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let cart_id = session.get::<CartId>(session_keys::CART_ID).await?;
        Ok(Self(cart_id))
    }
}

/// Get the session from extensions (set by `SessionManagerLayer`).
fn session_from_parts(parts: &Parts) -> Result<Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))
}
