//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Sessions hold only the
//! visitor's cart ID, and nothing is persisted across restarts.
//!
//! Every request with a session saves it, so the expiry slides forward
//! while the visitor is active and the cart lives as long as the session.

use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::middleware::session_store::MokaSessionStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ds_session";

/// Upper bound on cookie lifetime (400 days, the browser maximum).
const MAX_SESSION_SECONDS: i64 = 400 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
///
/// Sessions expire after the configured idle period, the same period the
/// cart store uses for carts.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    let store = MokaSessionStore::new(config.session_idle);
    let idle_seconds = i64::try_from(config.session_idle.as_secs())
        .map_or(MAX_SESSION_SECONDS, |secs| secs.min(MAX_SESSION_SECONDS));

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_seconds),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_always_save(true)
}
