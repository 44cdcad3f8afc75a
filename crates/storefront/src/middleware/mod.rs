//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with a moka-backed store)
//!
//! The cart session helpers read the session set up by layer 4.

pub mod cart_session;
pub mod request_id;
pub mod session;
pub mod session_store;

pub use cart_session::{OptionalSessionCart, ensure_cart_id};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::create_session_layer;
pub use session_store::MokaSessionStore;
