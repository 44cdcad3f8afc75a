//! Dessert Shop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` only
//! wires configuration, telemetry and the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use dessert_shop_core::Catalog;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::services::CartStore;

    fn test_app() -> Router {
        let config = StorefrontConfig::default();
        let (carts, _task) = CartStore::spawn(config.cart_mailbox, config.session_idle);
        let state = AppState::new(config, Catalog::desserts().unwrap(), carts);
        app(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::get("/health")
                    .header(middleware::REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[middleware::REQUEST_ID_HEADER],
            "abc-123"
        );
    }

    #[tokio::test]
    async fn test_list_products_by_category() {
        let response = test_app()
            .oneshot(
                Request::get("/api/products?category=baklava")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "Pistachio Baklava");
        assert_eq!(json[0]["price_display"], "$4.00");
    }

    #[tokio::test]
    async fn test_unknown_product_is_404() {
        let response = test_app()
            .oneshot(Request::get("/api/products/99").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Not found: product 99");
    }

    #[tokio::test]
    async fn test_cart_without_session_is_empty() {
        let response = test_app()
            .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let json = body_json(response).await;
        assert_eq!(json["item_count"], 0);
        assert_eq!(json["total_display"], "$0.00");
    }

    #[tokio::test]
    async fn test_add_item_sets_session_cookie() {
        let response = test_app()
            .oneshot(
                Request::post("/api/cart/items")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"product_id": 3}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(middleware::session::SESSION_COOKIE_NAME));

        let json = body_json(response).await;
        assert_eq!(json["change"]["kind"], "added");
        assert_eq!(json["cart"]["total"], "8.00");
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_404_without_session() {
        let response = test_app()
            .oneshot(
                Request::post("/api/cart/items")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"product_id": 404}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_checkout_without_cart_is_400() {
        let response = test_app()
            .oneshot(Request::post("/api/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Bad request: cart is empty");
    }
}
