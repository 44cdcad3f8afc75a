//! Integration tests for the dessert shop storefront.
//!
//! Each test starts its own storefront on an ephemeral port, so tests are
//! independent and need no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dessert-shop-integration-tests
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Client;
use tokio::net::TcpListener;

use dessert_shop_core::Catalog;
use dessert_shop_storefront::config::StorefrontConfig;
use dessert_shop_storefront::services::CartStore;
use dessert_shop_storefront::state::AppState;

/// A storefront running in the background for the duration of a test.
pub struct TestContext {
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront with the built-in dessert menu.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the menu fails to load.
    pub async fn new() -> Self {
        Self::with_config(StorefrontConfig::default()).await
    }

    /// Start a storefront with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the menu fails to load.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let catalog = Catalog::desserts().expect("Failed to load built-in catalog");
        let (carts, _task) = CartStore::spawn(config.cart_mailbox, config.session_idle);
        let state = AppState::new(config, catalog, carts);
        let app = dessert_shop_storefront::app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Test storefront failed");
        });

        Self {
            base_url: format!("http://{addr}"),
        }
    }

    /// Build a URL for a path on this storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client that keeps its session cookie between requests, like a browser.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn visitor() -> Client {
        Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client")
    }
}
