//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog file (default: built-in dessert menu)
//! - `STOREFRONT_SESSION_IDLE_MINUTES` - Session and cart idle expiry, 1 to 576000 (default: 60)
//! - `STOREFRONT_CART_MAILBOX` - Cart store command queue capacity (default: 64)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog file to load instead of the built-in menu
    pub catalog_path: Option<PathBuf>,
    /// How long an idle session (and its cart) lives
    pub session_idle: Duration,
    /// Capacity of the cart store's command queue
    pub cart_mailbox: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            session_idle: Duration::from_secs(60 * 60),
            cart_mailbox: 64,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let idle_minutes: u64 = get_parsed_env("STOREFRONT_SESSION_IDLE_MINUTES", "60")?;
        let session_idle = session_idle_from_minutes(idle_minutes)?;

        let cart_mailbox: usize = get_parsed_env("STOREFRONT_CART_MAILBOX", "64")?;
        if cart_mailbox == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CART_MAILBOX".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            session_idle,
            cart_mailbox,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Longest accepted idle period (400 days, the browser cookie maximum).
pub const MAX_SESSION_IDLE_MINUTES: u64 = 400 * 24 * 60;

/// Convert the idle setting to a duration, rejecting zero and values past
/// the cookie maximum.
fn session_idle_from_minutes(minutes: u64) -> Result<Duration, ConfigError> {
    if minutes == 0 || minutes > MAX_SESSION_IDLE_MINUTES {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_SESSION_IDLE_MINUTES".to_string(),
            format!("must be between 1 and {MAX_SESSION_IDLE_MINUTES}"),
        ));
    }
    Ok(Duration::from_secs(minutes * 60))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable (or its default) parsed into `T`.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            ..StorefrontConfig::default()
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = StorefrontConfig::default();
        assert!(!config.is_secure());

        config.base_url = "https://desserts.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_value_ok() {
        let port: u16 = parse_value("STOREFRONT_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);

        let host: IpAddr = parse_value("STOREFRONT_HOST", "0.0.0.0").unwrap();
        assert!(host.is_unspecified());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "not-a-port").unwrap_err();
        let ConfigError::InvalidEnvVar(key, _) = err;
        assert_eq!(key, "STOREFRONT_PORT");
    }

    #[test]
    fn test_session_idle_bounds() {
        assert_eq!(
            session_idle_from_minutes(90).unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert!(session_idle_from_minutes(MAX_SESSION_IDLE_MINUTES).is_ok());
        assert!(session_idle_from_minutes(0).is_err());
        assert!(session_idle_from_minutes(MAX_SESSION_IDLE_MINUTES + 1).is_err());
        assert!(session_idle_from_minutes(u64::MAX).is_err());
    }

    #[test]
    fn test_default_session_idle_is_an_hour() {
        let config = StorefrontConfig::default();
        assert_eq!(config.session_idle, Duration::from_secs(3600));
        assert_eq!(config.cart_mailbox, 64);
    }
}
