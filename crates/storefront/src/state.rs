//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dessert_shop_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::services::CartHandle;

/// Error loading the product catalog at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart store handle and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartHandle,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Loaded product catalog
    /// * `carts` - Handle to a running cart store
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, carts: CartHandle) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart store handle.
    #[must_use]
    pub fn carts(&self) -> &CartHandle {
        &self.inner.carts
    }
}

/// Load the catalog from a JSON file, or the built-in menu when no path is set.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the catalog is invalid.
pub async fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(Catalog::desserts()?);
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Catalog::from_json(&json)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_builtin_catalog() {
        let catalog = load_catalog(None).await.unwrap();
        assert_eq!(catalog.len(), 9);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogLoadError::Io { .. }));
    }
}
