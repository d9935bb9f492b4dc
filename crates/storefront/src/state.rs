//! Application state shared across handlers.

use std::sync::Arc;

use tracing::{error, instrument};

use crate::catalog::CatalogLoader;
use crate::config::StorefrontConfig;
use crate::session::SessionRegistry;

/// Whether the storefront has a catalog to show.
#[derive(Debug, Clone)]
pub enum Storefront {
    /// The catalog loaded; every page load opens its own cart session.
    Ready(SessionRegistry),
    /// Startup failed; nothing but the error page can be served.
    Unavailable { reason: String },
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: Storefront,
}

impl AppState {
    /// Create application state from an already started storefront.
    #[must_use]
    pub fn new(config: StorefrontConfig, storefront: Storefront) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Load the catalog once and prepare the cart session registry.
    ///
    /// A failed load does not abort startup; the state records the failure
    /// and the page route shows it.
    #[instrument(skip_all, fields(source = %config.catalog.source))]
    pub async fn initialize(config: StorefrontConfig) -> Self {
        let loader = CatalogLoader::from_config(&config.catalog);

        let storefront = match loader.load().await {
            Ok(catalog) => Storefront::Ready(SessionRegistry::new(Arc::new(catalog), config.sessions)),
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                error!(error = %e, sentry_event_id = %event_id, "Failed to load catalog");
                Storefront::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        Self::new(config, storefront)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn storefront(&self) -> &Storefront {
        &self.inner.storefront
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalog::CatalogSource;
    use crate::config::{CatalogConfig, SessionConfig};

    fn config(source: CatalogSource) -> StorefrontConfig {
        StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            catalog: CatalogConfig {
                source,
                ..CatalogConfig::default()
            },
            sessions: SessionConfig::default(),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_initialize_with_bundled_catalog_is_ready() {
        let source = CatalogSource::File(PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/static/data.json"
        )));
        let state = AppState::initialize(config(source)).await;
        match state.storefront() {
            Storefront::Ready(sessions) => assert_eq!(sessions.catalog().len(), 9),
            Storefront::Unavailable { reason } => panic!("catalog should have loaded: {reason}"),
        }
    }

    #[tokio::test]
    async fn test_initialize_with_missing_catalog_is_unavailable() {
        let source = CatalogSource::File(PathBuf::from("/nonexistent/dessert-cart/data.json"));
        let state = AppState::initialize(config(source)).await;

        match state.storefront() {
            Storefront::Unavailable { reason } => assert!(reason.contains("data.json")),
            Storefront::Ready(_) => panic!("catalog should not have loaded"),
        }
    }
}
