//! Integration tests for Dessert Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dessert-cart-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port, so tests are
//! independent and need no external services.

use std::path::{Path, PathBuf};

use dessert_cart_storefront::catalog::CatalogSource;
use dessert_cart_storefront::config::{CatalogConfig, SessionConfig, StorefrontConfig};
use dessert_cart_storefront::state::AppState;
use serde::Deserialize;

/// A storefront running on a local ephemeral port.
pub struct TestStorefront {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// JSON body returned by `POST /interactions`.
#[derive(Debug, Deserialize)]
pub struct PatchBody {
    pub status: String,
    pub rows: Vec<RowBody>,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct RowBody {
    pub product_id: i32,
    pub html: String,
}

/// Path to the catalog bundled with the storefront crate.
#[must_use]
pub fn bundled_catalog() -> PathBuf {
    storefront_dir().join("static/data.json")
}

fn storefront_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront")
}

/// Storefront configuration reading the catalog from `source`.
#[must_use]
pub fn test_config(source: CatalogSource) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        catalog: CatalogConfig {
            source,
            ..CatalogConfig::default()
        },
        sessions: SessionConfig::default(),
        static_dir: storefront_dir().join("static"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

impl TestStorefront {
    /// Load the catalog from `source` and serve the storefront.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(source: CatalogSource) -> Self {
        let state = AppState::initialize(test_config(source)).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has an address");

        tokio::spawn(async move {
            axum::serve(listener, dessert_cart_storefront::app(state))
                .await
                .expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    /// Serve the bundled catalog.
    pub async fn with_bundled_catalog() -> Self {
        Self::start(CatalogSource::File(bundled_catalog())).await
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Load the page in a fresh browser tab.
    ///
    /// # Panics
    ///
    /// Panics if the page does not load or carries no session id.
    pub async fn open(&self) -> TestPage<'_> {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .expect("Failed to get page");
        assert!(resp.status().is_success(), "GET /: {}", resp.status());

        let body = resp.text().await.expect("Failed to read page");
        let session_id = session_id(&body).expect("Page has a session id").to_string();
        TestPage {
            storefront: self,
            session_id,
            body,
        }
    }

    /// Post a click with exactly the given form fields.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_interaction(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url("/interactions"))
            .form(fields)
            .send()
            .await
            .expect("Failed to post interaction")
    }
}

/// One loaded page and its cart session.
pub struct TestPage<'a> {
    storefront: &'a TestStorefront,
    pub session_id: String,
    /// Markup as first rendered.
    pub body: String,
}

impl TestPage<'_> {
    /// Post a click from this page with the given form fields.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn click(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        let mut form = vec![("session_id", self.session_id.as_str())];
        form.extend_from_slice(fields);
        self.storefront.post_interaction(&form).await
    }

    /// Post `action` for `product_id` and decode the patch.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not a patch.
    pub async fn apply(&self, action: &str, product_id: &str) -> PatchBody {
        let resp = self
            .click(&[("action", action), ("product_id", product_id)])
            .await;
        assert!(
            resp.status().is_success(),
            "{action} {product_id}: {}",
            resp.status()
        );
        resp.json().await.expect("Patch body")
    }
}

/// The `data-session-id` attribute of a rendered page.
#[must_use]
pub fn session_id(page: &str) -> Option<&str> {
    const ATTR: &str = r#"data-session-id=""#;
    let start = page.find(ATTR)? + ATTR.len();
    let len = page.get(start..)?.find('"')?;
    page.get(start..start + len)
}
