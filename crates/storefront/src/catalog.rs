//! Catalog loader.
//!
//! Reads the product list once at startup from a local JSON file or an
//! `http(s)` URL. The source must be a JSON array of product records:
//!
//! ```json
//! [{ "id": 1, "name": "Waffle with Berries", "category": "Waffle", "price": 6.5,
//!    "image": { "thumbnail": "…", "mobile": "…", "tablet": "…", "desktop": "…" } }]
//! ```
//!
//! Transport failures may be retried a bounded number of times; malformed
//! data and out-of-range prices fail immediately.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dessert_cart_core::{Catalog, Product, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::CatalogConfig;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog URL answered with a non-success status.
    #[error("catalog request returned status {0}")]
    Status(u16),

    /// The data is not a sequence of product records.
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A product's price is negative or above [`Product::MAX_PRICE`].
    #[error("product {id} has out-of-range price {price}")]
    InvalidPrice { id: ProductId, price: Decimal },
}

impl LoadError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Malformed(_) | Self::InvalidPrice { .. })
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(Url),
}

impl FromStr for CatalogSource {
    type Err = url::ParseError;

    /// `http://` and `https://` prefixes select a URL; anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s).map(Self::Url)
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Loads the catalog from a [`CatalogSource`].
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    attempts: u32,
    retry_delay: Duration,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a loader that makes a single attempt.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            attempts: 1,
            retry_delay: Duration::ZERO,
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.source.clone()).with_retry(config.attempts, config.retry_delay)
    }

    /// Allow up to `attempts` total attempts with `delay` between them.
    #[must_use]
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub const fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Load and parse the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source stays unreachable for every
    /// attempt or its data is malformed.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<Catalog, LoadError> {
        let mut attempt = 1;
        loop {
            match self.fetch().await {
                Ok(bytes) => {
                    let products: Vec<Product> = serde_json::from_slice(&bytes)?;
                    if let Some(product) = products.iter().find(|p| !p.has_valid_price()) {
                        return Err(LoadError::InvalidPrice {
                            id: product.id,
                            price: product.price,
                        });
                    }
                    info!(products = products.len(), attempt, "Catalog loaded");
                    return Ok(Catalog::new(products));
                }
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    warn!(attempt, error = %e, "Catalog load failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            CatalogSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            CatalogSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, http::StatusCode, routing::get};

    use super::*;

    fn bundled_catalog() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("static/data.json")
    }

    async fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dessert-cart-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn test_catalog_source_from_str() {
        assert_eq!(
            "data.json".parse::<CatalogSource>().unwrap(),
            CatalogSource::File(PathBuf::from("data.json"))
        );
        assert!(matches!(
            "http://localhost:8080/data.json".parse::<CatalogSource>().unwrap(),
            CatalogSource::Url(_)
        ));
        assert!("https://".parse::<CatalogSource>().is_err());
    }

    #[tokio::test]
    async fn test_load_bundled_catalog_from_file() {
        let catalog = CatalogLoader::new(CatalogSource::File(bundled_catalog()))
            .load()
            .await
            .unwrap();

        assert_eq!(catalog.len(), 9);
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.id, ProductId::new(1));
        assert_eq!(first.name, "Waffle with Berries");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("dessert-cart-does-not-exist.json");
        let err = CatalogLoader::new(CatalogSource::File(path))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn test_non_array_is_malformed() {
        let path = write_temp(r#"{"products": []}"#).await;
        let err = CatalogLoader::new(CatalogSource::File(path.clone()))
            .load()
            .await
            .unwrap_err();
        tokio::fs::remove_file(path).await.unwrap();

        assert!(matches!(err, LoadError::Malformed(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_record_without_product_shape_is_malformed() {
        let path = write_temp(r#"[{"id": 1, "name": "Waffle"}]"#).await;
        let err = CatalogLoader::new(CatalogSource::File(path.clone()))
            .load()
            .await
            .unwrap_err();
        tokio::fs::remove_file(path).await.unwrap();

        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_price_is_rejected() {
        let record = |price: &str| {
            format!(
                r#"[{{"id": 7, "name": "Gold Leaf Cake", "category": "Cake", "price": {price},
                     "image": {{"thumbnail": "t", "mobile": "m", "tablet": "t", "desktop": "d"}}}}]"#
            )
        };

        for price in ["1000000.01", "-1"] {
            let path = write_temp(&record(price)).await;
            let err = CatalogLoader::new(CatalogSource::File(path.clone()))
                .with_retry(3, Duration::from_millis(1))
                .load()
                .await
                .unwrap_err();
            tokio::fs::remove_file(path).await.unwrap();

            assert!(
                matches!(err, LoadError::InvalidPrice { id, .. } if id == ProductId::new(7)),
                "{price}: {err}"
            );
            assert!(!err.is_transient());
        }

        let path = write_temp(&record("1000000")).await;
        let catalog = CatalogLoader::new(CatalogSource::File(path.clone()))
            .load()
            .await
            .unwrap();
        tokio::fs::remove_file(path).await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let body = tokio::fs::read_to_string(bundled_catalog()).await.unwrap();
        let base = serve(Router::new().route("/data.json", get(move || async move { body }))).await;

        let source = format!("{base}/data.json").parse().unwrap();
        let catalog = CatalogLoader::new(source).load().await.unwrap();
        assert_eq!(catalog.len(), 9);
    }

    #[tokio::test]
    async fn test_http_error_status_fails_load() {
        let base = serve(Router::new().route(
            "/data.json",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let source = format!("{base}/data.json").parse().unwrap();
        let err = CatalogLoader::new(source).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Status(500)));
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_up_to_bound() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let base = serve(Router::new().route(
            "/data.json",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        (StatusCode::SERVICE_UNAVAILABLE, String::new())
                    } else {
                        (StatusCode::OK, "[]".to_string())
                    }
                }
            }),
        ))
        .await;
        let source: CatalogSource = format!("{base}/data.json").parse().unwrap();

        let err = CatalogLoader::new(source.clone())
            .with_retry(2, Duration::from_millis(1))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Status(503)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        let catalog = CatalogLoader::new(source)
            .with_retry(3, Duration::from_millis(1))
            .load()
            .await
            .unwrap();
        assert!(catalog.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
