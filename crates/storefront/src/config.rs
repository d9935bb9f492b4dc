//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_SOURCE` - Catalog file path or `http(s)://` URL
//!   (default: crates/storefront/static/data.json)
//! - `CATALOG_LOAD_ATTEMPTS` - Total catalog load attempts, at least 1 (default: 1)
//! - `CATALOG_RETRY_DELAY_MS` - Delay between load attempts (default: 250)
//! - `SESSION_IDLE_TIMEOUT_SECS` - Drop a page's cart after this long without
//!   requests (default: 1800)
//! - `SESSION_CAPACITY` - Most cart sessions kept at once (default: 1000)
//! - `STATIC_DIR` - Directory served under `/static` (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::CatalogSource;

const DEFAULT_CATALOG_SOURCE: &str = "crates/storefront/static/data.json";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

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
    /// Where and how to load the product catalog
    pub catalog: CatalogConfig,
    /// Lifetime and number of per-page cart sessions
    pub sessions: SessionConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog loading configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub retry_delay: Duration,
}

/// Cart session limits.
///
/// Every page load gets its own cart; a session nobody has touched for
/// `idle_timeout` is dropped, and at most `capacity` are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_timeout: Duration,
    pub capacity: u64,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let catalog = CatalogConfig::from_env()?;
        let sessions = SessionConfig::from_env()?;
        let static_dir = PathBuf::from(get_env_or_default("STATIC_DIR", DEFAULT_STATIC_DIR));

        Ok(Self {
            host,
            port,
            catalog,
            sessions,
            static_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let source = parse_env("CATALOG_SOURCE", DEFAULT_CATALOG_SOURCE)?;
        let attempts: u32 = parse_env("CATALOG_LOAD_ATTEMPTS", "1")?;
        if attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_LOAD_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let retry_delay = Duration::from_millis(parse_env("CATALOG_RETRY_DELAY_MS", "250")?);

        Ok(Self {
            source,
            attempts,
            retry_delay,
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::File(PathBuf::from(DEFAULT_CATALOG_SOURCE)),
            attempts: 1,
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let idle_timeout = Duration::from_secs(parse_env("SESSION_IDLE_TIMEOUT_SECS", "1800")?);
        let capacity: u64 = parse_env("SESSION_CAPACITY", "1000")?;
        if capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            idle_timeout,
            capacity,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(1800),
            capacity: 1000,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
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
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
