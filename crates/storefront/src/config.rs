//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `EMARKET_CATALOG_URL` - Product catalog endpoint (default: the public mock API)
//! - `EMARKET_DATA_DIR` - Directory holding the key-value files (default: `.emarket`)
//! - `EMARKET_CATALOG_CACHE_TTL_SECS` - In-process catalog cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Catalog endpoint used when `EMARKET_CATALOG_URL` is unset.
pub const DEFAULT_CATALOG_URL: &str = "https://5fc9346b2af77700165ae514.mockapi.io/products";

const DEFAULT_DATA_DIR: &str = ".emarket";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product catalog endpoint (GET, JSON array)
    pub catalog_url: Url,
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// How long a fetched catalog is reused within the process
    pub catalog_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development")
    pub sentry_environment: Option<String>,
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

        let catalog_url = parse_catalog_url(
            "EMARKET_CATALOG_URL",
            &get_env_or_default("EMARKET_CATALOG_URL", DEFAULT_CATALOG_URL),
        )?;
        let data_dir = PathBuf::from(get_env_or_default("EMARKET_DATA_DIR", DEFAULT_DATA_DIR));
        let ttl_secs = get_env_or_default(
            "EMARKET_CATALOG_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("EMARKET_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            catalog_url,
            data_dir,
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at an explicit catalog and data directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `catalog_url` is not an http(s) URL.
    pub fn new(catalog_url: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_url: parse_catalog_url("catalog_url", catalog_url)?,
            data_dir: data_dir.into(),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and validate the catalog endpoint.
fn parse_catalog_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
