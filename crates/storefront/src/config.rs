//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com);
//!   a protocol prefix or trailing path is tolerated and stripped
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API access token
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version path segment (default: 2024-10)
//! - `SHOPIFY_REQUEST_TIMEOUT_MS` - Wall-clock timeout per upstream request
//!   (default: 10000)
//! - `SHOPIFY_API_ENDPOINT` - Verbatim endpoint override, for pointing the
//!   client at a stub upstream during local development
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Missing required variables fail startup. A misconfigured deployment is an
//! operator problem, so the server refuses to come up rather than answering
//! every cart request with an error.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Shopify Storefront API configuration
    pub shopify: ShopifyConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Shopify API version path segment (e.g., 2024-10)
    pub api_version: String,
    /// Storefront API access token
    pub storefront_token: SecretString,
    /// Wall-clock timeout for each upstream request, in milliseconds
    pub request_timeout_ms: u64,
    /// Verbatim endpoint override; wins over the domain-derived endpoint
    pub endpoint_override: Option<String>,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("storefront_token", &"[REDACTED]")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let shopify = ShopifyConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            shopify,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let request_timeout_ms = get_env_or_default("SHOPIFY_REQUEST_TIMEOUT_MS", "10000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_REQUEST_TIMEOUT_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            store_domain: get_required_env("SHOPIFY_STORE_DOMAIN")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-10"),
            storefront_token: get_required_secret("SHOPIFY_STOREFRONT_TOKEN")?,
            request_timeout_ms,
            endpoint_override: get_optional_env("SHOPIFY_API_ENDPOINT"),
        })
    }

    /// The GraphQL endpoint URL for this configuration.
    ///
    /// Built from the normalized store domain and API version unless an
    /// explicit override is configured.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint_override.clone().unwrap_or_else(|| {
            format!(
                "https://{}/api/{}/graphql.json",
                normalize_store_domain(&self.store_domain),
                self.api_version
            )
        })
    }
}

/// Reduce a configured store domain to a bare host.
///
/// Operators paste domains in every shape (`https://x.myshopify.com/`,
/// `x.myshopify.com/admin`); the endpoint only wants the host part.
fn normalize_store_domain(domain: &str) -> String {
    let trimmed = domain.trim();
    let without_protocol = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_protocol
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_for_domain(domain: &str) -> ShopifyConfig {
        ShopifyConfig {
            store_domain: domain.to_string(),
            api_version: "2024-10".to_string(),
            storefront_token: SecretString::from("token"),
            request_timeout_ms: 10_000,
            endpoint_override: None,
        }
    }

    #[test]
    fn test_normalize_store_domain_bare() {
        assert_eq!(
            normalize_store_domain("boboparty.myshopify.com"),
            "boboparty.myshopify.com"
        );
    }

    #[test]
    fn test_normalize_store_domain_strips_protocol() {
        assert_eq!(
            normalize_store_domain("https://boboparty.myshopify.com"),
            "boboparty.myshopify.com"
        );
        assert_eq!(
            normalize_store_domain("http://boboparty.myshopify.com"),
            "boboparty.myshopify.com"
        );
    }

    #[test]
    fn test_normalize_store_domain_strips_path_and_whitespace() {
        assert_eq!(
            normalize_store_domain("  https://boboparty.myshopify.com/admin/settings  "),
            "boboparty.myshopify.com"
        );
    }

    #[test]
    fn test_endpoint_from_domain() {
        let config = config_for_domain("https://boboparty.myshopify.com/");
        assert_eq!(
            config.endpoint(),
            "https://boboparty.myshopify.com/api/2024-10/graphql.json"
        );
    }

    #[test]
    fn test_endpoint_override_wins() {
        let mut config = config_for_domain("boboparty.myshopify.com");
        config.endpoint_override =
            Some("http://127.0.0.1:9000/api/2024-10/graphql.json".to_string());
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9000/api/2024-10/graphql.json"
        );
    }

    #[test]
    fn test_shopify_config_debug_redacts_token() {
        let mut config = config_for_domain("boboparty.myshopify.com");
        config.storefront_token = SecretString::from("shpat_super_secret_value");
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("boboparty.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_super_secret_value"));
    }
}
