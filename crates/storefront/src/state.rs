//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::{ShopifyError, StorefrontClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Deliberately holds no cart state: cart
/// identity lives with the client, so every handler invocation is
/// self-contained.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, ShopifyError> {
        let storefront = StorefrontClient::new(&config.shopify)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }
}
