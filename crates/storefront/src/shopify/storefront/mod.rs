//! Shopify Storefront API client implementation.
//!
//! Hand-authored GraphQL documents posted with `reqwest`, parsed through the
//! `graphql_client` response envelope. Cart responses are never cached.

mod conversions;
pub mod queries;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::Response;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;

use boboparty_core::{Cart, CartLineInput, CartLineUpdateInput};

use super::{ShopifyError, classify_graphql_errors, classify_user_errors};
use crate::config::ShopifyConfig;

/// Header carrying the Storefront API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API cart operations.
///
/// Stateless per call: one bounded HTTP request per operation, no retries,
/// no shared mutable state beyond the connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// The wall-clock timeout from the configuration is installed on the
    /// underlying HTTP client; when it fires the in-flight request is
    /// aborted and surfaces as [`ShopifyError::Http`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (e.g., TLS
    /// backend initialization failure).
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: config.endpoint(),
                access_token: config.storefront_token.expose_secret().to_string(),
            }),
        })
    }

    /// Execute a GraphQL operation and decode its `data` payload.
    async fn request<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status(status));
        }

        let envelope: Response<T> = match serde_json::from_str(&response_text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(classify_graphql_errors(joined));
        }

        envelope.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::Protocol("response contained no data and no errors".to_string())
        })
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Create a new cart, optionally seeded with lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Option<Vec<CartLineInput>>,
    ) -> Result<Cart, ShopifyError> {
        let data: wire::CreateCartData = self
            .request(&queries::CREATE_CART, json!({ "lines": lines }))
            .await?;

        cart_from_payload(data.cart_create, "cart was not created")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the upstream no longer knows the
    /// id (the primary signal of an expired cart), or another error if the
    /// request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ShopifyError> {
        let data: wire::GetCartData = self
            .request(&queries::GET_CART, json!({ "cartId": cart_id }))
            .await?;

        data.cart.map(conversions::convert_cart).ok_or_else(|| {
            ShopifyError::NotFound(format!("Cart not found: {cart_id}"))
        })
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned;
    /// a stale cart id surfaces as [`ShopifyError::NotFound`].
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: wire::AddLinesData = self
            .request(
                &queries::ADD_LINES,
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;

        cart_from_payload(data.cart_lines_add, "lines were not added to cart")
    }

    /// Update quantities of existing cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, updates), fields(cart_id = %cart_id))]
    pub async fn update_lines(
        &self,
        cart_id: &str,
        updates: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let data: wire::UpdateLinesData = self
            .request(
                &queries::UPDATE_LINES,
                json!({ "cartId": cart_id, "lines": updates }),
            )
            .await?;

        cart_from_payload(data.cart_lines_update, "cart lines were not updated")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let data: wire::RemoveLinesData = self
            .request(
                &queries::REMOVE_LINES,
                json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;

        cart_from_payload(data.cart_lines_remove, "cart lines were not removed")
    }
}

/// Turn a mutation payload into a domain cart.
///
/// Non-empty `userErrors` win over any cart in the payload; a null cart with
/// no user errors means the operation silently failed, which the upstream
/// contract does not allow.
fn cart_from_payload(payload: wire::CartPayload, context: &str) -> Result<Cart, ShopifyError> {
    if !payload.user_errors.is_empty() {
        let joined = payload
            .user_errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(classify_user_errors(joined));
    }

    payload
        .cart
        .map(conversions::convert_cart)
        .ok_or_else(|| ShopifyError::Protocol(context.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(json: &str) -> wire::CartPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_cart_from_payload_joins_user_errors() {
        let payload = payload(
            r#"{
                "cart": null,
                "userErrors": [
                    { "message": "Merchandise id is invalid" },
                    { "message": "Quantity must be positive" }
                ]
            }"#,
        );

        let err = cart_from_payload(payload, "test").unwrap_err();
        assert_eq!(
            err.to_string(),
            "User error: Merchandise id is invalid; Quantity must be positive"
        );
    }

    #[test]
    fn test_cart_from_payload_stale_cart_classifies_not_found() {
        let payload = payload(
            r#"{
                "cart": null,
                "userErrors": [{ "message": "The specified cart does not exist." }]
            }"#,
        );

        assert!(cart_from_payload(payload, "test").unwrap_err().is_not_found());
    }

    #[test]
    fn test_cart_from_payload_null_cart_is_protocol_error() {
        let payload = payload(r#"{ "cart": null, "userErrors": [] }"#);

        assert!(matches!(
            cart_from_payload(payload, "cart was not created").unwrap_err(),
            ShopifyError::Protocol(_)
        ));
    }
}
