//! HTTP client for the cart proxy endpoint.
//!
//! Speaks the proxy's JSON contract: success bodies are `{"cart": ...}`,
//! the GET special case is `{"cart": null, "expired": true}`, and every
//! client or server error is `{"error": message}`.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use boboparty_core::{Cart, CartLineInput, CartLineUpdateInput};

/// Errors from talking to the cart proxy.
#[derive(Debug, Error)]
pub enum CartApiError {
    /// The request never produced a decodable response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with an error status and message.
    #[error("cart API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    /// A success response without a cart where one was required.
    #[error("cart response contained no cart")]
    MissingCart,
}

/// Envelope for every proxy response.
#[derive(Debug, Deserialize)]
struct CartEnvelope {
    cart: Option<Cart>,
    #[serde(default)]
    expired: bool,
    error: Option<String>,
}

/// Thin client for the proxy's single resource path.
#[derive(Debug, Clone)]
pub struct CartApi {
    http: reqwest::Client,
    base_url: String,
}

impl CartApi {
    /// Create a client against a storefront base URL (no trailing slash
    /// needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/cart", self.base_url)
    }

    /// Fetch the cart for an id.
    ///
    /// Returns `None` when the proxy reports the cart expired or absent -
    /// the caller's cue to forget the stored id.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-success responses.
    pub async fn fetch(&self, cart_id: &str) -> Result<Option<Cart>, CartApiError> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("cartId", cart_id)])
            .send()
            .await?;

        let envelope = decode(response).await?;
        if envelope.expired {
            tracing::debug!(%cart_id, "cart reported expired by proxy");
        }
        Ok(envelope.cart)
    }

    /// Add lines, creating a cart when no id is supplied (or when the server
    /// discovers the id is stale). Returns the fresh cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-success responses.
    pub async fn add_lines(
        &self,
        cart_id: Option<&str>,
        lines: &[CartLineInput],
    ) -> Result<Cart, CartApiError> {
        let response = self
            .http
            .post(self.endpoint())
            .json(&json!({ "cartId": cart_id, "lines": lines }))
            .send()
            .await?;

        require_cart(decode(response).await?)
    }

    /// Update line quantities. Returns the fresh cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-success responses.
    pub async fn update_lines(
        &self,
        cart_id: &str,
        updates: &[CartLineUpdateInput],
    ) -> Result<Cart, CartApiError> {
        let response = self
            .http
            .put(self.endpoint())
            .json(&json!({ "cartId": cart_id, "lineUpdates": updates }))
            .send()
            .await?;

        require_cart(decode(response).await?)
    }

    /// Remove lines. Returns the fresh cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-success responses.
    pub async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<Cart, CartApiError> {
        let response = self
            .http
            .delete(self.endpoint())
            .json(&json!({ "cartId": cart_id, "lineIds": line_ids }))
            .send()
            .await?;

        require_cart(decode(response).await?)
    }
}

async fn decode(response: reqwest::Response) -> Result<CartEnvelope, CartApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<CartEnvelope>()
            .await
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| "cart request failed".to_string());
        return Err(CartApiError::Api { status, message });
    }

    Ok(response.json().await?)
}

fn require_cart(envelope: CartEnvelope) -> Result<Cart, CartApiError> {
    envelope.cart.ok_or(CartApiError::MissingCart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decodes_expired_shape() {
        let envelope: CartEnvelope =
            serde_json::from_str(r#"{ "cart": null, "expired": true }"#).unwrap();
        assert!(envelope.expired);
        assert!(envelope.cart.is_none());
    }

    #[test]
    fn test_envelope_decodes_error_shape() {
        let envelope: CartEnvelope =
            serde_json::from_str(r#"{ "error": "Missing cartId." }"#).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("Missing cartId."));
        assert!(!envelope.expired);
    }

    #[test]
    fn test_base_url_trailing_slash_is_tolerated() {
        let api = CartApi::new("http://127.0.0.1:3000/");
        assert_eq!(api.endpoint(), "http://127.0.0.1:3000/api/cart");
    }
}
