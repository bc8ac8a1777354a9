//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Five fixed cart operations (create, read, add, update, remove), so the
//!   GraphQL documents are hand-authored in [`storefront::queries`] and the
//!   responses are parsed through the `graphql_client` envelope
//! - Shopify is source of truth - every mutation returns the full cart
//!   snapshot, never a delta
//! - No response caching: carts are mutable state
//!
//! # Error classification
//!
//! The Storefront API reports a vanished cart only as free-text error
//! messages (English or Chinese phrasing, depending on the shop locale), with
//! no structured code. That heuristic lives here, at the boundary: upstream
//! failures are classified once into the closed [`ShopifyError`] set, and
//! everything downstream matches on the kind instead of re-parsing message
//! strings.

mod storefront;

pub use storefront::StorefrontClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed, including timeout of the bounded request window.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream responded with a non-success status.
    #[error("Shopify request failed: {0}")]
    Status(reqwest::StatusCode),

    /// GraphQL-level errors in a successful HTTP response.
    #[error("Shopify error: {0}")]
    Graphql(String),

    /// Mutation-level `userErrors` (e.g., malformed variant id).
    #[error("User error: {0}")]
    UserError(String),

    /// The cart (or other resource) no longer exists upstream.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream violated its own contract (no data and no errors, or a
    /// mutation payload with a null cart and no user errors).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Upstream response body was not decodable.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ShopifyError {
    /// Whether this error means the requested cart no longer exists.
    ///
    /// This is the signal the proxy uses for expiry recovery; everything
    /// else is surfaced as a server failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Whether an upstream error message describes a missing resource.
///
/// The Storefront API has no structured not-found code; it phrases the
/// condition as "not found" / "does not exist" in English shops and with
/// 「不存在」 in Chinese ones.
fn is_not_found_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("not found") || lower.contains("does not exist") || message.contains("不存在")
}

/// Classify joined GraphQL error messages into an error kind.
pub(crate) fn classify_graphql_errors(joined: String) -> ShopifyError {
    if is_not_found_message(&joined) {
        ShopifyError::NotFound(joined)
    } else {
        ShopifyError::Graphql(joined)
    }
}

/// Classify joined mutation `userErrors` messages into an error kind.
pub(crate) fn classify_user_errors(joined: String) -> ShopifyError {
    if is_not_found_message(&joined) {
        ShopifyError::NotFound(joined)
    } else {
        ShopifyError::UserError(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("Cart not found: gid://shopify/Cart/abc".to_string());
        assert_eq!(
            err.to_string(),
            "Not found: Cart not found: gid://shopify/Cart/abc"
        );

        let err = ShopifyError::UserError("Merchandise id is invalid".to_string());
        assert_eq!(err.to_string(), "User error: Merchandise id is invalid");
    }

    #[test]
    fn test_is_not_found_message_english() {
        assert!(is_not_found_message("Cart not found."));
        assert!(is_not_found_message("The specified cart does not exist."));
        assert!(is_not_found_message("Resource Not Found"));
    }

    #[test]
    fn test_is_not_found_message_chinese() {
        assert!(is_not_found_message("此購物車已不存在。"));
    }

    #[test]
    fn test_is_not_found_message_rejects_other_errors() {
        assert!(!is_not_found_message("Merchandise id is invalid"));
        assert!(!is_not_found_message("Quantity must be positive"));
        assert!(!is_not_found_message(""));
    }

    #[test]
    fn test_classify_graphql_errors() {
        assert!(matches!(
            classify_graphql_errors("The specified cart does not exist.".to_string()),
            ShopifyError::NotFound(_)
        ));
        assert!(matches!(
            classify_graphql_errors("Field 'cart' doesn't accept argument 'x'".to_string()),
            ShopifyError::Graphql(_)
        ));
    }

    #[test]
    fn test_classify_user_errors() {
        assert!(matches!(
            classify_user_errors("購物車不存在".to_string()),
            ShopifyError::NotFound(_)
        ));
        assert!(matches!(
            classify_user_errors("The merchandise line was invalid".to_string()),
            ShopifyError::UserError(_)
        ));
    }
}
