//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`; this is the only place that
//! decides HTTP status and response shape. Every error body is
//! `{"error": message}`, matching the proxy contract the widgets consume.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was missing fields or malformed. Always the
    /// caller's fault; never retried.
    #[error("{0}")]
    BadRequest(String),

    /// A Shopify operation failed. The joined upstream message is surfaced
    /// for operator visibility; it is rarely user-actionable.
    #[error("{0}")]
    Shopify(#[from] ShopifyError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture upstream failures to Sentry; client mistakes are not events
        if let Self::Shopify(ref err) = self {
            let event_id = sentry::capture_error(err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Cart request error"
            );
        }

        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Shopify(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_shape() {
        let response = AppError::BadRequest("Missing cartId.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Missing cartId." }));
    }

    #[tokio::test]
    async fn test_shopify_error_is_500_with_message() {
        let response =
            AppError::Shopify(ShopifyError::UserError("Merchandise id is invalid".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "User error: Merchandise id is invalid");
    }
}
