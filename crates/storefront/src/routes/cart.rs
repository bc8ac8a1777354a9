//! Cart proxy API handlers.
//!
//! One resource path, four methods, JSON in and out. The browser holds only
//! the cart id; the Storefront access token never leaves the server.
//!
//! Expiry recovery lives here: a cart id the upstream has forgotten is not
//! an error the shopper can do anything about, so `GET` reports it as
//! `{"cart": null, "expired": true}` (the widget forgets the id) and a
//! `POST` add against a stale id falls back to creating a fresh cart with
//! the requested lines.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use boboparty_core::{Cart, CartLineInput, CartLineUpdateInput};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/cart`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub cart_id: Option<String>,
}

/// Request body shared by the mutating methods.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequestBody {
    pub cart_id: Option<String>,
    pub lines: Option<Vec<CartLineInput>>,
    pub line_updates: Option<Vec<CartLineUpdateInput>>,
    pub line_ids: Option<Vec<String>>,
}

// =============================================================================
// Response helpers
// =============================================================================

fn cart_json(cart: &Cart) -> Response {
    Json(json!({ "cart": cart })).into_response()
}

fn expired_json() -> Response {
    Json(json!({ "cart": null, "expired": true })).into_response()
}

/// Unwrap a JSON body, turning any extractor rejection into the contract's
/// 400 before a single service call is made.
fn require_body(
    body: std::result::Result<Json<CartRequestBody>, JsonRejection>,
) -> Result<CartRequestBody> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(_) => Err(AppError::BadRequest("Invalid JSON body.".to_string())),
    }
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|value| !value.is_empty())
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/cart?cartId=` - fetch the current cart snapshot.
///
/// An expired cart is a 200 with the expired flag, not an error: the caller
/// distinguishes "forget this id" from a genuine outage by status code.
#[instrument(skip(state, query))]
pub async fn show(State(state): State<AppState>, Query(query): Query<CartQuery>) -> Result<Response> {
    let Some(cart_id) = non_empty(query.cart_id) else {
        return Err(AppError::BadRequest("Missing cartId.".to_string()));
    };

    match state.storefront().get_cart(&cart_id).await {
        Ok(cart) => Ok(cart_json(&cart)),
        Err(err) if err.is_not_found() => {
            tracing::info!(%cart_id, "cart expired upstream, telling the client to forget it");
            Ok(expired_json())
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /api/cart` - create a cart, or add lines to an existing one.
///
/// Without a `cartId` this always creates (any stale notion of identity is
/// the client's to discard). With one, a not-found add falls back to a brand
/// new cart so a shopper is never blocked by an id they could not know was
/// stale.
#[instrument(skip(state, body))]
pub async fn create_or_add(
    State(state): State<AppState>,
    body: std::result::Result<Json<CartRequestBody>, JsonRejection>,
) -> Result<Response> {
    let body = require_body(body)?;

    let Some(cart_id) = non_empty(body.cart_id) else {
        let cart = state.storefront().create_cart(body.lines).await?;
        return Ok(cart_json(&cart));
    };

    let Some(lines) = body.lines.filter(|lines| !lines.is_empty()) else {
        return Err(AppError::BadRequest("Missing cart lines.".to_string()));
    };

    match state.storefront().add_lines(&cart_id, lines.clone()).await {
        Ok(cart) => Ok(cart_json(&cart)),
        Err(err) if err.is_not_found() => {
            tracing::warn!(%cart_id, "stale cart id on add, creating a replacement cart");
            let cart = state.storefront().create_cart(Some(lines)).await?;
            Ok(cart_json(&cart))
        }
        Err(err) => Err(err.into()),
    }
}

/// `PUT /api/cart` - update line quantities.
///
/// Quantity 0 is rejected rather than treated as an implicit removal: the
/// widgets clamp to 1, and `DELETE` is the one deletion path.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    body: std::result::Result<Json<CartRequestBody>, JsonRejection>,
) -> Result<Response> {
    let body = require_body(body)?;

    let Some(cart_id) = non_empty(body.cart_id) else {
        return Err(AppError::BadRequest("Missing cartId.".to_string()));
    };
    let Some(updates) = body.line_updates.filter(|updates| !updates.is_empty()) else {
        return Err(AppError::BadRequest("Missing line updates.".to_string()));
    };
    if updates.iter().any(|update| update.quantity == 0) {
        return Err(AppError::BadRequest(
            "Line quantity must be at least 1; remove the line instead.".to_string(),
        ));
    }

    let cart = state.storefront().update_lines(&cart_id, updates).await?;
    Ok(cart_json(&cart))
}

/// `DELETE /api/cart` - remove lines.
#[instrument(skip(state, body))]
pub async fn remove(
    State(state): State<AppState>,
    body: std::result::Result<Json<CartRequestBody>, JsonRejection>,
) -> Result<Response> {
    let body = require_body(body)?;

    let Some(cart_id) = non_empty(body.cart_id) else {
        return Err(AppError::BadRequest("Missing cartId.".to_string()));
    };
    let Some(line_ids) = body.line_ids.filter(|ids| !ids.is_empty()) else {
        return Err(AppError::BadRequest("Missing lineIds.".to_string()));
    };

    let cart = state.storefront().remove_lines(&cart_id, line_ids).await?;
    Ok(cart_json(&cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_accepts_each_method_shape() {
        let post: CartRequestBody = serde_json::from_str(
            r#"{ "cartId": "c1", "lines": [{ "merchandiseId": "v1", "quantity": 2 }] }"#,
        )
        .unwrap();
        assert_eq!(post.cart_id.as_deref(), Some("c1"));
        assert_eq!(post.lines.unwrap().first().unwrap().quantity, 2);

        let put: CartRequestBody = serde_json::from_str(
            r#"{ "cartId": "c1", "lineUpdates": [{ "id": "l1", "quantity": 3 }] }"#,
        )
        .unwrap();
        assert_eq!(put.line_updates.unwrap().first().unwrap().quantity, 3);

        let delete: CartRequestBody =
            serde_json::from_str(r#"{ "cartId": "c1", "lineIds": ["l1", "l2"] }"#).unwrap();
        assert_eq!(delete.line_ids.unwrap().len(), 2);
    }

    #[test]
    fn test_non_empty_rejects_blank_ids() {
        assert_eq!(non_empty(Some("c1".to_string())).as_deref(), Some("c1"));
        assert!(non_empty(Some(String::new())).is_none());
        assert!(non_empty(None).is_none());
    }
}
