//! Cart aggregate and line-item types.
//!
//! The cart lives entirely at Shopify; these types are the application's
//! view of it. Every mutation returns the full fresh aggregate, so there is
//! never a partially-patched cart in flight.

use serde::{Deserialize, Serialize};

// =============================================================================
// Money
// =============================================================================

/// Monetary amount with currency code.
///
/// The amount is carried as the decimal string Shopify produced. It is never
/// parsed into a numeric type and reserialized, which would risk rounding or
/// reformatting drift; money is only ever constructed server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision and formatting).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

// =============================================================================
// Cart
// =============================================================================

/// Server-computed cost summary for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Subtotal before tax and shipping.
    pub subtotal: Money,
    /// Total amount.
    pub total: Money,
}

/// One merchandise line in a cart.
///
/// Quantity is always at least 1; a line with quantity 0 does not exist.
/// Removal is the only deletion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Opaque line identifier, unique within the cart, assigned upstream.
    pub id: String,
    /// Opaque variant identifier of the merchandise on this line.
    pub merchandise_id: String,
    /// Number of units.
    pub quantity: u32,
    /// Variant display name.
    pub title: String,
    /// Parent product title.
    pub product_title: String,
    /// Parent product URL handle.
    pub product_handle: String,
    /// First product image, when the product has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Unit price.
    pub price: Money,
}

/// The cart aggregate.
///
/// `id` is the sole handle the client holds; everything else is replaced
/// wholesale from the server's returned snapshot after each operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Opaque server-assigned cart identifier.
    pub id: String,
    /// Absolute URL to the external checkout flow.
    pub checkout_url: String,
    /// Sum of line quantities, computed upstream.
    pub total_quantity: u32,
    /// Cost summary, computed upstream.
    pub cost: CartCost,
    /// Lines in upstream insertion order. Order is not guaranteed stable
    /// across mutations.
    pub lines: Vec<CartLine>,
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant to add.
    pub merchandise_id: String,
    /// Units to add.
    pub quantity: u32,
}

/// Input for changing the quantity of an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Line to update.
    pub id: String,
    /// New quantity. Callers clamp to a minimum of 1; removal is a separate
    /// explicit action, not a zero-quantity update.
    pub quantity: u32,
}
