//! Serde mirror of the Storefront API cart selection set.
//!
//! These types track the GraphQL shapes in [`super::queries`] exactly; the
//! rest of the application only ever sees the flat `boboparty_core` model
//! produced by [`super::conversions`], so upstream schema drift stays
//! contained here.

use serde::Deserialize;

/// Relay-style connection wrapper.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// Relay-style edge wrapper.
#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

/// Only the URL is consumed; the selection set also carries `altText`, which
/// serde drops here.
#[derive(Debug, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Product {
    pub title: String,
    pub handle: String,
    pub images: Connection<Image>,
}

#[derive(Debug, Deserialize)]
pub struct Merchandise {
    pub id: String,
    pub title: String,
    pub price: Money,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
    pub merchandise: Merchandise,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: u32,
    pub cost: CartCost,
    pub lines: Connection<CartLine>,
}

#[derive(Debug, Deserialize)]
pub struct UserError {
    pub message: String,
}

/// Payload shared by all four cart mutations: the fresh cart plus any
/// mutation-level user errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<Cart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartData {
    pub cart_create: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLinesData {
    pub cart_lines_add: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinesData {
    pub cart_lines_update: CartPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinesData {
    pub cart_lines_remove: CartPayload,
}

#[derive(Debug, Deserialize)]
pub struct GetCartData {
    pub cart: Option<Cart>,
}
