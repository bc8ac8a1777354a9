//! Integration test harness for BoboParty.
//!
//! Provides an in-process fake of the Shopify Storefront GraphQL endpoint
//! (enough of the five cart operations to exercise the whole protocol) and a
//! launcher that boots the real storefront router against it on an ephemeral
//! port.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boboparty-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

use boboparty_storefront::config::{ShopifyConfig, StorefrontConfig};
use boboparty_storefront::state::AppState;

/// Header the fake upstream requires, mirroring the real Storefront API.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

const DEFAULT_NOT_FOUND_MESSAGE: &str = "The specified cart does not exist.";

// =============================================================================
// Fake Shopify upstream
// =============================================================================

/// In-memory stand-in for the Storefront API cart contract.
///
/// Carts live in a mutex-guarded map; money is computed in integer cents so
/// the amounts it emits are deterministic strings.
#[derive(Clone)]
pub struct FakeShopify {
    state: Arc<Mutex<FakeState>>,
    not_found_message: String,
}

#[derive(Default)]
struct FakeState {
    carts: HashMap<String, FakeCart>,
}

struct FakeCart {
    id: String,
    lines: Vec<FakeLine>,
    next_line: u64,
}

#[derive(Clone)]
struct FakeLine {
    id: String,
    merchandise_id: String,
    quantity: u64,
}

impl Default for FakeShopify {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeShopify {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            not_found_message: DEFAULT_NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// Use a different phrasing for the missing-cart condition (e.g., the
    /// Chinese wording a zh-locale shop produces).
    #[must_use]
    pub fn with_not_found_message(mut self, message: impl Into<String>) -> Self {
        self.not_found_message = message.into();
        self
    }

    /// Whether the fake currently knows a cart id.
    ///
    /// # Panics
    ///
    /// Panics if the state mutex is poisoned.
    #[must_use]
    pub fn has_cart(&self, cart_id: &str) -> bool {
        self.state.lock().expect("fake state lock").carts.contains_key(cart_id)
    }
}

// Variant catalog. Prices in cents so subtotal arithmetic never touches
// floating point.
fn unit_price_cents(merchandise_id: &str) -> u64 {
    if merchandise_id.ends_with("/balloon-red") {
        5800
    } else if merchandise_id.ends_with("/birthday-banner") {
        12900
    } else if merchandise_id.ends_with("/party-streamer") {
        990
    } else {
        10000
    }
}

fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn money_json(cents: u64) -> Value {
    json!({ "amount": format_cents(cents), "currencyCode": "HKD" })
}

fn variant_json(merchandise_id: &str) -> Value {
    let (title, product_title, handle, image) = if merchandise_id.ends_with("/balloon-red") {
        (
            "Red / 30cm",
            "乳膠氣球 Latex Balloon",
            "latex-balloon",
            Some("https://cdn.example/balloon-red.jpg"),
        )
    } else if merchandise_id.ends_with("/birthday-banner") {
        // Deliberately image-less so the mapper's missing-image path is
        // exercised end to end
        ("Default Title", "生日橫額 Birthday Banner", "birthday-banner", None)
    } else if merchandise_id.ends_with("/party-streamer") {
        ("Blue", "派對彩帶 Party Streamer", "party-streamer", None)
    } else {
        ("Default Title", "Party Item", "party-item", None)
    };

    let image_edges = image.map_or_else(Vec::new, |url| {
        vec![json!({ "node": { "url": url, "altText": null } })]
    });

    json!({
        "id": merchandise_id,
        "title": title,
        "price": money_json(unit_price_cents(merchandise_id)),
        "product": {
            "title": product_title,
            "handle": handle,
            "images": { "edges": image_edges }
        }
    })
}

impl FakeCart {
    fn new() -> Self {
        Self {
            id: format!("gid://shopify/Cart/{}", Uuid::new_v4().simple()),
            lines: Vec::new(),
            next_line: 1,
        }
    }

    fn add_line(&mut self, merchandise_id: &str, quantity: u64) {
        // Same merchandise merges into the existing line, like the real API
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.merchandise_id == merchandise_id)
        {
            line.quantity += quantity;
            return;
        }

        self.lines.push(FakeLine {
            id: format!("{}/line/{}", self.id, self.next_line),
            merchandise_id: merchandise_id.to_string(),
            quantity,
        });
        self.next_line += 1;
    }

    fn to_json(&self) -> Value {
        let total_quantity: u64 = self.lines.iter().map(|line| line.quantity).sum();
        let subtotal_cents: u64 = self
            .lines
            .iter()
            .map(|line| unit_price_cents(&line.merchandise_id) * line.quantity)
            .sum();

        let line_edges: Vec<Value> = self
            .lines
            .iter()
            .map(|line| {
                json!({
                    "node": {
                        "id": line.id,
                        "quantity": line.quantity,
                        "merchandise": variant_json(&line.merchandise_id)
                    }
                })
            })
            .collect();

        json!({
            "id": self.id,
            "checkoutUrl": format!("https://boboparty.myshopify.com/cart/c/{}", self.id),
            "totalQuantity": total_quantity,
            "cost": {
                "subtotalAmount": money_json(subtotal_cents),
                "totalAmount": money_json(subtotal_cents)
            },
            "lines": { "edges": line_edges }
        })
    }
}

fn mutation_response(field: &str, cart: Option<Value>, user_errors: Vec<Value>) -> Json<Value> {
    Json(json!({
        "data": { field: { "cart": cart, "userErrors": user_errors } }
    }))
}

fn not_found_errors(message: &str) -> Vec<Value> {
    vec![json!({ "message": message })]
}

fn lines_from_variables(variables: &Value) -> Vec<(String, u64)> {
    variables["lines"]
        .as_array()
        .map(|lines| {
            lines
                .iter()
                .map(|line| {
                    (
                        line["merchandiseId"].as_str().unwrap_or_default().to_string(),
                        line["quantity"].as_u64().unwrap_or(1),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

#[allow(clippy::too_many_lines)]
async fn graphql_handler(
    State(fake): State<FakeShopify>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    // The real endpoint rejects unauthenticated calls; so does the fake, so
    // a gateway that forgot the token header fails loudly in tests
    if headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_none_or(str::is_empty)
    {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "errors": [{ "message": "Invalid Storefront access token" }] })),
        )
            .into_response();
    }

    let query = body["query"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();
    let mut state = fake.state.lock().expect("fake state lock");

    if query.contains("cartCreate") {
        let mut cart = FakeCart::new();
        for (merchandise_id, quantity) in lines_from_variables(&variables) {
            cart.add_line(&merchandise_id, quantity);
        }
        let cart_json = cart.to_json();
        state.carts.insert(cart.id.clone(), cart);
        return mutation_response("cartCreate", Some(cart_json), Vec::new()).into_response();
    }

    if query.contains("cartLinesAdd") {
        let cart_id = variables["cartId"].as_str().unwrap_or_default();
        let Some(cart) = state.carts.get_mut(cart_id) else {
            return mutation_response(
                "cartLinesAdd",
                None,
                not_found_errors(&fake.not_found_message),
            )
            .into_response();
        };
        for (merchandise_id, quantity) in lines_from_variables(&variables) {
            cart.add_line(&merchandise_id, quantity);
        }
        let cart_json = cart.to_json();
        return mutation_response("cartLinesAdd", Some(cart_json), Vec::new()).into_response();
    }

    if query.contains("cartLinesUpdate") {
        let cart_id = variables["cartId"].as_str().unwrap_or_default();
        let Some(cart) = state.carts.get_mut(cart_id) else {
            return mutation_response(
                "cartLinesUpdate",
                None,
                not_found_errors(&fake.not_found_message),
            )
            .into_response();
        };
        let updates: Vec<(String, u64)> = variables["lines"]
            .as_array()
            .map(|lines| {
                lines
                    .iter()
                    .map(|line| {
                        (
                            line["id"].as_str().unwrap_or_default().to_string(),
                            line["quantity"].as_u64().unwrap_or(1),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        for (line_id, quantity) in updates {
            if let Some(line) = cart.lines.iter_mut().find(|line| line.id == line_id) {
                line.quantity = quantity;
            } else {
                return mutation_response(
                    "cartLinesUpdate",
                    None,
                    vec![json!({ "message": format!("Cart line {line_id} is invalid") })],
                )
                .into_response();
            }
        }
        let cart_json = cart.to_json();
        return mutation_response("cartLinesUpdate", Some(cart_json), Vec::new()).into_response();
    }

    if query.contains("cartLinesRemove") {
        let cart_id = variables["cartId"].as_str().unwrap_or_default();
        let Some(cart) = state.carts.get_mut(cart_id) else {
            return mutation_response(
                "cartLinesRemove",
                None,
                not_found_errors(&fake.not_found_message),
            )
            .into_response();
        };
        let line_ids: Vec<String> = variables["lineIds"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .map(|id| id.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default();
        cart.lines.retain(|line| !line_ids.contains(&line.id));
        let cart_json = cart.to_json();
        return mutation_response("cartLinesRemove", Some(cart_json), Vec::new()).into_response();
    }

    if query.contains("query GetCart") {
        let cart_id = variables["cartId"].as_str().unwrap_or_default();
        let cart_json = state.carts.get(cart_id).map(FakeCart::to_json);
        return Json(json!({ "data": { "cart": cart_json } })).into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "errors": [{ "message": "Unknown operation" }] })),
    )
        .into_response()
}

// =============================================================================
// App launcher
// =============================================================================

/// A running storefront wired to a fake upstream.
pub struct TestApp {
    /// Base URL of the storefront (e.g., `http://127.0.0.1:49152`).
    pub base_url: String,
    /// Handle on the fake upstream, for assertions.
    pub fake: FakeShopify,
}

impl TestApp {
    /// The cart proxy endpoint URL.
    #[must_use]
    pub fn cart_url(&self) -> String {
        format!("{}/api/cart", self.base_url)
    }
}

/// Boot the fake upstream and the real storefront router, both on ephemeral
/// ports.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(FakeShopify::new()).await
}

/// Boot the storefront against a pre-configured fake upstream.
pub async fn spawn_app_with(fake: FakeShopify) -> TestApp {
    let endpoint = spawn_fake_shopify(fake.clone()).await;
    let base_url = spawn_storefront(endpoint).await;
    TestApp { base_url, fake }
}

async fn spawn_fake_shopify(fake: FakeShopify) -> String {
    let router = Router::new()
        .route("/api/2024-10/graphql.json", post(graphql_handler))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake shopify");
    let addr = listener.local_addr().expect("fake shopify addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake shopify server");
    });

    format!("http://{addr}/api/2024-10/graphql.json")
}

async fn spawn_storefront(endpoint: String) -> String {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyConfig {
            store_domain: "boboparty.myshopify.com".to_string(),
            api_version: "2024-10".to_string(),
            storefront_token: SecretString::from("test-storefront-token"),
            request_timeout_ms: 10_000,
            endpoint_override: Some(endpoint),
        },
        sentry_dsn: None,
    };

    let state = AppState::new(config).expect("app state");
    let app = boboparty_storefront::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind storefront");
    let addr = listener.local_addr().expect("storefront addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("storefront server");
    });

    format!("http://{addr}")
}
