//! Integration tests for the client cart store convention.
//!
//! Widgets are modeled as independent `CartStore` instances sharing only the
//! durable key directory and the `CartEvents` handle - exactly the contract
//! the real UI regions follow.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::time::Duration;

use boboparty_cart_client::{CART_ID_KEY, CartEvents, CartStore, CartStoreError};
use boboparty_core::CartLineInput;
use boboparty_integration_tests::spawn_app;

const BALLOON: &str = "gid://shopify/ProductVariant/balloon-red";
const STREAMER: &str = "gid://shopify/ProductVariant/party-streamer";

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("boboparty-client-test-{}", uuid::Uuid::new_v4()))
}

fn line(merchandise_id: &str, quantity: u32) -> CartLineInput {
    CartLineInput {
        merchandise_id: merchandise_id.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn test_add_persists_id_and_broadcasts() {
    let app = spawn_app().await;
    let dir = temp_dir();
    let events = CartEvents::new();

    let quick_add = CartStore::new(&dir, &app.base_url, events.clone());
    let badge = CartStore::new(&dir, &app.base_url, events.clone());
    let mut changes = badge.subscribe();

    let cart = quick_add.add(&[line(BALLOON, 1)]).await.unwrap();

    // The durable key now holds the returned cart id
    let stored = std::fs::read_to_string(dir.join(CART_ID_KEY)).unwrap();
    assert_eq!(stored, cart.id);

    // The badge widget was told to re-read, and sees the same cart fresh
    tokio::time::timeout(Duration::from_secs(1), changes.recv())
        .await
        .expect("cart-changed signal")
        .unwrap();
    let seen = badge.current().await.unwrap().unwrap();
    assert_eq!(seen.id, cart.id);
    assert_eq!(seen.total_quantity, 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_second_add_reuses_the_stored_cart() {
    let app = spawn_app().await;
    let dir = temp_dir();
    let events = CartEvents::new();

    let store = CartStore::new(&dir, &app.base_url, events.clone());
    let first = store.add(&[line(BALLOON, 1)]).await.unwrap();

    // A widget constructed later reads the key fresh and mutates the same cart
    let other_widget = CartStore::new(&dir, &app.base_url, events);
    let second = other_widget.add(&[line(STREAMER, 2)]).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.total_quantity, 3);
    assert_eq!(second.lines.len(), 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_expired_cart_clears_key_and_reads_absent() {
    let app = spawn_app().await;
    let dir = temp_dir();

    let store = CartStore::new(&dir, &app.base_url, CartEvents::new());

    // Simulate an id left behind from a cart the upstream has dropped
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(CART_ID_KEY), "gid://shopify/Cart/stale").unwrap();

    assert!(store.current().await.unwrap().is_none());
    // Key cleared: the widget shows an empty cart and does not retry
    assert!(!dir.join(CART_ID_KEY).exists());

    // The next add starts a brand new cart
    let cart = store.add(&[line(BALLOON, 1)]).await.unwrap();
    assert_ne!(cart.id, "gid://shopify/Cart/stale");

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_quantity_update_and_removal_replace_the_snapshot() {
    let app = spawn_app().await;
    let dir = temp_dir();
    let events = CartEvents::new();

    let store = CartStore::new(&dir, &app.base_url, events.clone());
    let cart = store
        .add(&[line(BALLOON, 2), line(STREAMER, 1)])
        .await
        .unwrap();
    let balloon_line = cart
        .lines
        .iter()
        .find(|l| l.merchandise_id == BALLOON)
        .unwrap()
        .id
        .clone();

    let mut changes = events.subscribe();

    let updated = store.set_line_quantity(&balloon_line, 5).await.unwrap();
    assert_eq!(updated.total_quantity, 6);
    changes.recv().await.unwrap();

    let after_removal = store.remove_line(&balloon_line).await.unwrap();
    assert_eq!(after_removal.total_quantity, 1);
    assert_eq!(after_removal.lines.len(), 1);
    changes.recv().await.unwrap();

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_line_mutations_without_a_cart_are_rejected_locally() {
    let app = spawn_app().await;
    let dir = temp_dir();

    let store = CartStore::new(&dir, &app.base_url, CartEvents::new());

    let err = store.set_line_quantity("l1", 2).await.unwrap_err();
    assert!(matches!(err, CartStoreError::NoCart));

    let err = store.remove_line("l1").await.unwrap_err();
    assert!(matches!(err, CartStoreError::NoCart));

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_current_without_key_is_none_without_any_request() {
    let app = spawn_app().await;
    let dir = temp_dir();

    let store = CartStore::new(&dir, &app.base_url, CartEvents::new());
    assert!(store.current().await.unwrap().is_none());

    let _ = std::fs::remove_dir_all(dir);
}
