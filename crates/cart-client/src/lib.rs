//! BoboParty client cart store.
//!
//! The convention every cart-touching UI widget follows, packaged as a
//! library:
//!
//! - cart identity lives under one durable local key ([`store::CART_ID_KEY`]),
//!   read fresh for every operation - never in shared in-memory state
//! - after any successful mutation, the widget persists the returned cart id
//!   and broadcasts a process-wide [`CartChanged`] signal
//! - other widgets react to the signal by re-fetching through `GET`; there
//!   are no direct widget-to-widget calls
//! - an expired cart clears the durable key and is treated as absent, never
//!   retried automatically
//!
//! # Example
//!
//! ```rust,ignore
//! let events = CartEvents::new();
//! let store = CartStore::new(data_dir, "http://127.0.0.1:3000", events.clone());
//!
//! // quick-add widget
//! store.add(&[CartLineInput { merchandise_id, quantity: 1 }]).await?;
//!
//! // badge widget, elsewhere
//! let mut changes = events.subscribe();
//! while changes.recv().await.is_ok() {
//!     let cart = store.current().await?;
//!     render_badge(cart.map_or(0, |c| c.total_quantity));
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod events;
pub mod store;

pub use api::{CartApi, CartApiError};
pub use events::{CartChanged, CartEvents};
pub use store::{CART_ID_KEY, CartIdStore};

use std::path::Path;

use thiserror::Error;
use tokio::sync::broadcast;

use boboparty_core::{Cart, CartLineInput, CartLineUpdateInput};

/// Errors from the widget-facing cart store.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The durable key could not be read or written.
    #[error("cart storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The proxy call failed.
    #[error(transparent)]
    Api(#[from] CartApiError),

    /// A line mutation was requested with no cart to mutate.
    #[error("no cart to modify")]
    NoCart,
}

/// Widget-facing cart handle: durable identity + proxy client + change
/// signal, composed per the store convention.
///
/// Each widget constructs its own `CartStore`; only the [`CartEvents`]
/// handle is shared, so agreement between widgets flows exclusively through
/// the durable key and the broadcast.
#[derive(Debug, Clone)]
pub struct CartStore {
    ids: CartIdStore,
    api: CartApi,
    events: CartEvents,
}

impl CartStore {
    /// Create a store reading its identity from `storage_dir` and talking to
    /// the storefront at `base_url`.
    pub fn new(
        storage_dir: impl AsRef<Path>,
        base_url: impl Into<String>,
        events: CartEvents,
    ) -> Self {
        Self {
            ids: CartIdStore::new(storage_dir),
            api: CartApi::new(base_url),
            events,
        }
    }

    /// Subscribe to cart-changed notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    /// Fetch the current cart, if one exists.
    ///
    /// An expired cart clears the durable key and reads as `None`; the next
    /// add will create a fresh cart. No automatic retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be accessed or the fetch fails.
    pub async fn current(&self) -> Result<Option<Cart>, CartStoreError> {
        let Some(cart_id) = self.ids.load()? else {
            return Ok(None);
        };

        match self.api.fetch(&cart_id).await? {
            Some(cart) => Ok(Some(cart)),
            None => {
                tracing::info!(%cart_id, "stored cart id expired, forgetting it");
                self.ids.clear()?;
                Ok(None)
            }
        }
    }

    /// Add lines to the cart, creating one lazily if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be accessed or the mutation fails.
    pub async fn add(&self, lines: &[CartLineInput]) -> Result<Cart, CartStoreError> {
        let cart_id = self.ids.load()?;
        let cart = self.api.add_lines(cart_id.as_deref(), lines).await?;
        self.remember(&cart)?;
        Ok(cart)
    }

    /// Set the quantity of an existing line. Quantities below 1 are the
    /// caller's bug; widgets clamp before calling.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::NoCart`] when no cart id is stored, or an
    /// error if the mutation fails.
    pub async fn set_line_quantity(
        &self,
        line_id: &str,
        quantity: u32,
    ) -> Result<Cart, CartStoreError> {
        let cart_id = self.ids.load()?.ok_or(CartStoreError::NoCart)?;
        let updates = [CartLineUpdateInput {
            id: line_id.to_string(),
            quantity,
        }];
        let cart = self.api.update_lines(&cart_id, &updates).await?;
        self.remember(&cart)?;
        Ok(cart)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::NoCart`] when no cart id is stored, or an
    /// error if the mutation fails.
    pub async fn remove_line(&self, line_id: &str) -> Result<Cart, CartStoreError> {
        let cart_id = self.ids.load()?.ok_or(CartStoreError::NoCart)?;
        let line_ids = [line_id.to_string()];
        let cart = self.api.remove_lines(&cart_id, &line_ids).await?;
        self.remember(&cart)?;
        Ok(cart)
    }

    /// Persist the returned cart id (idempotent when unchanged) and tell the
    /// rest of the process to re-read cart state.
    fn remember(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.ids.save(&cart.id)?;
        self.events.notify();
        Ok(())
    }
}
