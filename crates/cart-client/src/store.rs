//! Durable cart identity storage.
//!
//! The cart id is the only piece of cart state a client holds, and it lives
//! under one fixed key in a durable local store - never in shared in-memory
//! application state. Every widget reads the key fresh on every operation,
//! so independent UI regions (header badge, cart page, quick-add control)
//! agree without talking to each other.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The fixed key the cart id is stored under.
pub const CART_ID_KEY: &str = "boboparty_cart_id";

/// File-backed holder of the current cart id.
///
/// An absent key means no cart exists yet; one is created lazily on the
/// first add-to-cart action.
#[derive(Debug, Clone)]
pub struct CartIdStore {
    path: PathBuf,
}

impl CartIdStore {
    /// Create a store rooted at `dir`. The id lives in a file named
    /// [`CART_ID_KEY`] inside it.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CART_ID_KEY),
        }
    }

    /// Read the current cart id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key exists but cannot be read.
    pub fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim().to_string();
                Ok((!id.is_empty()).then_some(id))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Persist a cart id. Idempotent when the id is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be written.
    pub fn save(&self, cart_id: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, cart_id)
    }

    /// Forget the stored cart id. A missing key is not an error; clearing is
    /// how widgets react to an expired cart, and several may react at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the key exists but cannot be removed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
