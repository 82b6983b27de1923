//! # Cart Repository
//!
//! Loads and saves the cart document under a single slot key.
//!
//! ## Rehydration Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  slot value                         load() result                      │
//! │  ──────────                         ─────────────                      │
//! │  absent                        ──►  empty cart                         │
//! │  valid document                ──►  that cart (re-keyed, qty ≥ 1)      │
//! │  corrupt JSON / wrong shape    ──►  empty cart + warn!                 │
//! │  slot read error               ──►  empty cart + warn!                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ecomlite_core::{CartState, CART_STORAGE_KEY};
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::slot::KeyValueSlot;

/// Persistence for the cart.
pub trait CartRepository: Send + Sync {
    /// Reads the stored cart. Never fails: anything unreadable is an empty
    /// cart.
    fn load(&self) -> CartState;

    /// Replaces the stored cart.
    fn save(&self, cart: &CartState) -> StoreResult<()>;

    /// Deletes the stored cart.
    fn clear(&self) -> StoreResult<()>;
}

/// [`CartRepository`] over a [`KeyValueSlot`].
#[derive(Debug, Clone)]
pub struct SlotCartRepository<S> {
    slot: S,
    key: String,
}

impl<S: KeyValueSlot> SlotCartRepository<S> {
    /// Uses the default key, `ecomlite_cart_v1`.
    pub fn new(slot: S) -> Self {
        Self::with_key(slot, CART_STORAGE_KEY)
    }

    /// Uses a custom key.
    pub fn with_key(slot: S, key: impl Into<String>) -> Self {
        SlotCartRepository {
            slot,
            key: key.into(),
        }
    }

    /// The underlying slot.
    pub fn slot(&self) -> &S {
        &self.slot
    }
}

impl<S: KeyValueSlot> CartRepository for SlotCartRepository<S> {
    fn load(&self) -> CartState {
        let raw = match self.slot.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartState::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                return CartState::new();
            }
        };

        match serde_json::from_str::<CartState>(&raw) {
            Ok(cart) => {
                debug!(key = %self.key, lines = cart.line_count(), "Cart loaded");
                cart
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored cart is corrupt, starting empty");
                CartState::new()
            }
        }
    }

    fn save(&self, cart: &CartState) -> StoreResult<()> {
        let json = serde_json::to_string(cart)?;
        self.slot.write(&self.key, &json)
    }

    fn clear(&self) -> StoreResult<()> {
        self.slot.remove(&self.key)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
