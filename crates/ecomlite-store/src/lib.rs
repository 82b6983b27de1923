//! # ecomlite-store: Local Persistence for the EcomLite Storefront
//!
//! This crate keeps the cart and the mock session alive across restarts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      EcomLite Data Flow                                 │
//! │                                                                         │
//! │  CLI command (cart add 3 --qty 2)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  ecomlite-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartStore    │    │ Repositories  │    │    Slots     │  │   │
//! │  │   │  MockSession  │───►│ cart.rs       │───►│ FileSlot     │  │   │
//! │  │   │               │    │ profile.rs    │    │ MemorySlot   │  │   │
//! │  │   │ (mutations)   │    │ (JSON docs)   │    │ WriteBehind  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  <data dir>/ecomlite_cart_v1.json    <data dir>/AUTH_CONTEXT.json │ │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`slot`] - Durable key-value slots (file, memory)
//! - [`writer`] - Write-behind wrapper that moves writes off the caller
//! - [`repository`] - Cart and profile documents stored in slots
//! - [`cart_store`] - The serialized cart with persistence after every change
//! - [`session`] - Mock login/logout backed by the profile repository
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecomlite_store::{CartStore, FileSlot, SlotCartRepository};
//!
//! let slot = FileSlot::open("/tmp/ecomlite")?;
//! let store = CartStore::open(SlotCartRepository::new(slot));
//!
//! store.add(product, 2);
//! println!("{} items, {}", store.total_items(), store.total_price());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_store;
pub mod error;
pub mod repository;
pub mod session;
pub mod slot;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart_store::CartStore;
pub use error::{StoreError, StoreResult};
pub use session::{LoginRequest, MockSession};
pub use slot::{FileSlot, KeyValueSlot, MemorySlot};
pub use writer::WriteBehindSlot;

// Repository re-exports for convenience
pub use repository::cart::{CartRepository, SlotCartRepository};
pub use repository::profile::{ProfileRepository, SlotProfileRepository};
