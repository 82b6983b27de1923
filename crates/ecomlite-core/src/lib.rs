//! # ecomlite-core: Pure Business Logic for the EcomLite Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart
//! reducer, derived totals and product list operations as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      EcomLite Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Views (apps/cli)                             │   │
//! │  │    products ──► cart add ──► checkout ──► admin                 │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼──────────────┐  ┌─────────────▼───────────────────┐  │
//! │  │  ecomlite-store             │  │  ecomlite-fetch                 │  │
//! │  │  CartStore, MockSession     │  │  FetchResource, ProductCatalog  │  │
//! │  └──────────────┬──────────────┘  └─────────────┬───────────────────┘  │
//! │                 │                               │                       │
//! │  ┌──────────────▼───────────────────────────────▼───────────────────┐  │
//! │  │               ★ ecomlite-core (THIS CRATE) ★                     │  │
//! │  │                                                                  │  │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌───────┐ │  │
//! │  │   │  types  │  │  money  │  │  cart   │  │ catalog │  │ check │ │  │
//! │  │   │ Product │  │  Money  │  │ reducer │  │  drafts │  │  out  │ │  │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘  └───────┘ │  │
//! │  │                                                                  │  │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Rating, Profile)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart state, actions and the reducer
//! - [`catalog`] - Product drafts and in-memory list operations
//! - [`checkout`] - Simulated order placement
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use ecomlite_core::cart::{CartAction, CartState};
//! use ecomlite_core::{Money, Product};
//!
//! let coffee = Product::new(1, "Coffee", Money::from_cents(999));
//!
//! let cart = CartState::default()
//!     .apply(CartAction::add(coffee.clone(), 2))
//!     .apply(CartAction::add(coffee, 3));
//!
//! assert_eq!(cart.total_items(), 5);
//! assert_eq!(cart.total_price(), Money::from_cents(4995));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartLine, CartState, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Durable slot key holding the serialized cart.
///
/// Versioned so a future incompatible layout can be ignored instead of
/// misread.
pub const CART_STORAGE_KEY: &str = "ecomlite_cart_v1";

/// Durable slot key holding the mock session profile.
pub const PROFILE_STORAGE_KEY: &str = "AUTH_CONTEXT";

/// Image used for products created without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Maximum quantity accepted from user input for a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// The reducer itself does not enforce this.
pub const MAX_ITEM_QUANTITY: i64 = 999;
