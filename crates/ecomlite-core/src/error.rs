//! # Error Types
//!
//! Domain-specific error types for ecomlite-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ecomlite-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ecomlite-store errors                                                 │
//! │  └── StoreError       - Durable slot failures (never reach callers    │
//! │                         of CartStore, logged and swallowed)            │
//! │                                                                         │
//! │  ecomlite-fetch errors                                                 │
//! │  └── FetchError       - Remote read failures (rendered into the        │
//! │                         resource's `error` text)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invalid cart mutations (removing a missing line, setting the quantity of
//! a missing line) are NOT errors. They are defined as no-ops by the reducer.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the in-memory catalog.
    ///
    /// ## When This Occurs
    /// - Admin edits a product that was removed meanwhile
    /// - The catalog has not been loaded yet
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input (product form, login form, quantity
/// prompts) doesn't meet requirements.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
