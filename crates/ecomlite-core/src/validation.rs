//! # Validation Module
//!
//! Input validation for the product form, the login form and quantity
//! prompts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View (CLI argument parsing)                                  │
//! │  └── Type validation (numbers are numbers)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Product drafts (title, price, image URL)                          │
//! │  ├── Mock login (username, password length)                            │
//! │  └── Quantity prompts                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart reducer                                                 │
//! │  └── Non-positive quantities remove the line (never an error)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ecomlite_core::validation::{validate_quantity, validate_title};
//!
//! validate_title("Slim Fit T-Shirt").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use url::Url;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted by the mock login form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum product title length.
pub const MAX_TITLE_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates an image URL.
///
/// ## Rules
/// - Must parse as an absolute URL
/// - Scheme must be `http` or `https`
///
/// ## Example
/// ```rust
/// use ecomlite_core::validation::validate_image_url;
///
/// assert!(validate_image_url("https://fakestoreapi.com/img/1.jpg").is_ok());
/// assert!(validate_image_url("not a url").is_err());
/// assert!(validate_image_url("ftp://example.com/1.jpg").is_err());
/// ```
pub fn validate_image_url(image: &str) -> ValidationResult<()> {
    let url = Url::parse(image.trim()).map_err(|e| ValidationError::InvalidFormat {
        field: "image".to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Validates the mock login username.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    Ok(())
}

/// Validates the mock login password.
///
/// Only the length is checked. The password is never stored or compared.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity typed by the user.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// Quantity changes that should remove a line go through
/// `CartAction::SetQuantity` with zero directly, not through this check.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product price.
///
/// ## Rules
/// - Must be at least one cent ($0.01)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.cents() < 1 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
