//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Rating      │   │    Profile      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  rate (f64)     │   │  username       │       │
//! │  │  title          │   │  count (u32)    │   │  avatar?        │       │
//! │  │  price (Money)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  category       │                                                    │
//! │  │  image (URI)    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names match the catalog API's JSON (`id`, `title`, `price`, ...),
//! so these types deserialize directly from `GET /products`.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Product identifier as assigned by the catalog API.
pub type ProductId = u64;

// =============================================================================
// Product
// =============================================================================

/// Aggregate customer rating shown on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating (0.0 - 5.0).
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

/// A product offered by the catalog.
///
/// Once placed in the cart, a product is an immutable snapshot: later
/// catalog edits do not reach it until the same product is added again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price. Decimal on the wire.
    pub price: Money,

    /// Optional long description.
    #[serde(default)]
    pub description: String,

    /// Category label (e.g. "electronics").
    #[serde(default)]
    pub category: String,

    /// Image URI.
    #[serde(default)]
    pub image: String,

    /// Rating summary, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Creates a product with the required fields; the rest are empty.
    pub fn new(id: ProductId, title: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: None,
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

/// The profile of the mock session's user.
///
/// There is no credential here: the mock login never stores or checks a
/// password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub avatar: Option<String>,
}

impl Profile {
    /// Returns the profile with the patch merged in.
    pub fn merged(mut self, patch: ProfilePatch) -> Self {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
