//! # Simulated Checkout
//!
//! Turns the cart into an [`Order`] receipt. Nothing is charged and nothing
//! leaves the process: the order exists so the view can show what was
//! "bought" before the cart is cleared.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart (2 lines, 4 items, $24.99)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  place_order(&cart) ← THIS MODULE                                       │
//! │       │                                                                 │
//! │       ├── empty cart? → CoreError::EmptyCart (cart untouched)           │
//! │       │                                                                 │
//! │       └── Order { id, lines (frozen), totals, placed_at }               │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  CartStore clears the cart                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{CartLine, CartState};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductId;

/// A line of a placed order.
/// Uses snapshot pattern to freeze product data at time of checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Title at time of checkout (frozen).
    pub title: String,
    /// Unit price at time of checkout (frozen).
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total: Money,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        OrderLine {
            product_id: line.product.id,
            title: line.product.title.clone(),
            unit_price: line.product.price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// A simulated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub lines: Vec<OrderLine>,
    pub total_items: i64,
    pub total_price: Money,
    pub placed_at: DateTime<Utc>,
}

/// Builds an order from the cart.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] when there is nothing to order
pub fn place_order(cart: &CartState) -> CoreResult<Order> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        lines: cart.lines().map(OrderLine::from).collect(),
        total_items: cart.total_items(),
        total_price: cart.total_price(),
        placed_at: Utc::now(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
