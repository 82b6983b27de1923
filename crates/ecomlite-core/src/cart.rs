//! # Cart Reducer
//!
//! The cart is a mapping from product id to a line holding a product
//! snapshot and a quantity. Every change is expressed as a [`CartAction`]
//! and applied by [`CartState::apply`], which returns a NEW state.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Actions                                         │
//! │                                                                         │
//! │  Action                   Line present?       Result                    │
//! │  ──────                   ─────────────       ──────                    │
//! │                                                                         │
//! │  Add(p, n)  ───────────►  no  ──────────────► insert (p, n)             │
//! │                           yes ──────────────► (p, old + n)  snapshot=p  │
//! │                                                                         │
//! │  SetQuantity(id, n≤0) ──► any ──────────────► remove                    │
//! │  SetQuantity(id, n>0) ──► yes ──────────────► (old snapshot, n)         │
//! │                           no  ──────────────► unchanged                 │
//! │                                                                         │
//! │  Remove(id) ───────────►  any ──────────────► remove (no-op if absent)  │
//! │                                                                         │
//! │  Clear ────────────────►  ─── ──────────────► empty                     │
//! │                                                                         │
//! │  Replace(state) ───────►  ─── ──────────────► state (rehydration)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has `quantity >= 1`; a line that would drop to zero or below
//!   is removed instead.
//! - Every key equals the id of the product stored under it.
//! - Totals are computed from the lines on every call, never cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Product, ProductId};

// =============================================================================
// Cart Line
// =============================================================================

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken at the last `Add` for this id.
    pub product: Product,

    /// Quantity in cart (always >= 1).
    pub quantity: i64,
}

impl CartLine {
    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Line total, or `None` when it does not fit in the cents range.
    pub fn checked_line_total(&self) -> Option<Money> {
        self.product.price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Action
// =============================================================================

/// A single cart transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Adds `quantity` of `product`, accumulating onto an existing line.
    Add { product: Product, quantity: i64 },

    /// Deletes the line for `id`.
    Remove { id: ProductId },

    /// Overwrites the quantity of an existing line.
    SetQuantity { id: ProductId, quantity: i64 },

    /// Empties the cart.
    Clear,

    /// Swaps in a whole state (used when rehydrating).
    Replace(CartState),
}

impl CartAction {
    /// Shorthand for [`CartAction::Add`].
    pub fn add(product: Product, quantity: i64) -> Self {
        CartAction::Add { product, quantity }
    }

    /// Short action name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::Add { .. } => "add",
            CartAction::Remove { .. } => "remove",
            CartAction::SetQuantity { .. } => "set_quantity",
            CartAction::Clear => "clear",
            CartAction::Replace(_) => "replace",
        }
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The shopping cart.
///
/// Lines are keyed by product id and iterate in id order.
///
/// ## Persisted Form
/// ```json
/// { "items": { "1": { "product": { "id": 1, ... }, "quantity": 2 } } }
/// ```
/// Deserialization re-keys lines by their product id and drops lines with a
/// non-positive quantity, so a hand-edited document cannot break the
/// invariants. Lines whose total, or whose contribution to the cart totals,
/// overflows are dropped as corrupt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CartDocument")]
pub struct CartState {
    items: BTreeMap<ProductId, CartLine>,
}

#[derive(Deserialize)]
struct CartDocument {
    #[serde(default)]
    items: BTreeMap<ProductId, CartLine>,
}

impl From<CartDocument> for CartState {
    fn from(doc: CartDocument) -> Self {
        let mut items = BTreeMap::new();
        let mut total_items: i64 = 0;
        let mut total_price = Money::zero();

        for line in doc.items.into_values() {
            if line.quantity <= 0 {
                continue;
            }
            let next_items = total_items.checked_add(line.quantity);
            let next_price = line
                .checked_line_total()
                .and_then(|line_total| total_price.checked_add(line_total));
            let (Some(next_items), Some(next_price)) = (next_items, next_price) else {
                continue;
            };
            // A duplicate id overwrites the earlier line, so its share of the
            // running totals is only an upper bound.
            total_items = next_items;
            total_price = next_price;
            items.insert(line.product.id, line);
        }
        CartState { items }
    }
}

impl CartState {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an action and returns the resulting state.
    ///
    /// `self` is left untouched, so a caller holding the previous state never
    /// observes a half-applied transition.
    ///
    /// ## Example
    /// ```rust
    /// use ecomlite_core::cart::{CartAction, CartState};
    /// use ecomlite_core::{Money, Product};
    ///
    /// let before = CartState::new();
    /// let after = before.apply(CartAction::add(Product::new(1, "Tea", Money::from_cents(250)), 1));
    ///
    /// assert!(before.is_empty());
    /// assert_eq!(after.total_items(), 1);
    /// ```
    pub fn apply(&self, action: CartAction) -> CartState {
        match action {
            CartAction::Add { product, quantity } => {
                let existing = self.items.get(&product.id).map_or(0, |line| line.quantity);
                let next_quantity = existing.saturating_add(quantity);

                let mut items = self.items.clone();
                if next_quantity > 0 {
                    items.insert(
                        product.id,
                        CartLine {
                            product,
                            quantity: next_quantity,
                        },
                    );
                } else {
                    items.remove(&product.id);
                }
                CartState { items }
            }

            CartAction::Remove { id } => self.without(id),

            CartAction::SetQuantity { id, quantity } => {
                if quantity <= 0 {
                    return self.without(id);
                }
                match self.items.get(&id) {
                    Some(line) => {
                        let mut items = self.items.clone();
                        items.insert(
                            id,
                            CartLine {
                                product: line.product.clone(),
                                quantity,
                            },
                        );
                        CartState { items }
                    }
                    None => self.clone(),
                }
            }

            CartAction::Clear => CartState::new(),

            CartAction::Replace(state) => state,
        }
    }

    fn without(&self, id: ProductId) -> CartState {
        let mut items = self.items.clone();
        items.remove(&id);
        CartState { items }
    }

    /// Returns the line for a product, if present.
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.items.get(&id)
    }

    /// Iterates over lines in product id order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.items.values()
    }

    /// Returns the number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all lines, saturating at `i64::MAX`.
    pub fn total_items(&self) -> i64 {
        self.items
            .values()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Returns the sum of all line totals, saturating at the cents range.
    pub fn total_price(&self) -> Money {
        self.items.values().map(CartLine::line_total).sum()
    }

    /// Returns all derived totals at once.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Cart totals summary for views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: i64,
    pub total_price: Money,
}

impl From<&CartState> for CartTotals {
    fn from(cart: &CartState) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_product(id: ProductId, price_cents: i64) -> Product {
        let mut product = Product::new(id, format!("Product {}", id), Money::from_cents(price_cents));
        product.category = "test".to_string();
        product
    }

    #[test]
    fn test_cart_add_item() {
        let cart = CartState::new().apply(CartAction::add(test_product(1, 999), 2));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Money::from_cents(1998));
    }

    #[test]
    fn test_cart_add_same_product_accumulates() {
        let product = test_product(1, 999);
        let cart = CartState::new()
            .apply(CartAction::add(product.clone(), 2))
            .apply(CartAction::add(product, 3));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(1).map(|l| l.quantity), Some(5));
    }

    #[test]
    fn test_cart_add_replaces_snapshot() {
        let cart = CartState::new().apply(CartAction::add(test_product(1, 999), 1));

        let mut repriced = test_product(1, 1299);
        repriced.title = "Renamed".to_string();
        let cart = cart.apply(CartAction::add(repriced, 1));

        let line = cart.line(1).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.title, "Renamed");
        assert_eq!(cart.total_price(), Money::from_cents(2598));
    }

    #[test]
    fn test_cart_add_non_positive_total_removes_line() {
        let product = test_product(1, 999);
        let cart = CartState::new()
            .apply(CartAction::add(product.clone(), 2))
            .apply(CartAction::add(product.clone(), -2));
        assert!(cart.is_empty());

        let cart = CartState::new().apply(CartAction::add(product, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_keeps_snapshot() {
        let cart = CartState::new()
            .apply(CartAction::add(test_product(1, 999), 1))
            .apply(CartAction::SetQuantity { id: 1, quantity: 4 });

        let line = cart.line(1).unwrap();
        assert_eq!(line.quantity, 4);
        assert_eq!(line.product, test_product(1, 999));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let base = CartState::new().apply(CartAction::add(test_product(1, 999), 3));

        assert!(base
            .apply(CartAction::SetQuantity { id: 1, quantity: 0 })
            .is_empty());
        assert!(base
            .apply(CartAction::SetQuantity { id: 1, quantity: -1 })
            .is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_line_is_noop() {
        let base = CartState::new().apply(CartAction::add(test_product(1, 999), 3));
        let after = base.apply(CartAction::SetQuantity { id: 99, quantity: 5 });
        assert_eq!(after, base);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let base = CartState::new().apply(CartAction::add(test_product(1, 999), 3));
        assert_eq!(base.apply(CartAction::Remove { id: 42 }), base);
    }

    #[test]
    fn test_apply_leaves_previous_state_untouched() {
        let before = CartState::new().apply(CartAction::add(test_product(1, 999), 1));
        let _after = before.apply(CartAction::Clear);
        assert_eq!(before.total_items(), 1);
    }

    #[test]
    fn test_cart_clear() {
        let cart = CartState::new()
            .apply(CartAction::add(test_product(1, 999), 2))
            .apply(CartAction::Clear);

        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_end_to_end_totals() {
        let cart = CartState::new()
            .apply(CartAction::add(test_product(1, 999), 1))
            .apply(CartAction::add(test_product(2, 500), 3));
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), Money::from_cents(2499));

        let cart = cart.apply(CartAction::SetQuantity { id: 1, quantity: 0 });
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Money::from_cents(1500));

        let cart = cart.apply(CartAction::Clear);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[test]
    fn test_json_round_trip() {
        let mut product = test_product(3, 1995);
        product.rating = Some(crate::types::Rating {
            rate: 4.5,
            count: 12,
        });
        let cart = CartState::new()
            .apply(CartAction::add(product, 2))
            .apply(CartAction::add(test_product(1, 999), 1));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_rekeys_and_drops_empty_lines() {
        let json = r#"{
            "items": {
                "9": { "product": { "id": 1, "title": "Mug", "price": 5.0 }, "quantity": 2 },
                "2": { "product": { "id": 2, "title": "Cup", "price": 3.0 }, "quantity": 0 }
            }
        }"#;

        let cart: CartState = serde_json::from_str(json).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line(1).map(|l| l.quantity), Some(2));
        assert!(cart.line(9).is_none());
    }

    #[test]
    fn test_deserialize_drops_lines_that_overflow_totals() {
        let json = format!(
            r#"{{
                "items": {{
                    "1": {{ "product": {{ "id": 4, "title": "Tea", "price": 2.5 }}, "quantity": 2 }},
                    "2": {{ "product": {{ "id": 2, "title": "Cup", "price": 0.0 }}, "quantity": {rest} }},
                    "3": {{ "product": {{ "id": 3, "title": "Pen", "price": 0.0 }}, "quantity": 1 }},
                    "9": {{ "product": {{ "id": 1, "title": "Mug", "price": 5.0 }}, "quantity": {max} }}
                }}
            }}"#,
            rest = i64::MAX - 2,
            max = i64::MAX
        );

        let cart: CartState = serde_json::from_str(&json).unwrap();
        // The pen overflows the item count; the mug overflows its own total.
        assert_eq!(cart.line(4).map(|l| l.quantity), Some(2));
        assert!(cart.line(2).is_some());
        assert!(cart.line(3).is_none());
        assert!(cart.line(1).is_none());
        assert_eq!(cart.total_items(), i64::MAX);
        assert_eq!(cart.total_price(), Money::from_cents(500));
    }

    #[test]
    fn test_huge_quantities_saturate_instead_of_panicking() {
        let pricey = test_product(1, i64::MAX / 2);
        let cart = CartState::new()
            .apply(CartAction::add(pricey.clone(), i64::MAX))
            .apply(CartAction::add(pricey, 5))
            .apply(CartAction::add(test_product(2, 100), i64::MAX));

        assert_eq!(cart.line(1).map(|l| l.quantity), Some(i64::MAX));
        assert_eq!(cart.total_items(), i64::MAX);
        assert_eq!(cart.total_price(), Money::from_cents(i64::MAX));
        assert_eq!(cart.line(1).and_then(CartLine::checked_line_total), None);
    }

    #[test]
    fn test_totals_summary() {
        let cart = CartState::new()
            .apply(CartAction::add(test_product(1, 999), 1))
            .apply(CartAction::add(test_product(2, 500), 3));

        let totals = cart.totals();
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_items, 4);
        assert_eq!(totals.total_price, Money::from_cents(2499));
    }

    // -------------------------------------------------------------------------
    // Property: totals always match the lines
    // -------------------------------------------------------------------------

    fn action_strategy() -> impl Strategy<Value = CartAction> {
        let id = 1u64..6;
        prop_oneof![
            (id.clone(), 0i64..5000, 1i64..10)
                .prop_map(|(id, cents, qty)| CartAction::add(test_product(id, cents), qty)),
            id.clone().prop_map(|id| CartAction::Remove { id }),
            (id, -3i64..10).prop_map(|(id, quantity)| CartAction::SetQuantity { id, quantity }),
            Just(CartAction::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_match_lines(actions in prop::collection::vec(action_strategy(), 0..40)) {
            let mut cart = CartState::new();
            for action in actions {
                cart = cart.apply(action);

                let expected_items: i64 = cart.lines().map(|l| l.quantity).sum();
                let expected_cents: i64 = cart
                    .lines()
                    .map(|l| l.product.price.cents() * l.quantity)
                    .sum();

                prop_assert_eq!(cart.total_items(), expected_items);
                prop_assert_eq!(cart.total_price().cents(), expected_cents);
                prop_assert!(cart.lines().all(|l| l.quantity >= 1));
                prop_assert!(cart.items.iter().all(|(id, l)| *id == l.product.id));
            }
        }
    }
}
