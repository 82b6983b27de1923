//! # Cart Store
//!
//! The live cart: one authoritative [`CartState`], mutated only through
//! [`CartAction`]s, persisted after every change.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open(repository)                                                      │
//! │   └── state = repository.load()   (empty on missing/corrupt data)      │
//! │                                                                         │
//! │  dispatch(action)                                                      │
//! │   ├── lock state                  (mutations are serialized)           │
//! │   ├── next = state.apply(action)  (pure reducer)                       │
//! │   ├── next == state? ──► done, nothing written                         │
//! │   ├── persist(next)               (empty cart removes the slot)        │
//! │   │     └── error? ──► warn!, keep going                               │
//! │   └── state = next                                                     │
//! │                                                                         │
//! │  Readers get clones, so they never see a half-applied action.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence happens while the lock is held. Two concurrent dispatches
//! therefore reach the repository in the same order they changed the state,
//! and the last write always matches the final in-memory cart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ecomlite_core::checkout::{place_order, Order};
use ecomlite_core::{CartAction, CartState, CartTotals, CoreResult, Money, Product, ProductId};
use tracing::{debug, info, warn};

use crate::repository::cart::CartRepository;

/// Thread-safe cart with write-through persistence.
pub struct CartStore {
    state: Mutex<CartState>,
    repository: Box<dyn CartRepository>,
}

impl CartStore {
    /// Rehydrates the cart from `repository`.
    pub fn open(repository: impl CartRepository + 'static) -> Self {
        let state = repository.load();
        info!(
            lines = state.line_count(),
            items = state.total_items(),
            "Cart rehydrated"
        );

        CartStore {
            state: Mutex::new(state),
            repository: Box::new(repository),
        }
    }

    /// Applies `action` and returns the new state.
    pub fn dispatch(&self, action: CartAction) -> CartState {
        let name = action.name();
        let mut state = self.lock();
        let next = state.apply(action);

        if next == *state {
            debug!(action = name, "Cart action changed nothing");
            return next;
        }

        self.persist(&next);
        *state = next.clone();

        debug!(
            action = name,
            lines = next.line_count(),
            items = next.total_items(),
            "Cart updated"
        );
        next
    }

    /// Adds `quantity` of `product`.
    pub fn add(&self, product: Product, quantity: i64) -> CartState {
        self.dispatch(CartAction::add(product, quantity))
    }

    /// Removes the line for `id`.
    pub fn remove(&self, id: ProductId) -> CartState {
        self.dispatch(CartAction::Remove { id })
    }

    /// Sets the quantity for `id`; zero or less removes the line.
    pub fn set_quantity(&self, id: ProductId, quantity: i64) -> CartState {
        self.dispatch(CartAction::SetQuantity { id, quantity })
    }

    /// Empties the cart.
    pub fn clear(&self) -> CartState {
        self.dispatch(CartAction::Clear)
    }

    /// Swaps in a whole cart.
    pub fn replace(&self, cart: CartState) -> CartState {
        self.dispatch(CartAction::Replace(cart))
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> CartState {
        self.lock().clone()
    }

    /// Line count, item count and price, computed from one snapshot.
    pub fn totals(&self) -> CartTotals {
        self.lock().totals()
    }

    /// Sum of quantities.
    pub fn total_items(&self) -> i64 {
        self.lock().total_items()
    }

    /// Sum of price × quantity.
    pub fn total_price(&self) -> Money {
        self.lock().total_price()
    }

    /// Places a simulated order and empties the cart.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when there is nothing to order; the cart
    ///   is left alone
    pub fn checkout(&self) -> CoreResult<Order> {
        let mut state = self.lock();
        let order = place_order(&state)?;

        let next = state.apply(CartAction::Clear);
        self.persist(&next);
        *state = next;

        info!(
            order_id = %order.id,
            items = order.total_items,
            total = %order.total_price,
            "Order placed"
        );
        Ok(order)
    }

    fn persist(&self, cart: &CartState) {
        let result = if cart.is_empty() {
            self.repository.clear()
        } else {
            self.repository.save(cart)
        };

        if let Err(e) = result {
            warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use ecomlite_core::{CoreError, CART_STORAGE_KEY};

    use super::*;
    use crate::error::{StoreError, StoreResult};
    use crate::repository::cart::SlotCartRepository;
    use crate::slot::{KeyValueSlot, MemorySlot};

    fn product(id: ProductId, cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(cents))
    }

    fn memory_store() -> (CartStore, Arc<MemorySlot>) {
        let slot = Arc::new(MemorySlot::new());
        let store = CartStore::open(SlotCartRepository::new(Arc::clone(&slot)));
        (store, slot)
    }

    /// Counts saves and fails every one of them.
    struct FailingRepository {
        attempts: Arc<AtomicUsize>,
    }

    impl CartRepository for FailingRepository {
        fn load(&self) -> CartState {
            CartState::new()
        }

        fn save(&self, _cart: &CartState) -> StoreResult<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::QuotaExceeded {
                key: CART_STORAGE_KEY.to_string(),
                size: 1,
                quota: 0,
            })
        }

        fn clear(&self) -> StoreResult<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_every_change_is_persisted() {
        let (store, slot) = memory_store();

        store.add(product(1, 999), 1);
        store.add(product(2, 500), 3);

        let stored: CartState =
            serde_json::from_str(&slot.read(CART_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, store.snapshot());
        assert_eq!(store.total_items(), 4);
        assert_eq!(store.total_price(), Money::from_cents(2499));
    }

    #[test]
    fn test_emptying_cart_removes_slot() {
        let (store, slot) = memory_store();

        store.add(product(1, 999), 1);
        store.set_quantity(1, 0);

        assert!(store.snapshot().is_empty());
        assert_eq!(slot.read(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_no_op_does_not_write() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let store = CartStore::open(FailingRepository {
            attempts: Arc::clone(&attempts),
        });

        store.remove(42);
        store.set_quantity(42, 5);
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let store = CartStore::open(FailingRepository {
            attempts: Arc::clone(&attempts),
        });

        let state = store.add(product(1, 999), 2);

        assert_eq!(state.total_items(), 2);
        assert_eq!(store.total_items(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rehydrates_previous_session() {
        let slot = Arc::new(MemorySlot::new());
        {
            let store = CartStore::open(SlotCartRepository::new(Arc::clone(&slot)));
            store.add(product(3, 1250), 2);
        }

        let store = CartStore::open(SlotCartRepository::new(slot));
        assert_eq!(store.snapshot().line(3).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_rehydrating_oversized_quantities_does_not_panic() {
        let slot = Arc::new(MemorySlot::new());
        let json = format!(
            r#"{{"items":{{
                "1":{{"product":{{"id":1,"title":"A","price":0.0}},"quantity":{max}}},
                "2":{{"product":{{"id":2,"title":"B","price":0.0}},"quantity":{max}}}
            }}}}"#,
            max = i64::MAX
        );
        slot.seed(CART_STORAGE_KEY, &json);

        let store = CartStore::open(SlotCartRepository::new(Arc::clone(&slot)));

        assert_eq!(store.snapshot().line_count(), 1);
        assert_eq!(store.total_items(), i64::MAX);
        assert_eq!(store.total_price(), Money::zero());
    }

    #[test]
    fn test_oversized_line_total_saturates() {
        let (store, _slot) = memory_store();
        store.add(product(1, i64::MAX), 2);

        assert_eq!(store.total_price(), Money::from_cents(i64::MAX));
        assert_eq!(store.totals().total_items, 2);
    }

    #[test]
    fn test_checkout_clears_cart() {
        let (store, slot) = memory_store();
        store.add(product(1, 999), 1);
        store.add(product(2, 500), 3);

        let order = store.checkout().unwrap();

        assert_eq!(order.total_price, Money::from_cents(2499));
        assert!(store.snapshot().is_empty());
        assert_eq!(slot.read(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let (store, _slot) = memory_store();
        assert!(matches!(store.checkout(), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_concurrent_adds_are_serialized() {
        let (store, slot) = memory_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.add(product(1, 100), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.total_items(), 200);
        let stored: CartState =
            serde_json::from_str(&slot.read(CART_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.total_items(), 200);
    }
}
