//! End-to-end persistence through real files.

use std::fs;

use ecomlite_core::{Money, Product, CART_STORAGE_KEY};
use ecomlite_store::{
    CartStore, FileSlot, KeyValueSlot, LoginRequest, MockSession, SlotCartRepository,
    SlotProfileRepository, WriteBehindSlot,
};

fn backpack() -> Product {
    Product::new(1, "Fjallraven Backpack", Money::from_cents(10995))
}

fn tee() -> Product {
    Product::new(2, "Slim Fit T-Shirt", Money::from_cents(2230))
}

#[test]
fn cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = CartStore::open(SlotCartRepository::new(
            FileSlot::open(dir.path()).unwrap(),
        ));
        store.add(backpack(), 1);
        store.add(tee(), 2);
        store.set_quantity(2, 3);
    }

    let store = CartStore::open(SlotCartRepository::new(
        FileSlot::open(dir.path()).unwrap(),
    ));
    let cart = store.snapshot();
    assert_eq!(cart.line_count(), 2);
    assert_eq!(cart.total_items(), 4);
    assert_eq!(cart.total_price(), Money::from_cents(10995 + 3 * 2230));
}

#[test]
fn corrupt_cart_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(format!("{}.json", CART_STORAGE_KEY)),
        "{\"items\": {\"1\": ",
    )
    .unwrap();

    let store = CartStore::open(SlotCartRepository::new(
        FileSlot::open(dir.path()).unwrap(),
    ));
    assert!(store.snapshot().is_empty());

    // The next change overwrites the corrupt document.
    store.add(backpack(), 1);
    let raw = fs::read_to_string(dir.path().join("ecomlite_cart_v1.json")).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

#[test]
fn write_behind_cart_matches_final_state() {
    let dir = tempfile::tempdir().unwrap();
    let writer = WriteBehindSlot::spawn(FileSlot::open(dir.path()).unwrap()).unwrap();
    let repository = SlotCartRepository::new(writer);
    let store = CartStore::open(repository);

    for _ in 0..50 {
        store.add(tee(), 1);
    }
    store.remove(2);
    store.add(backpack(), 5);
    drop(store);

    let slot = FileSlot::open(dir.path()).unwrap();
    let raw = slot.read(CART_STORAGE_KEY).unwrap().unwrap();
    let cart: ecomlite_core::CartState = serde_json::from_str(&raw).unwrap();
    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.line(1).map(|l| l.quantity), Some(5));
}

#[test]
fn session_and_cart_share_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::open(dir.path()).unwrap();

    let session = MockSession::open(SlotProfileRepository::new(slot.clone()));
    let store = CartStore::open(SlotCartRepository::new(slot));

    session.login(LoginRequest::new("rina", "s3cret!")).unwrap();
    store.add(backpack(), 1);

    assert!(dir.path().join("AUTH_CONTEXT.json").exists());
    assert!(dir.path().join("ecomlite_cart_v1.json").exists());

    session.logout().unwrap();
    assert!(!dir.path().join("AUTH_CONTEXT.json").exists());
    assert_eq!(store.total_items(), 1);
}
