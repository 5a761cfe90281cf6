//! End-to-end cart persistence through `FileStorage`.
//!
//! Each test works in its own scratch directory under the system temp dir.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;
use shopfront_cart::{CartStorage, CartStore, FileStorage};
use shopfront_core::Product;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        Self(std::env::temp_dir().join(format!(
            "shopfront-cart-it-{}-{n}",
            std::process::id()
        )))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.0).ok();
    }
}

fn product(id: u64, price: &str) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Product {id}"),
        "description": "",
        "price": Decimal::from_str(price).unwrap(),
        "discountPercentage": 1.5,
        "rating": 4.0,
        "stock": 3,
        "thumbnail": "https://cdn.example.com/t.png"
    }))
    .expect("fixture product should parse")
}

#[test]
fn cart_survives_a_restart() {
    let dir = ScratchDir::new();

    let mut store = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    assert!(store.is_empty());
    store.add_to_cart(&product(1, "10")).unwrap();
    store.add_to_cart(&product(1, "10")).unwrap();
    store.add_to_cart(&product(2, "5.5")).unwrap();
    let before = store.lines().to_vec();
    drop(store);

    let reloaded = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    assert_eq!(reloaded.lines(), before.as_slice());
    assert_eq!(reloaded.total_quantity(), 3);
    assert_eq!(reloaded.formatted_total_price(), "25.50");
}

#[test]
fn stored_document_is_a_flat_json_array() {
    let dir = ScratchDir::new();

    let mut store = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    store.add_to_cart(&product(7, "3.25")).unwrap();

    let raw = fs::read_to_string(dir.0.join("cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let lines = value.as_array().expect("cart should be a JSON array");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["id"], 7);
    assert_eq!(lines[0]["quantity"], 1);
    assert_eq!(lines[0]["title"], "Product 7");
}

#[test]
fn corrupt_file_starts_empty_and_is_replaced_on_next_write() {
    let dir = ScratchDir::new();
    let mut storage = FileStorage::new(&dir.0);
    storage.write("cart", "definitely not json").unwrap();

    let mut store = CartStore::hydrate(storage, "cart");
    assert!(store.is_empty());

    store.add_to_cart(&product(3, "1")).unwrap();
    let reloaded = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get(3).unwrap().quantity, 1);
}

#[test]
fn emptied_cart_is_persisted_as_empty_array() {
    let dir = ScratchDir::new();

    let mut store = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    store.add_to_cart(&product(1, "1")).unwrap();
    store.update_quantity(1, -1).unwrap();

    let raw = fs::read_to_string(dir.0.join("cart.json")).unwrap();
    assert_eq!(raw, "[]");
    assert!(CartStore::hydrate(FileStorage::new(&dir.0), "cart").is_empty());
}

#[test]
fn separate_keys_hold_separate_carts() {
    let dir = ScratchDir::new();

    let mut first = CartStore::hydrate(FileStorage::new(&dir.0), "cart");
    first.add_to_cart(&product(1, "1")).unwrap();
    let second = CartStore::hydrate(FileStorage::new(&dir.0), "guest_cart");

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}
