use std::path::PathBuf;
use std::str::FromStr;

use super::*;
use crate::error::StorageError;
use crate::storage::MemoryStorage;

const KEY: &str = "cart";

fn product(id: ProductId, price: &str) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        description: String::new(),
        price: Decimal::from_str(price).unwrap(),
        discount_percentage: 0.0,
        rating: 4.5,
        stock: 10,
        thumbnail: String::new(),
        category: None,
        brand: None,
        tags: vec![],
    }
}

fn empty_store() -> CartStore<MemoryStorage> {
    CartStore::hydrate(MemoryStorage::new(), KEY)
}

fn ids(store: &CartStore<MemoryStorage>) -> Vec<ProductId> {
    store.lines().iter().map(CartLine::id).collect()
}

fn stored_lines(store: &CartStore<MemoryStorage>) -> Vec<CartLine> {
    let raw = store.storage().get(KEY).expect("cart should be stored");
    serde_json::from_str(raw).expect("stored cart should parse")
}

/// Storage whose writes always fail.
struct ReadOnlyStorage;

impl CartStorage for ReadOnlyStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: PathBuf::from("/read-only/cart.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

/// Storage whose reads always fail.
struct UnreadableStorage;

impl CartStorage for UnreadableStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io {
            path: PathBuf::from("/unreadable/cart.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// add_to_cart
// ---------------------------------------------------------------------------

#[test]
fn adding_same_product_twice_gives_one_line_with_quantity_two() {
    let mut store = empty_store();
    let p = product(1, "9.99");

    store.add_to_cart(&p).unwrap();
    store.add_to_cart(&p).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(1).unwrap().quantity, 2);
}

#[test]
fn distinct_adds_give_one_line_per_id_with_add_counts() {
    let mut store = empty_store();
    let adds: [ProductId; 7] = [3, 1, 3, 2, 1, 3, 4];

    for id in adds {
        store.add_to_cart(&product(id, "1")).unwrap();
    }

    assert_eq!(ids(&store), vec![3, 1, 2, 4], "first-add order is kept");
    for line in store.lines() {
        let expected = adds.iter().filter(|&&id| id == line.id()).count();
        assert_eq!(line.quantity as usize, expected, "quantity for {}", line.id());
    }
}

#[test]
fn increment_keeps_line_position() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();
    store.add_to_cart(&product(2, "1")).unwrap();
    store.add_to_cart(&product(1, "1")).unwrap();

    assert_eq!(ids(&store), vec![1, 2]);
}

#[test]
fn every_add_writes_the_whole_cart() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "2.50")).unwrap();
    store.add_to_cart(&product(2, "1.00")).unwrap();
    store.add_to_cart(&product(1, "2.50")).unwrap();

    assert_eq!(store.storage().write_count(), 3);
    assert_eq!(stored_lines(&store), store.lines());
}

// ---------------------------------------------------------------------------
// update_quantity
// ---------------------------------------------------------------------------

#[test]
fn decrement_at_quantity_one_removes_line() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();
    store.add_to_cart(&product(2, "1")).unwrap();

    store.update_quantity(1, -1).unwrap();

    assert_eq!(ids(&store), vec![2]);
    assert!(store.get(1).is_none());
    assert_eq!(ids(&store), stored_lines(&store).iter().map(CartLine::id).collect::<Vec<_>>());
}

#[test]
fn large_negative_delta_removes_line() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();
    store.update_quantity(1, -50).unwrap();
    assert!(store.is_empty());
}

#[test]
fn positive_delta_keeps_position() {
    let mut store = empty_store();
    for id in [1, 2, 3] {
        store.add_to_cart(&product(id, "1")).unwrap();
    }

    store.update_quantity(2, 4).unwrap();

    assert_eq!(ids(&store), vec![1, 2, 3]);
    assert_eq!(store.get(2).unwrap().quantity, 5);
}

#[test]
fn negative_delta_above_zero_keeps_line() {
    let mut store = empty_store();
    let p = product(1, "1");
    for _ in 0..3 {
        store.add_to_cart(&p).unwrap();
    }

    store.update_quantity(1, -2).unwrap();
    assert_eq!(store.get(1).unwrap().quantity, 1);
}

#[test]
fn update_for_unknown_id_leaves_cart_and_storage_alone() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();
    let before = store.lines().to_vec();
    let writes = store.storage().write_count();

    store.update_quantity(99, 1).unwrap();

    assert_eq!(store.lines(), before.as_slice());
    assert_eq!(store.storage().write_count(), writes);
}

#[test]
fn quantity_saturates_instead_of_overflowing() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();
    store.update_quantity(1, i64::MAX).unwrap();
    assert_eq!(store.get(1).unwrap().quantity, u32::MAX);
}

#[test]
fn totals_saturate_for_huge_stored_amounts() {
    let raw = r#"[
        {"id":1,"title":"Pricey","price":"100000000000000000000","quantity":4000000000},
        {"id":2,"title":"Also pricey","price":"100000000000000000000","quantity":4000000000}
    ]"#;
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, raw), KEY);

    assert_eq!(store.total_price(), Decimal::MAX);
    assert!(store
        .formatted_total_price()
        .starts_with(&Decimal::MAX.to_string()));
    assert_eq!(store.lines()[0].line_total(), Decimal::MAX);
}

// ---------------------------------------------------------------------------
// remove_item
// ---------------------------------------------------------------------------

#[test]
fn remove_item_drops_only_that_line() {
    let mut store = empty_store();
    for id in [1, 2, 3] {
        store.add_to_cart(&product(id, "1")).unwrap();
    }
    store.add_to_cart(&product(2, "1")).unwrap();

    store.remove_item(2).unwrap();

    assert_eq!(ids(&store), vec![1, 3]);
    assert_eq!(stored_lines(&store).len(), 2);
}

#[test]
fn remove_unknown_item_still_writes() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "1")).unwrap();

    store.remove_item(42).unwrap();

    assert_eq!(ids(&store), vec![1]);
    assert_eq!(store.storage().write_count(), 2);
}

// ---------------------------------------------------------------------------
// totals
// ---------------------------------------------------------------------------

#[test]
fn totals_for_mixed_cart() {
    let mut store = empty_store();
    let ten = product(1, "10");
    store.add_to_cart(&ten).unwrap();
    store.add_to_cart(&ten).unwrap();
    store.add_to_cart(&product(2, "5.5")).unwrap();

    assert_eq!(store.total_quantity(), 3);
    assert_eq!(store.total_price(), Decimal::from_str("25.50").unwrap());
    assert_eq!(store.formatted_total_price(), "25.50");
}

#[test]
fn totals_for_empty_cart() {
    let store = empty_store();
    assert_eq!(store.total_quantity(), 0);
    assert_eq!(store.formatted_total_price(), "0.00");
}

#[test]
fn total_price_rounds_to_cents() {
    let mut store = empty_store();
    let p = product(1, "0.335");
    for _ in 0..3 {
        store.add_to_cart(&p).unwrap();
    }
    assert_eq!(store.formatted_total_price(), "1.01");
}

#[test]
fn totals_do_not_write() {
    let mut store = empty_store();
    store.add_to_cart(&product(1, "3")).unwrap();
    let writes = store.storage().write_count();

    let _ = store.total_quantity();
    let _ = store.total_price();

    assert_eq!(store.storage().write_count(), writes);
}

// ---------------------------------------------------------------------------
// hydrate
// ---------------------------------------------------------------------------

#[test]
fn hydrate_round_trips_stored_cart() {
    let mut store = empty_store();
    store.add_to_cart(&product(5, "1.25")).unwrap();
    store.add_to_cart(&product(2, "3.10")).unwrap();
    store.add_to_cart(&product(5, "1.25")).unwrap();
    store.add_to_cart(&product(9, "7")).unwrap();

    let raw = store.storage().get(KEY).unwrap().to_owned();
    let reloaded = CartStore::hydrate(MemoryStorage::with_value(KEY, &raw), KEY);

    assert_eq!(reloaded.lines(), store.lines());
}

#[test]
fn hydrate_missing_key_is_empty() {
    let store = CartStore::hydrate(MemoryStorage::with_value("other", "[]"), KEY);
    assert!(store.is_empty());
}

#[test]
fn hydrate_corrupt_value_is_empty() {
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, "{not json"), KEY);
    assert!(store.is_empty());
}

#[test]
fn hydrate_wrong_shape_is_empty() {
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, r#"{"id": 1}"#), KEY);
    assert!(store.is_empty());
}

#[test]
fn hydrate_unreadable_storage_is_empty() {
    let store = CartStore::hydrate(UnreadableStorage, KEY);
    assert!(store.is_empty());
}

#[test]
fn hydrate_reads_cart_written_by_browser_app() {
    let raw = r#"[
        {"id":1,"title":"Mascara","price":9.99,"discountPercentage":7.17,"rating":4.94,"stock":5,"thumbnail":"t.png","quantity":2},
        {"id":2,"title":"Palette","price":19.99,"discountPercentage":5.5,"rating":3.28,"stock":44,"thumbnail":"p.png","quantity":1}
    ]"#;
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, raw), KEY);

    assert_eq!(ids(&store), vec![1, 2]);
    assert_eq!(store.total_quantity(), 3);
    assert_eq!(store.formatted_total_price(), "39.97");
}

#[test]
fn hydrate_repairs_duplicate_and_empty_lines() {
    let raw = r#"[
        {"id":1,"title":"A","price":1,"quantity":2},
        {"id":2,"title":"B","price":1,"quantity":0},
        {"id":3,"title":"C","price":1,"quantity":1},
        {"id":1,"title":"A","price":1,"quantity":3}
    ]"#;
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, raw), KEY);

    assert_eq!(ids(&store), vec![1, 3]);
    assert_eq!(store.get(1).unwrap().quantity, 5);
}

#[test]
fn hydrate_does_not_write() {
    let store = CartStore::hydrate(MemoryStorage::with_value(KEY, "[]"), KEY);
    assert_eq!(store.storage().write_count(), 0);
}

// ---------------------------------------------------------------------------
// write failures
// ---------------------------------------------------------------------------

#[test]
fn failed_write_returns_error_and_keeps_mutation() {
    let mut store = CartStore::hydrate(ReadOnlyStorage, KEY);

    let result = store.add_to_cart(&product(1, "1"));

    assert!(
        matches!(result, Err(CartError::Storage(StorageError::Io { .. }))),
        "expected Storage(Io), got: {result:?}"
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.total_quantity(), 1);
}
