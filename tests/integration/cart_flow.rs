//! Cart operations through the store

use vitrine::cart::ProductSnapshot;
use vitrine::catalog::find_product;
use vitrine::store::{EntityId, Operation, Store};
use vitrine::StoreError;

use super::test_utils::storefront_tree;

fn snapshot_of(store: &Store, id: i64) -> ProductSnapshot {
    let product = find_product(&store.tree(), id).unwrap();
    ProductSnapshot::from(&product)
}

#[test]
fn test_add_merges_quantities() {
    let store = Store::new(storefront_tree());
    let mug = snapshot_of(&store, 101);
    store
        .apply(Operation::AddToCart {
            product: mug.clone(),
            quantity: 2,
        })
        .unwrap();
    store
        .apply(Operation::AddToCart {
            product: mug,
            quantity: 3,
        })
        .unwrap();

    let tree = store.tree();
    let cart = tree.cart();
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.line(&EntityId::Numeric(101)).unwrap().quantity(), 5);
}

#[test]
fn test_subtotal() {
    let store = Store::new(storefront_tree());
    store
        .apply_all(vec![
            Operation::AddToCart {
                product: snapshot_of(&store, 101),
                quantity: 2,
            },
            Operation::AddToCart {
                product: snapshot_of(&store, 102),
                quantity: 1,
            },
        ])
        .unwrap();
    assert_eq!(store.tree().cart().subtotal(), 35.0);
    assert_eq!(store.tree().cart().item_count(), 3);
}

#[test]
fn test_non_positive_quantity_removes_line() {
    for quantity in [0, -1] {
        let store = Store::new(storefront_tree());
        store
            .apply(Operation::AddToCart {
                product: snapshot_of(&store, 42),
                quantity: 1,
            })
            .unwrap();
        store
            .apply(Operation::SetCartQuantity {
                product_id: EntityId::Numeric(42),
                quantity,
            })
            .unwrap();
        assert!(store.tree().cart().is_empty(), "quantity {}", quantity);
    }
}

#[test]
fn test_zero_add_rejected_without_new_version() {
    let store = Store::new(storefront_tree());
    let err = store
        .apply(Operation::AddToCart {
            product: snapshot_of(&store, 101),
            quantity: 0,
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidQuantity { quantity: 0, .. }));
    assert_eq!(store.version(), 1);
}

#[test]
fn test_price_captured_at_add_time() {
    let store = Store::new(storefront_tree());
    store
        .apply(Operation::AddToCart {
            product: snapshot_of(&store, 101),
            quantity: 1,
        })
        .unwrap();
    let mut fields = serde_json::Map::new();
    fields.insert("price".into(), serde_json::json!(99.0));
    store
        .apply(Operation::MergeFields {
            collection: vitrine::store::CollectionName::FeaturedProducts,
            id: EntityId::Numeric(101),
            fields,
        })
        .unwrap();
    assert_eq!(store.tree().cart().subtotal(), 10.0);
}

#[test]
fn test_remove_and_clear() {
    let store = Store::new(storefront_tree());
    store
        .apply_all(vec![
            Operation::AddToCart {
                product: snapshot_of(&store, 101),
                quantity: 1,
            },
            Operation::AddToCart {
                product: snapshot_of(&store, 102),
                quantity: 1,
            },
            Operation::RemoveFromCart {
                product_id: EntityId::Numeric(101),
            },
        ])
        .unwrap();
    assert_eq!(store.tree().cart().lines().len(), 1);

    let version = store.version();
    store.apply(Operation::ClearCart).unwrap();
    assert!(store.tree().cart().is_empty());
    assert_eq!(store.version(), version + 1);
    // clearing an empty cart publishes nothing
    store.apply(Operation::ClearCart).unwrap();
    assert_eq!(store.version(), version + 1);
}
