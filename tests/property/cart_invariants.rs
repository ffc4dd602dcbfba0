//! Property-based tests for cart invariants

use proptest::prelude::*;
use std::collections::HashSet;
use vitrine::cart::{Cart, ProductSnapshot};
use vitrine::store::EntityId;

#[derive(Debug, Clone)]
enum CartStep {
    Add(u64, u32),
    Set(u64, i64),
    Remove(u64),
}

fn cart_step() -> impl Strategy<Value = CartStep> {
    prop_oneof![
        (0u64..5, 0u32..10).prop_map(|(id, q)| CartStep::Add(id, q)),
        (0u64..5, -5i64..10).prop_map(|(id, q)| CartStep::Set(id, q)),
        (0u64..5).prop_map(CartStep::Remove),
    ]
}

fn snapshot(id: u64) -> ProductSnapshot {
    ProductSnapshot {
        product_id: EntityId::Numeric(id),
        name: format!("Product {}", id),
        price: 2.5 * (id + 1) as f64,
        image: None,
    }
}

fn run(steps: Vec<CartStep>) -> Cart {
    let mut cart = Cart::default();
    for step in steps {
        cart = match step {
            // a rejected add leaves the cart as it was
            CartStep::Add(id, q) => cart.add(snapshot(id), q).unwrap_or_else(|_| cart.clone()),
            CartStep::Set(id, q) => cart.set_quantity(&EntityId::Numeric(id), q),
            CartStep::Remove(id) => cart.remove(&EntityId::Numeric(id)),
        };
    }
    cart
}

/// Every line has a positive quantity and at most one line exists per product
#[test]
fn test_cart_lines_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(cart_step(), 0..50), |steps| {
            let cart = run(steps);
            let products: HashSet<_> = cart.lines().iter().map(|l| l.product_id.clone()).collect();
            prop_assert_eq!(products.len(), cart.lines().len());
            prop_assert!(cart.lines().iter().all(|l| l.quantity() > 0));
            Ok(())
        })
        .unwrap();
}

/// Subtotal always equals the sum of line totals
#[test]
fn test_subtotal_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(cart_step(), 0..50), |steps| {
            let cart = run(steps);
            let expected: f64 = cart
                .lines()
                .iter()
                .map(|l| l.price * f64::from(l.quantity()))
                .sum();
            prop_assert!((cart.subtotal() - expected).abs() < 1e-9);
            prop_assert_eq!(
                cart.item_count(),
                cart.lines().iter().map(|l| u64::from(l.quantity())).sum::<u64>()
            );
            Ok(())
        })
        .unwrap();
}
