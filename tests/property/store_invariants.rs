//! Property-based tests for collection store invariants

use proptest::prelude::*;
use std::collections::HashSet;
use vitrine::store::{CollectionName, Entity, EntityId, InsertPolicy, Operation, Store};
use vitrine::StateTree;

#[derive(Debug, Clone)]
enum Step {
    Upsert(u64, i64, bool),
    Remove(u64),
    Toggle(u64, bool),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u64..8, any::<i64>(), any::<bool>()).prop_map(|(id, n, prepend)| Step::Upsert(id, n, prepend)),
        (0u64..8).prop_map(Step::Remove),
        (0u64..8, any::<bool>()).prop_map(|(id, flag)| Step::Toggle(id, flag)),
    ]
}

fn to_operation(step: Step) -> Operation {
    match step {
        Step::Upsert(id, n, prepend) => Operation::Upsert {
            collection: CollectionName::Banners,
            entity: Entity::new(id).with("weight", n),
            policy: Some(if prepend {
                InsertPolicy::Prepend
            } else {
                InsertPolicy::Append
            }),
        },
        Step::Remove(id) => Operation::Remove {
            collection: CollectionName::Banners,
            id: EntityId::Numeric(id),
        },
        Step::Toggle(id, flag) => Operation::ToggleField {
            collection: CollectionName::Banners,
            id: EntityId::Numeric(id),
            field: "active".into(),
            value: serde_json::json!(flag),
        },
    }
}

/// Ids stay unique within a collection under any operation sequence
#[test]
fn test_ids_unique_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(step(), 0..40), |steps| {
            let store = Store::new(StateTree::empty());
            for step in steps {
                store.apply(to_operation(step)).unwrap();
            }
            let tree = store.tree();
            let banners = tree.collection(CollectionName::Banners);
            let ids: HashSet<_> = banners.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(ids.len(), banners.len());
            Ok(())
        })
        .unwrap();
}

/// Upserting the same entity twice equals upserting it once
#[test]
fn test_upsert_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(step(), 0..20), 0u64..8, any::<i64>()),
            |(steps, id, weight)| {
                let store = Store::new(StateTree::empty());
                for step in steps {
                    store.apply(to_operation(step)).unwrap();
                }
                let entity = Entity::new(id).with("weight", weight);
                let tree = store.tree();
                let once = tree.upsert(CollectionName::Banners, entity.clone(), InsertPolicy::Append);
                let twice = once.upsert(CollectionName::Banners, entity, InsertPolicy::Append);
                prop_assert_eq!(once, twice);
                Ok(())
            },
        )
        .unwrap();
}

/// Versions only advance when the tree changes, and untouched collections keep identity
#[test]
fn test_version_and_sharing_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(step(), 1..30), |steps| {
            let store = Store::new(StateTree::empty());
            let initial = store.tree();
            for step in steps {
                let before = store.current();
                let after = store.apply(to_operation(step)).unwrap();
                if after.tree.same_storage(&before.tree) {
                    prop_assert_eq!(after.version, before.version);
                } else {
                    prop_assert_eq!(after.version, before.version + 1);
                }
            }
            let tree = store.tree();
            prop_assert!(tree
                .collection(CollectionName::Orders)
                .same_identity(initial.collection(CollectionName::Orders)));
            Ok(())
        })
        .unwrap();
}
