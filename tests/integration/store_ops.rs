//! Collection store operations and publication

use super::test_utils::storefront_tree;
use serde_json::{json, Map};
use std::sync::Arc;
use vitrine::store::{CollectionName, Entity, EntityId, InsertPolicy, Operation, Store};
use vitrine::tree::Singleton;
use vitrine::{StateTree, StoreError};

#[test]
fn test_upsert_twice_equals_once() {
    let tree = storefront_tree();
    let entity = Entity::new("c-9").with("status", "draft");
    let once = tree.upsert(CollectionName::Campaigns, entity.clone(), InsertPolicy::Prepend);
    let twice = once.upsert(CollectionName::Campaigns, entity, InsertPolicy::Prepend);
    assert_eq!(once, twice);
    assert_eq!(twice.collection(CollectionName::Campaigns).len(), 1);
}

#[test]
fn test_upsert_replaces_in_place() {
    let tree = storefront_tree();
    let updated = tree.upsert(
        CollectionName::Orders,
        Entity::new("o-2").with("status", "refunded").with("total", 99.0),
        InsertPolicy::Prepend,
    );
    let ids: Vec<String> = updated
        .collection(CollectionName::Orders)
        .iter()
        .map(|e| e.id.to_string())
        .collect();
    assert_eq!(ids, vec!["o-1", "o-2", "o-3"]);
    assert_eq!(
        updated
            .collection(CollectionName::Orders)
            .get(&"o-2".into())
            .and_then(|e| e.get_str("status")),
        Some("refunded")
    );
}

#[test]
fn test_prepend_and_append_policies() {
    let tree = storefront_tree();
    let prepended = tree.upsert(CollectionName::Orders, Entity::new("o-0"), InsertPolicy::Prepend);
    assert_eq!(
        prepended.collection(CollectionName::Orders).as_slice()[0].id,
        EntityId::from("o-0")
    );
    let appended = tree.upsert(CollectionName::Orders, Entity::new("o-9"), InsertPolicy::Append);
    assert_eq!(
        appended.collection(CollectionName::Orders).as_slice()[3].id,
        EntityId::from("o-9")
    );
}

#[test]
fn test_remove_absent_keeps_identity() {
    let tree = storefront_tree();
    let next = tree.remove(CollectionName::Orders, &"missing".into());
    assert!(next.same_storage(&tree));

    let removed = tree.remove(CollectionName::Orders, &"o-1".into());
    assert_eq!(removed.collection(CollectionName::Orders).len(), 2);
    assert!(removed
        .collection(CollectionName::Banners)
        .same_identity(tree.collection(CollectionName::Banners)));
}

#[test]
fn test_toggle_field_preserves_other_fields() {
    let tree = storefront_tree();
    let next = tree
        .toggle_field(CollectionName::Banners, &1u64.into(), "active", json!(false))
        .unwrap();
    let banner = next.collection(CollectionName::Banners).get(&1u64.into()).unwrap();
    assert_eq!(banner.get_bool("active"), Some(false));
    assert_eq!(banner.get_str("title"), Some("Verão"));
    assert_eq!(next.collection(CollectionName::Banners).as_slice()[0].id, 1u64.into());
}

#[test]
fn test_merge_fields_rejects_identity() {
    let tree = storefront_tree();
    let mut fields = Map::new();
    fields.insert("id".to_string(), json!(7));
    let err = tree
        .merge_fields(CollectionName::Banners, &1u64.into(), fields)
        .unwrap_err();
    assert!(matches!(err, StoreError::IdentityField { .. }));
}

#[test]
fn test_store_all_or_nothing() {
    let store = Store::new(storefront_tree());
    let before = store.tree();
    let mut fields = Map::new();
    fields.insert("id".to_string(), json!("x"));

    let result = store.apply_all(vec![
        Operation::ReplaceSingleton {
            singleton: Singleton::InjectedMarkup(String::new()),
        },
        Operation::MergeFields {
            collection: CollectionName::Orders,
            id: "o-1".into(),
            fields,
        },
    ]);
    assert!(result.is_err());
    // the first operation stays applied, the failing one left no trace
    assert_eq!(store.version(), 2);
    assert!(store
        .tree()
        .collection(CollectionName::Orders)
        .same_identity(before.collection(CollectionName::Orders)));
}

#[tokio::test]
async fn test_subscriber_observes_each_version() {
    let store = Store::new(StateTree::empty());
    let mut receiver = store.subscribe();

    store
        .apply(Operation::Upsert {
            collection: CollectionName::Faqs,
            entity: Entity::new("q1").with("question", "Prazo?"),
            policy: None,
        })
        .unwrap();
    receiver.changed().await.unwrap();
    let seen = receiver.borrow_and_update().clone();
    assert_eq!(seen.version, 2);
    assert!(Arc::ptr_eq(&seen.tree, &store.tree()));
}

#[test]
fn test_issued_ids_follow_collection_scheme() {
    let banner = EntityId::issue_for(CollectionName::Banners);
    let order = EntityId::issue_for(CollectionName::Orders);
    assert!(banner.as_number().is_some());
    assert!(order.as_number().is_none());

    let first = EntityId::issue_for(CollectionName::Categories);
    let second = EntityId::issue_for(CollectionName::Categories);
    assert!(second.as_number().unwrap() > first.as_number().unwrap());
}
