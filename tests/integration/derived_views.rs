//! Derived views over the storefront fixture

use super::test_utils::storefront_tree;
use vitrine::store::{CollectionName, Entity, EntityId, InsertPolicy, Operation, Store};
use vitrine::views::{DerivedViews, ViewsConfig};

#[test]
fn test_revenue_skips_cancelled_orders() {
    let views = DerivedViews::default();
    let revenue = views.revenue(&storefront_tree());
    assert_eq!(revenue.total_revenue, 80.0);
    assert_eq!(revenue.qualifying_orders, 2);
    assert_eq!(revenue.cancelled_orders, 1);
    assert_eq!(revenue.average_ticket, 40.0);
}

#[test]
fn test_top_products_count_only_sold_lines() {
    let views = DerivedViews::default();
    let top = views.top_products(&storefront_tree());
    let ranked: Vec<(EntityId, u64)> = top
        .iter()
        .map(|p| (p.product_id.clone(), p.quantity))
        .collect();
    assert_eq!(
        ranked,
        vec![(EntityId::Numeric(102), 4), (EntityId::Numeric(101), 2)]
    );
    assert_eq!(top[0].name, "Camiseta");
}

#[test]
fn test_top_products_respects_configured_n() {
    let views = DerivedViews::new(ViewsConfig {
        top_n: 1,
        ..ViewsConfig::default()
    });
    assert_eq!(views.top_products(&storefront_tree()).len(), 1);
}

#[test]
fn test_leaderboard_ties_keep_collection_order() {
    let views = DerivedViews::default();
    let board = views.leaderboard(&storefront_tree());
    let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bruno", "Ana", "Carla"]);
    let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn test_kpis_and_active_banners() {
    let views = DerivedViews::default();
    let tree = storefront_tree();
    let kpis = views.kpis(&tree);
    assert_eq!(kpis.order_count, 3);
    assert_eq!(kpis.pending_orders, 1);
    assert_eq!(kpis.low_stock_products, 1);

    let banners = views.active_banners(&tree);
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].id, EntityId::Numeric(1));
}

#[test]
fn test_unrelated_change_reuses_views() {
    let store = Store::new(storefront_tree());
    let views = DerivedViews::default();

    let before = views.revenue(&store.tree());
    store
        .apply(Operation::Upsert {
            collection: CollectionName::Faqs,
            entity: Entity::new("q1").with("question", "Troca?"),
            policy: None,
        })
        .unwrap();
    let after = views.revenue(&store.tree());
    assert!(std::sync::Arc::ptr_eq(&before, &after));

    let stats = views.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[test]
fn test_order_change_recomputes() {
    let store = Store::new(storefront_tree());
    let views = DerivedViews::default();
    assert_eq!(views.revenue(&store.tree()).total_revenue, 80.0);

    store
        .apply(Operation::Upsert {
            collection: CollectionName::Orders,
            entity: Entity::new("o-4").with("status", "paid").with("total", 20.0),
            policy: Some(InsertPolicy::Append),
        })
        .unwrap();
    let revenue = views.revenue(&store.tree());
    assert_eq!(revenue.total_revenue, 100.0);
    assert_eq!(revenue.qualifying_orders, 3);
    assert_eq!(views.stats().misses, 2);
}
