//! Presentation projection against the store

use super::test_utils::storefront_tree;
use vitrine::projection::{MemoryEnvironment, Projector};
use vitrine::store::{CollectionName, Entity, Operation, Store};
use vitrine::tree::{Singleton, Theme};

#[test]
fn test_initial_projection() {
    let mut projector = Projector::new(MemoryEnvironment::new());
    assert!(projector.observe(&storefront_tree()));
    let environment = projector.environment();
    assert_eq!(environment.style_variables["--color-primary"], "#1d3557");
    assert_eq!(environment.style_variables["--color-accent"], "#e63946");
    assert_eq!(environment.base_font, Some((17, "Lora, serif".to_string())));
    assert_eq!(environment.favicon.as_deref(), Some("/assets/favicon.png"));
    assert!(environment.injected_markup.contains("robots"));
    assert!(environment.to_css().contains("font-size: 17px;"));
}

#[test]
fn test_unwatched_change_does_not_reapply() {
    let store = Store::new(storefront_tree());
    let mut projector = Projector::new(MemoryEnvironment::new());
    projector.observe(&store.tree());

    store
        .apply(Operation::Upsert {
            collection: CollectionName::Banners,
            entity: Entity::new(3u64).with("active", true),
            policy: None,
        })
        .unwrap();
    assert!(!projector.observe(&store.tree()));
    assert_eq!(projector.applications(), 1);
}

#[test]
fn test_theme_replacement_reapplies() {
    let store = Store::new(storefront_tree());
    let mut projector = Projector::new(MemoryEnvironment::new());
    projector.observe(&store.tree());

    store
        .apply(Operation::ReplaceSingleton {
            singleton: Singleton::Theme(Theme::default().with_color("primary", "#000000")),
        })
        .unwrap();
    assert!(projector.observe(&store.tree()));
    assert_eq!(
        projector.environment().style_variables["--color-primary"],
        "#000000"
    );
}

#[tokio::test]
async fn test_follow_until_store_dropped() {
    let store = Store::new(storefront_tree());
    let receiver = store.subscribe();
    let task = tokio::spawn(Projector::new(MemoryEnvironment::new()).follow(receiver));

    store
        .apply(Operation::ReplaceSingleton {
            singleton: Singleton::InjectedMarkup("<script>track()</script>".into()),
        })
        .unwrap();
    drop(store);

    let environment = task.await.unwrap();
    assert_eq!(environment.injected_markup, "<script>track()</script>");
    assert_eq!(environment.favicon.as_deref(), Some("/assets/favicon.png"));
}
