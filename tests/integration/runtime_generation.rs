//! Main loop with off-loop generation jobs

use super::test_utils::storefront_tree;
use std::sync::Arc;
use vitrine::generation::{GenerationJob, MergeTarget, ViewScope};
use vitrine::provider::{ContentGenerator, ContentKind, GenerationRequest, StaticGenerator};
use vitrine::router::{FragmentRouter, View};
use vitrine::store::{CollectionName, EntityId, Operation};
use vitrine::views::ViewsConfig;
use vitrine::{App, Command};

fn app() -> App {
    App::new(
        storefront_tree(),
        ViewsConfig::default(),
        FragmentRouter::default(),
    )
}

fn subtitle_job() -> GenerationJob {
    GenerationJob::new(
        GenerationRequest::text("frete grátis"),
        MergeTarget::Field {
            collection: CollectionName::Banners,
            id: EntityId::Numeric(1),
            field: "subtitle".into(),
        },
    )
}

#[tokio::test]
async fn test_live_scope_merges_result() {
    let mut app = app();
    let scope = ViewScope::new("banners");
    let generator: Arc<dyn ContentGenerator> = Arc::new(StaticGenerator::default());

    let dispatched = subtitle_job()
        .spawn(generator, app.handle(), scope.liveness())
        .await
        .unwrap()
        .unwrap();
    assert!(dispatched);
    assert_eq!(app.drain(), 1);

    let tree = app.tree();
    let banner = tree
        .collection(CollectionName::Banners)
        .get(&EntityId::Numeric(1))
        .unwrap();
    assert_eq!(banner.get_str("subtitle"), Some("Generated: frete grátis"));
    assert_eq!(banner.get_str("title"), Some("Verão"));
}

#[tokio::test]
async fn test_closed_scope_drops_result() {
    let mut app = app();
    let scope = ViewScope::new("banners");
    let liveness = scope.liveness();
    drop(scope);

    let generator: Arc<dyn ContentGenerator> = Arc::new(StaticGenerator::default());
    let dispatched = subtitle_job()
        .spawn(generator, app.handle(), liveness)
        .await
        .unwrap()
        .unwrap();
    assert!(!dispatched);
    assert_eq!(app.drain(), 0);
    assert_eq!(app.store().version(), 1);
}

#[tokio::test]
async fn test_result_merges_against_latest_tree() {
    let mut app = app();
    let scope = ViewScope::new("banners");
    let job = subtitle_job();

    // the banner changes while the job is in flight
    app.dispatch(Operation::ToggleField {
        collection: CollectionName::Banners,
        id: EntityId::Numeric(1),
        field: "active".into(),
        value: serde_json::json!(false),
    })
    .unwrap();

    let generator: Arc<dyn ContentGenerator> = Arc::new(StaticGenerator::default());
    job.spawn(generator, app.handle(), scope.liveness())
        .await
        .unwrap()
        .unwrap();
    app.drain();

    let tree = app.tree();
    let banner = tree
        .collection(CollectionName::Banners)
        .get(&EntityId::Numeric(1))
        .unwrap();
    assert_eq!(banner.get_bool("active"), Some(false));
    assert!(banner.get_str("subtitle").is_some());
    assert_eq!(app.store().version(), 3);
}

#[tokio::test]
async fn test_failed_generation_surfaces_notice() {
    let mut app = app();
    let scope = ViewScope::new("assets");
    let generator: Arc<dyn ContentGenerator> = Arc::new(StaticGenerator::failing("quota"));
    let job = GenerationJob::new(
        GenerationRequest::image("hero"),
        MergeTarget::NewEntity {
            collection: CollectionName::GeneratedAssets,
        },
    );

    job.spawn(generator, app.handle(), scope.liveness())
        .await
        .unwrap()
        .unwrap();
    app.drain();

    assert_eq!(app.store().version(), 1);
    assert_eq!(app.notices().len(), 1);
    assert!(app.notices()[0].message.contains("quota"));
}

#[tokio::test]
async fn test_new_entity_lands_first() {
    let mut app = app();
    let generator = StaticGenerator::default().with_response(ContentKind::Image, "https://img/a");
    for prompt in ["a", "b"] {
        let job = GenerationJob::new(
            GenerationRequest::image(prompt),
            MergeTarget::NewEntity {
                collection: CollectionName::GeneratedAssets,
            },
        );
        let command = job.run(&generator).await;
        app.handle().submit(command).unwrap();
    }
    app.drain();

    let tree = app.tree();
    let assets = tree.collection(CollectionName::GeneratedAssets);
    assert_eq!(assets.len(), 2);
    assert_eq!(assets.as_slice()[0].get_str("prompt"), Some("b"));
}

#[tokio::test]
async fn test_loop_runs_until_shutdown() {
    let app = app();
    let handle = app.handle();
    let task = tokio::spawn(app.run());

    handle
        .submit(Command::Apply(Operation::Remove {
            collection: CollectionName::Orders,
            id: "o-2".into(),
        }))
        .unwrap();
    handle.shutdown().unwrap();

    let app = task.await.unwrap();
    assert_eq!(app.tree().collection(CollectionName::Orders).len(), 2);
    assert_eq!(app.route("#/produto/102").label(), "product_detail");
    assert!(matches!(app.route("#/produto/7"), View::ProductNotFound(7)));
}
