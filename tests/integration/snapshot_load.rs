//! Loading the initial tree from snapshot files

use super::test_utils::{storefront_document, storefront_workspace};
use tempfile::TempDir;
use vitrine::router::FragmentRouter;
use vitrine::store::CollectionName;
use vitrine::tree::{FileSnapshot, SnapshotSource};
use vitrine::views::ViewsConfig;
use vitrine::{App, Shell, SnapshotError};

async fn boot(source: &FileSnapshot) -> Shell {
    App::boot(source, ViewsConfig::default(), FragmentRouter::default()).await
}

fn write_snapshot(raw: &str) -> (TempDir, FileSnapshot) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, raw).unwrap();
    (dir, FileSnapshot::new(path))
}

#[tokio::test]
async fn test_file_snapshot_boots_ready() {
    let (_dir, path) = storefront_workspace();
    let shell = boot(&FileSnapshot::new(path)).await;
    assert!(shell.is_ready());
    let app = shell.into_app().unwrap();
    assert_eq!(app.store().version(), 1);
    assert_eq!(app.tree().collection(CollectionName::Orders).len(), 3);
    assert_eq!(app.tree().site().name, "Loja Aurora");
}

#[tokio::test]
async fn test_missing_file_not_ready() {
    let dir = TempDir::new().unwrap();
    let source = FileSnapshot::new(dir.path().join("absent.json"));
    assert!(matches!(
        source.load().await.unwrap_err(),
        SnapshotError::Read { .. }
    ));
    match boot(&source).await {
        Shell::NotReady { reason } => assert!(reason.contains("absent.json")),
        Shell::Ready(_) => panic!("expected not ready"),
    }
}

#[tokio::test]
async fn test_invalid_json_not_ready() {
    let (_dir, source) = write_snapshot("{\"orders\": [");
    assert!(!boot(&source).await.is_ready());
}

#[tokio::test]
async fn test_duplicate_id_not_ready() {
    let (_dir, source) = write_snapshot(r#"{"offers": [{"id": 5, "name": "A"}, {"id": 5, "name": "B"}]}"#);
    assert!(matches!(
        source.load().await.unwrap_err(),
        SnapshotError::DuplicateId { .. }
    ));
}

#[tokio::test]
async fn test_zero_quantity_cart_line_not_ready() {
    let mut document = storefront_document();
    document["cart"] = serde_json::json!({
        "lines": [{"productId": 101, "name": "Caneca", "price": 10.0, "quantity": 0}]
    });
    let (_dir, source) = write_snapshot(&document.to_string());
    assert!(matches!(
        source.load().await.unwrap_err(),
        SnapshotError::MalformedField { ref field, .. } if field == "cart"
    ));
}

#[tokio::test]
async fn test_saved_cart_restored() {
    let mut document = storefront_document();
    document["cart"] = serde_json::json!({
        "lines": [{"productId": 102, "name": "Camiseta", "price": 15.0, "quantity": 2}]
    });
    let (_dir, source) = write_snapshot(&document.to_string());
    let tree = source.load().await.unwrap();
    assert_eq!(tree.cart().subtotal(), 30.0);
}

#[tokio::test]
async fn test_duplicate_cart_product_not_ready() {
    let mut document = storefront_document();
    document["cart"] = serde_json::json!({
        "lines": [
            {"productId": 101, "name": "Caneca", "price": 20.0, "quantity": 1},
            {"productId": 101, "name": "Caneca", "price": 20.0, "quantity": 2}
        ]
    });
    let (_dir, source) = write_snapshot(&document.to_string());
    assert!(matches!(
        source.load().await.unwrap_err(),
        SnapshotError::MalformedField { ref field, .. } if field == "cart"
    ));
    match boot(&source).await {
        Shell::NotReady { reason } => assert!(reason.contains("duplicate cart line")),
        Shell::Ready(_) => panic!("expected not ready"),
    }
}
