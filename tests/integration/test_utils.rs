//! Shared fixtures for integration tests

use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use vitrine::tree::snapshot::from_value;
use vitrine::StateTree;

/// Snapshot document with a small catalog, orders, members and theming.
pub fn storefront_document() -> serde_json::Value {
    json!({
        "theme": {"primary": "#1d3557", "accent": "#e63946"},
        "typography": {"fontSize": 17, "fontFamily": "Lora, serif"},
        "site": {"name": "Loja Aurora", "favicon": "/assets/favicon.png"},
        "injectedMarkup": "<meta name=\"robots\" content=\"index\">",
        "featuredProducts": [
            {"id": 101, "name": "Caneca", "price": 10.0, "stock": 2},
            {"id": 102, "name": "Camiseta", "price": 15.0, "stock": 40}
        ],
        "offers": [
            {"id": 42, "name": "Boné", "price": 29.9, "description": "Aba curva"}
        ],
        "banners": [
            {"id": 1, "title": "Verão", "active": true},
            {"id": 2, "title": "Inverno", "active": false}
        ],
        "orders": [
            {"id": "o-1", "status": "paid", "total": 35.0,
             "items": [{"productId": 101, "name": "Caneca", "quantity": 2, "price": 10.0},
                       {"productId": 102, "name": "Camiseta", "quantity": 1, "price": 15.0}]},
            {"id": "o-2", "status": "cancelled", "total": 99.0,
             "items": [{"productId": 42, "name": "Boné", "quantity": 9, "price": 11.0}]},
            {"id": "o-3", "status": "pending", "total": 45.0,
             "items": [{"productId": 102, "name": "Camiseta", "quantity": 3, "price": 15.0}]}
        ],
        "loyaltyMembers": [
            {"id": "m-1", "name": "Ana", "points": 120},
            {"id": "m-2", "name": "Bruno", "points": 300},
            {"id": "m-3", "name": "Carla", "points": 120}
        ]
    })
}

pub fn storefront_tree() -> StateTree {
    from_value(storefront_document()).unwrap()
}

/// Temporary workspace with the storefront snapshot at data/snapshot.json.
pub fn storefront_workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    let snapshot = data.join("snapshot.json");
    std::fs::write(
        &snapshot,
        serde_json::to_string_pretty(&storefront_document()).unwrap(),
    )
    .unwrap();
    (dir, snapshot)
}
