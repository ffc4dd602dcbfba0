//! Layered configuration loading

use std::sync::Mutex;
use tempfile::TempDir;
use vitrine::config::{ConfigLoader, ProviderType, VitrineConfig};
use vitrine::store::CollectionName;

// Loading reads the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn isolated_load(workspace: &TempDir, vars: &[(&str, &str)]) -> VitrineConfig {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let global = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", global.path());
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    let loaded = ConfigLoader::load(workspace.path());
    for (key, _) in vars {
        std::env::remove_var(key);
    }
    std::env::remove_var("XDG_CONFIG_HOME");
    loaded.unwrap()
}

#[test]
fn test_empty_workspace_uses_defaults() {
    let workspace = TempDir::new().unwrap();
    let config = isolated_load(&workspace, &[]);
    assert_eq!(config.views.top_n, 5);
    assert_eq!(config.router.product_marker, "produto");
    assert_eq!(config.generation.target_collection, CollectionName::GeneratedAssets);
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_with_providers() {
    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[snapshot]
path = "fixtures/shop.json"

[providers.remote]
provider_type = "open_ai_compatible"
model = "gpt-4o-mini"
base_url = "http://localhost:11434/v1"
api_key_env = "SHOP_AI_KEY"

[generation]
provider = "remote"
target_collection = "mediaLibrary"
max_tokens = 256
"#,
    )
    .unwrap();

    let config = isolated_load(&workspace, &[]);
    assert_eq!(
        config.snapshot.resolve(workspace.path()),
        workspace.path().join("fixtures/shop.json")
    );
    let remote = &config.providers["remote"];
    assert_eq!(remote.provider_type, ProviderType::OpenAiCompatible);
    assert_eq!(remote.model, "gpt-4o-mini");
    assert_eq!(config.generation.target_collection, CollectionName::MediaLibrary);
    assert_eq!(config.generation.max_tokens, Some(256));
    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_overrides_files() {
    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[router]\nproduct_marker = \"item\"\n").unwrap();

    let config = isolated_load(
        &workspace,
        &[
            ("VITRINE__ROUTER__PRODUCT_MARKER", "product"),
            ("VITRINE__VIEWS__TOP_N", "2"),
        ],
    );
    assert_eq!(config.router.product_marker, "product");
    assert_eq!(config.views.top_n, 2);
}

#[test]
fn test_invalid_values_fail_validation() {
    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[router]\nproduct_marker = \"a/b\"\n\n[logging]\nlevel = \"chatty\"\n",
    )
    .unwrap();

    let config = isolated_load(&workspace, &[]);
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}
