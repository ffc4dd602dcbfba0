//! Configuration System
//!
//! Layered configuration for the storefront core: derived-view tuning, router
//! marker, snapshot location, generation providers and logging. Sources merge from
//! built-in defaults up to environment variables; see [`ConfigLoader::load`].

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::CollectionName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use crate::provider::{ProviderConfig, ProviderType};
pub use crate::router::RouterConfig;
pub use crate::views::ViewsConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitrineConfig {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub router: RouterConfig,

    /// Generation providers by name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot file, relative to the workspace root unless absolute
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/snapshot.json")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

impl SnapshotConfig {
    pub fn resolve(&self, workspace_root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workspace_root.join(&self.path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider used by `generate` when none is named; the static generator when unset
    #[serde(default)]
    pub provider: Option<String>,

    /// Collection receiving generated assets
    #[serde(default = "default_target_collection")]
    pub target_collection: CollectionName,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

fn default_target_collection() -> CollectionName {
    CollectionName::GeneratedAssets
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: None,
            target_collection: default_target_collection(),
            max_tokens: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Provider(String, String),
    Views(String),
    Router(String),
    Generation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(name, msg) => write!(f, "Provider '{}': {}", name, msg),
            ValidationError::Views(msg) => write!(f, "Views: {}", msg),
            ValidationError::Router(msg) => write!(f, "Router: {}", msg),
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VitrineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (name, provider) in &self.providers {
            if let Err(e) = provider.validate() {
                errors.push(ValidationError::Provider(name.clone(), e));
            }
        }

        if let Err(e) = self.views.validate() {
            errors.push(ValidationError::Views(e));
        }
        if let Err(e) = self.router.validate() {
            errors.push(ValidationError::Router(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if let Some(provider) = &self.generation.provider {
            if !self.providers.contains_key(provider) {
                errors.push(ValidationError::Generation(format!(
                    "Unknown provider '{}'",
                    provider
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all errors into one [`ApiError::ConfigError`].
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
