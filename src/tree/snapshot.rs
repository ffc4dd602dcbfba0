//! Initial snapshot loading
//!
//! The tree is populated exactly once from a static JSON snapshot. Keys of the
//! snapshot object are singleton names or collection names; collections missing from
//! the snapshot start empty. Anything malformed fails the whole load.

use crate::cart::Cart;
use crate::error::SnapshotError;
use crate::store::{Collection, CollectionName, Entity};
use crate::tree::singleton::{
    CurrentUser, SecuritySettings, Singleton, SiteIdentity, Theme, Typography,
};
use crate::tree::{hasher, StateTree};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// One-shot source of the initial tree.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Human-readable origin, used in logs and not-ready messages.
    fn describe(&self) -> String;

    async fn read(&self) -> Result<String, SnapshotError>;

    async fn load(&self) -> Result<StateTree, SnapshotError> {
        let started = Instant::now();
        let raw = self.read().await?;
        let tree = parse_snapshot(&raw)?;
        info!(
            source = %self.describe(),
            collections = tree.populated().count(),
            fingerprint = %hasher::fingerprint(&tree),
            duration_ms = started.elapsed().as_millis() as u64,
            "Snapshot loaded"
        );
        Ok(tree)
    }
}

/// Snapshot read from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    pub path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshot {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Result<String, SnapshotError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SnapshotError::Read {
                path: self.path.clone(),
                source,
            })
    }
}

/// Snapshot held in memory, e.g. bundled with the binary or built by tests.
#[derive(Debug, Clone)]
pub struct InlineSnapshot {
    raw: String,
}

impl InlineSnapshot {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl SnapshotSource for InlineSnapshot {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    async fn read(&self) -> Result<String, SnapshotError> {
        Ok(self.raw.clone())
    }
}

/// Parse snapshot text into a complete tree.
#[instrument(skip(raw), fields(bytes = raw.len()))]
pub fn parse_snapshot(raw: &str) -> Result<StateTree, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    from_value(value)
}

/// Build a complete tree from a snapshot-shaped JSON value.
pub fn from_value(value: Value) -> Result<StateTree, SnapshotError> {
    let Value::Object(mut root) = value else {
        return Err(SnapshotError::NotAnObject);
    };

    let mut tree = StateTree::empty();

    if let Some(theme) = take::<Theme>(&mut root, "theme")? {
        tree = tree.with_singleton(Singleton::Theme(theme));
    }
    if let Some(typography) = take::<Typography>(&mut root, "typography")? {
        tree = tree.with_singleton(Singleton::Typography(typography));
    }
    if let Some(site) = take::<SiteIdentity>(&mut root, "site")? {
        tree = tree.with_singleton(Singleton::Site(site));
    }
    if let Some(security) = take::<SecuritySettings>(&mut root, "security")? {
        tree = tree.with_singleton(Singleton::Security(security));
    }
    if let Some(user) = take::<Option<CurrentUser>>(&mut root, "currentUser")? {
        tree = tree.with_singleton(Singleton::CurrentUser(user));
    }
    if let Some(cart) = take::<Cart>(&mut root, "cart")? {
        tree = tree.with_singleton(Singleton::Cart(cart));
    }
    if let Some(markup) = take::<String>(&mut root, "injectedMarkup")? {
        tree = tree.with_singleton(Singleton::InjectedMarkup(markup));
    }

    for (key, value) in root {
        let name: CollectionName = key.parse()?;
        let collection = parse_collection(name, value)?;
        debug!(collection = %name, entities = collection.len(), "Collection loaded");
        tree = tree.with_collection(name, collection);
    }

    Ok(tree)
}

fn take<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    field: &str,
) -> Result<Option<T>, SnapshotError> {
    match root.remove(field) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| SnapshotError::MalformedField {
                field: field.to_string(),
                message: e.to_string(),
            }),
    }
}

fn parse_collection(name: CollectionName, value: Value) -> Result<Collection, SnapshotError> {
    let Value::Array(items) = value else {
        return Err(SnapshotError::MalformedField {
            field: name.as_str().to_string(),
            message: "expected an array of entities".to_string(),
        });
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut entities = Vec::with_capacity(items.len());
    for item in items {
        let entity = Entity::from_value(item).map_err(|e| SnapshotError::MalformedField {
            field: name.as_str().to_string(),
            message: e.to_string(),
        })?;
        if !seen.insert(entity.id.clone()) {
            return Err(SnapshotError::DuplicateId {
                collection: name,
                id: entity.id,
            });
        }
        entities.push(entity);
    }
    Ok(Collection::new(entities))
}
