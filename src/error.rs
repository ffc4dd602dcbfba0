//! Error types for the Vitrine storefront state core.
//!
//! Structural failures (a malformed operation) surface as [`StoreError`]; snapshot load
//! failures as [`SnapshotError`]; everything the outer layers see is an [`ApiError`].
//! Missing data (a dangling product id, an empty collection) is never an error.

use crate::store::{CollectionName, EntityId};
use std::path::PathBuf;
use thiserror::Error;

/// Store-level errors: the operation is malformed and the tree is left untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid cart quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: EntityId, quantity: i64 },

    #[error("Field 'id' of {collection} entity {id} cannot be merged")]
    IdentityField {
        collection: CollectionName,
        id: EntityId,
    },

    #[error("Entity is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("Record encoding failed for {collection}: {message}")]
    RecordEncoding {
        collection: CollectionName,
        message: String,
    },
}

/// Initial snapshot load errors. Any of these leaves the application not ready.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot read failed for {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot root must be a JSON object")]
    NotAnObject,

    #[error("Snapshot field '{field}' is malformed: {message}")]
    MalformedField { field: String, message: String },

    #[error("Snapshot collection '{collection}' contains duplicate id {id}")]
    DuplicateId {
        collection: CollectionName,
        id: EntityId,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top-level errors for the runtime, CLI and provider integration.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Application is not ready: {0}")]
    NotReady(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Unsupported content kind for provider {provider}: {kind}")]
    UnsupportedContent { provider: String, kind: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
