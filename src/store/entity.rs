//! Entities and their identity keys.

use crate::error::StoreError;
use crate::store::collection::{CollectionName, IdentityScheme};
use crate::types::LegacyClock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identity key of an entity within its collection.
///
/// Serialized untagged: JSON numbers are legacy numeric ids, JSON strings are opaque keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(u64),
    Key(String),
}

impl EntityId {
    /// Fresh globally-unique opaque key.
    pub fn generate() -> Self {
        EntityId::Key(uuid::Uuid::new_v4().to_string())
    }

    /// Legacy numeric id read from the monotonic millisecond clock.
    pub fn legacy() -> Self {
        EntityId::Numeric(LegacyClock::global().next())
    }

    /// Fresh id using the identity scheme the collection's external format requires.
    pub fn issue_for(collection: CollectionName) -> Self {
        match collection.identity_scheme() {
            IdentityScheme::Opaque => Self::generate(),
            IdentityScheme::LegacyNumeric => Self::legacy(),
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            EntityId::Numeric(n) => Some(*n),
            EntityId::Key(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(n) => write!(f, "{}", n),
            EntityId::Key(k) => f.write_str(k),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Numeric(n)
    }
}

impl From<&str> for EntityId {
    fn from(key: &str) -> Self {
        EntityId::Key(key.to_string())
    }
}

impl From<String> for EntityId {
    fn from(key: String) -> Self {
        EntityId::Key(key)
    }
}

/// An identified record: identity key plus a heterogeneous JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

    /// Shallow-merged copy: every key in `patch` replaces the same key in the body.
    /// The identity key is not part of the body and never changes.
    pub fn merged(&self, patch: &Map<String, Value>) -> Entity {
        let mut fields = self.fields.clone();
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        Entity {
            id: self.id.clone(),
            fields,
        }
    }

    /// Parse an entity from an arbitrary JSON value.
    pub fn from_value(value: Value) -> Result<Entity, StoreError> {
        if !value.is_object() {
            return Err(StoreError::NotAnObject(value.to_string()));
        }
        serde_json::from_value(value).map_err(|e| StoreError::NotAnObject(e.to_string()))
    }

    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(
            "id".to_string(),
            serde_json::to_value(&self.id).unwrap_or(Value::Null),
        );
        Value::Object(object)
    }
}

/// A strongly typed view of the entities in one collection.
///
/// Records round-trip through [`Entity`] with serde, so the tree stays a single
/// heterogeneous document while call sites work with concrete types.
pub trait Record: Serialize + DeserializeOwned {
    /// Collection this record kind lives in.
    const COLLECTION: CollectionName;

    fn entity_id(&self) -> EntityId;

    fn to_entity(&self) -> Result<Entity, StoreError> {
        let value = serde_json::to_value(self).map_err(|e| StoreError::RecordEncoding {
            collection: Self::COLLECTION,
            message: e.to_string(),
        })?;
        Entity::from_value(value)
    }

    fn from_entity(entity: &Entity) -> Result<Self, StoreError> {
        serde_json::from_value(entity.to_value()).map_err(|e| StoreError::RecordEncoding {
            collection: Self::COLLECTION,
            message: e.to_string(),
        })
    }
}
