//! Entity Collection Store
//!
//! Owns the current [`StateTree`] and publishes every new version on a watch
//! channel. Mutations are expressed as [`Operation`]s and applied all-or-nothing:
//! a failing operation leaves the published tree untouched.

pub mod collection;
pub mod entity;
pub mod ops;

pub use collection::{Collection, CollectionName, IdentityScheme, InsertPolicy};
pub use entity::{Entity, EntityId, Record};

use crate::cart::ProductSnapshot;
use crate::error::StoreError;
use crate::tree::{Singleton, StateTree};
use crate::types::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, trace};

/// A single unit of change applied to the latest tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Upsert {
        collection: CollectionName,
        entity: Entity,
        /// Falls back to the collection's default policy.
        #[serde(default)]
        policy: Option<InsertPolicy>,
    },
    Remove {
        collection: CollectionName,
        id: EntityId,
    },
    ToggleField {
        collection: CollectionName,
        id: EntityId,
        field: String,
        value: Value,
    },
    MergeFields {
        collection: CollectionName,
        id: EntityId,
        fields: Map<String, Value>,
    },
    ReplaceSingleton {
        singleton: Singleton,
    },
    AddToCart {
        product: ProductSnapshot,
        quantity: u32,
    },
    SetCartQuantity {
        product_id: EntityId,
        quantity: i64,
    },
    RemoveFromCart {
        product_id: EntityId,
    },
    ClearCart,
}

impl Operation {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Upsert { .. } => "upsert",
            Operation::Remove { .. } => "remove",
            Operation::ToggleField { .. } => "toggle_field",
            Operation::MergeFields { .. } => "merge_fields",
            Operation::ReplaceSingleton { .. } => "replace_singleton",
            Operation::AddToCart { .. } => "add_to_cart",
            Operation::SetCartQuantity { .. } => "set_cart_quantity",
            Operation::RemoveFromCart { .. } => "remove_from_cart",
            Operation::ClearCart => "clear_cart",
        }
    }

    /// Apply to `tree`, producing the next tree.
    pub fn apply_to(self, tree: &StateTree) -> Result<StateTree, StoreError> {
        match self {
            Operation::Upsert {
                collection,
                entity,
                policy,
            } => {
                let policy = policy.unwrap_or_else(|| collection.insert_policy());
                Ok(tree.upsert(collection, entity, policy))
            }
            Operation::Remove { collection, id } => Ok(tree.remove(collection, &id)),
            Operation::ToggleField {
                collection,
                id,
                field,
                value,
            } => tree.toggle_field(collection, &id, &field, value),
            Operation::MergeFields {
                collection,
                id,
                fields,
            } => tree.merge_fields(collection, &id, fields),
            Operation::ReplaceSingleton { singleton } => Ok(tree.replace_singleton(singleton)),
            Operation::AddToCart { product, quantity } => tree.add_to_cart(product, quantity),
            Operation::SetCartQuantity {
                product_id,
                quantity,
            } => Ok(tree.set_cart_quantity(&product_id, quantity)),
            Operation::RemoveFromCart { product_id } => Ok(tree.remove_from_cart(&product_id)),
            Operation::ClearCart => Ok(tree.clear_cart()),
        }
    }
}

/// A tree version as seen by subscribers.
#[derive(Debug, Clone)]
pub struct Published {
    pub version: Version,
    pub tree: Arc<StateTree>,
}

/// Owner of the current tree.
///
/// Whoever calls [`Store::apply`] produces the next version; every subscriber sees
/// the replacement as soon as it is published.
pub struct Store {
    sender: watch::Sender<Published>,
}

impl Store {
    /// Publish `tree` as version 1.
    pub fn new(tree: StateTree) -> Self {
        let (sender, _) = watch::channel(Published {
            version: 1,
            tree: Arc::new(tree),
        });
        Self { sender }
    }

    /// Latest published version.
    pub fn current(&self) -> Published {
        self.sender.borrow().clone()
    }

    pub fn tree(&self) -> Arc<StateTree> {
        Arc::clone(&self.sender.borrow().tree)
    }

    pub fn version(&self) -> Version {
        self.sender.borrow().version
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.sender.subscribe()
    }

    /// Apply one operation against the latest tree and publish the result.
    ///
    /// Operations that leave the tree unchanged do not create a new version.
    pub fn apply(&self, operation: Operation) -> Result<Published, StoreError> {
        let current = self.current();
        let kind = operation.kind();
        let next = operation.apply_to(&current.tree)?;

        if next.same_storage(&current.tree) {
            trace!(op = kind, version = current.version, "Operation left tree unchanged");
            return Ok(current);
        }

        let published = Published {
            version: current.version + 1,
            tree: Arc::new(next),
        };
        self.sender.send_replace(published.clone());
        debug!(op = kind, version = published.version, "Tree published");
        Ok(published)
    }

    /// Apply a batch in order, stopping at the first failure. Operations before the
    /// failing one stay applied; the failing one has no effect.
    pub fn apply_all(
        &self,
        operations: impl IntoIterator<Item = Operation>,
    ) -> Result<Published, StoreError> {
        let mut last = self.current();
        for operation in operations {
            last = self.apply(operation)?;
        }
        Ok(last)
    }
}
