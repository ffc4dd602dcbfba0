//! Collection Store operations
//!
//! Every operation takes the current tree by reference and returns the next tree.
//! The input tree is never modified; collections the operation does not touch keep
//! their identity in the result.

use crate::cart::ProductSnapshot;
use crate::error::StoreError;
use crate::store::collection::{CollectionName, InsertPolicy};
use crate::store::entity::{Entity, EntityId, Record};
use crate::tree::{Singleton, StateTree};
use serde_json::{Map, Value};

impl StateTree {
    /// Replace the entity with the same id in place, or insert it per `policy`.
    pub fn upsert(&self, name: CollectionName, entity: Entity, policy: InsertPolicy) -> StateTree {
        let next = self.collection(name).upserted(entity, policy);
        self.with_collection(name, next)
    }

    /// Typed upsert using the record's collection and that collection's default policy.
    pub fn upsert_record<R: Record>(&self, record: &R) -> Result<StateTree, StoreError> {
        self.upsert_record_with(record, R::COLLECTION.insert_policy())
    }

    pub fn upsert_record_with<R: Record>(
        &self,
        record: &R,
        policy: InsertPolicy,
    ) -> Result<StateTree, StoreError> {
        Ok(self.upsert(R::COLLECTION, record.to_entity()?, policy))
    }

    /// Remove the entity if present. An absent id returns an unmodified copy.
    pub fn remove(&self, name: CollectionName, id: &EntityId) -> StateTree {
        match self.collection(name).without(id) {
            Some(next) => self.with_collection(name, next),
            None => self.clone(),
        }
    }

    /// Read-modify-upsert of a single field.
    pub fn toggle_field(
        &self,
        name: CollectionName,
        id: &EntityId,
        field: &str,
        value: Value,
    ) -> Result<StateTree, StoreError> {
        let mut patch = Map::new();
        patch.insert(field.to_string(), value);
        self.merge_fields(name, id, patch)
    }

    /// Shallow-merge `fields` into the entity as it exists in this tree.
    /// An absent id returns an unmodified copy.
    pub fn merge_fields(
        &self,
        name: CollectionName,
        id: &EntityId,
        fields: Map<String, Value>,
    ) -> Result<StateTree, StoreError> {
        if fields.contains_key("id") {
            return Err(StoreError::IdentityField {
                collection: name,
                id: id.clone(),
            });
        }
        let Some(current) = self.collection(name).get(id) else {
            return Ok(self.clone());
        };
        let merged = current.merged(&fields);
        Ok(self.upsert(name, merged, name.insert_policy()))
    }

    /// Full replacement of a root singleton.
    pub fn replace_singleton(&self, singleton: Singleton) -> StateTree {
        self.with_singleton(singleton)
    }

    pub fn add_to_cart(
        &self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<StateTree, StoreError> {
        let cart = self.cart().add(product, quantity)?;
        Ok(self.with_singleton(Singleton::Cart(cart)))
    }

    pub fn set_cart_quantity(&self, product_id: &EntityId, quantity: i64) -> StateTree {
        if self.cart().line(product_id).is_none() {
            return self.clone();
        }
        let cart = self.cart().set_quantity(product_id, quantity);
        self.with_singleton(Singleton::Cart(cart))
    }

    pub fn remove_from_cart(&self, product_id: &EntityId) -> StateTree {
        if self.cart().line(product_id).is_none() {
            return self.clone();
        }
        let cart = self.cart().remove(product_id);
        self.with_singleton(Singleton::Cart(cart))
    }

    pub fn clear_cart(&self) -> StateTree {
        if self.cart().is_empty() {
            return self.clone();
        }
        self.with_singleton(Singleton::Cart(self.cart().cleared()))
    }
}
