//! Typed records for the collections the derived views aggregate.

use crate::store::{CollectionName, EntityId, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub customer_id: Option<EntityId>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Order {
    pub fn has_status(&self, status: &str) -> bool {
        self.status.eq_ignore_ascii_case(status)
    }
}

impl Record for Order {
    const COLLECTION: CollectionName = CollectionName::Orders;

    fn entity_id(&self) -> EntityId {
        self.id.clone()
    }
}

/// Loyalty program member ranked by points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub points: i64,
}

impl Record for Participant {
    const COLLECTION: CollectionName = CollectionName::LoyaltyMembers;

    fn entity_id(&self) -> EntityId {
        self.id.clone()
    }
}
