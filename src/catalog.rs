//! Storefront catalog: typed products and the flattened product collection.

use crate::store::{CollectionName, EntityId, Record};
use crate::tree::StateTree;
use crate::types::ProductNumber;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category: Option<EntityId>,
}

impl Record for Product {
    const COLLECTION: CollectionName = CollectionName::FeaturedProducts;

    fn entity_id(&self) -> EntityId {
        self.id.clone()
    }
}

/// Every product-section collection concatenated in section order.
///
/// Entities that do not decode as products are skipped.
pub fn flatten_products(tree: &StateTree) -> Vec<Product> {
    CollectionName::PRODUCT_SECTIONS
        .iter()
        .flat_map(|section| section_products(tree, *section))
        .collect()
}

fn section_products(tree: &StateTree, section: CollectionName) -> Vec<Product> {
    tree.collection(section)
        .iter()
        .filter_map(|entity| match Product::from_entity(entity) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(collection = %section, id = %entity.id, error = %e, "Skipping undecodable product");
                None
            }
        })
        .collect()
}

/// First product with the given numeric id across all sections. Negative ids never
/// match.
pub fn find_product(tree: &StateTree, id: ProductNumber) -> Option<Product> {
    let wanted = EntityId::Numeric(u64::try_from(id).ok()?);
    CollectionName::PRODUCT_SECTIONS.iter().find_map(|section| {
        tree.collection(*section)
            .get(&wanted)
            .and_then(|entity| Product::from_entity(entity).ok())
    })
}
