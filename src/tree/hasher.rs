//! Tree fingerprints using BLAKE3
//!
//! A fingerprint identifies a tree by value: two trees with equal content produce
//! the same fingerprint regardless of how they were built.

use crate::store::{Collection, CollectionName};
use crate::tree::StateTree;
use blake3::Hasher;
use serde_json::Value;

pub type Digest = [u8; 32];

/// Digest of one collection.
///
/// digest = hash("collection" || name_len || name || count || entity_json*)
pub fn collection_digest(name: CollectionName, collection: &Collection) -> Digest {
    let mut hasher = Hasher::new();

    hasher.update(b"collection");

    let name_bytes = name.as_str().as_bytes();
    hasher.update(&(name_bytes.len() as u64).to_be_bytes());
    hasher.update(name_bytes);

    hasher.update(&(collection.len() as u64).to_be_bytes());

    for entity in collection {
        update_json(&mut hasher, &entity.to_value());
    }

    *hasher.finalize().as_bytes()
}

/// Digest of a whole tree: singletons first, then every collection in declaration order.
pub fn tree_digest(tree: &StateTree) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(b"tree");

    let root = tree.to_value();
    for key in crate::tree::SINGLETON_KEYS {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        update_json(&mut hasher, &root[*key]);
    }

    for name in CollectionName::ALL {
        hasher.update(&collection_digest(*name, tree.collection(*name)));
    }

    *hasher.finalize().as_bytes()
}

/// Hex-encoded tree digest.
pub fn fingerprint(tree: &StateTree) -> String {
    hex::encode(tree_digest(tree))
}

fn update_json(hasher: &mut Hasher, value: &Value) {
    // serde_json maps are key-sorted, so the encoding is canonical
    let encoded = value.to_string();
    hasher.update(&(encoded.len() as u64).to_be_bytes());
    hasher.update(encoded.as_bytes());
}
