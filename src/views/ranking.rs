//! Rankings: top-N aggregation and leaderboards.
//!
//! Both rankings are stable: entries with equal weight keep the order in which
//! they were first encountered in the source collection.

use crate::records::Participant;
use crate::store::{Collection, EntityId, Record};
use crate::views::aggregates::decode_orders;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use tracing::debug;

/// Aggregate `weight` per `key` over `items`, sort descending by total weight and
/// keep the first `n`. Keys tie-break by first appearance.
pub fn top_n<T, K, W>(
    items: impl IntoIterator<Item = T>,
    n: usize,
    key: impl Fn(&T) -> K,
    weight: W,
) -> Vec<(K, f64)>
where
    K: Eq + Hash,
    W: Fn(&T) -> f64,
{
    let mut totals: IndexMap<K, f64> = IndexMap::new();
    for item in items {
        *totals.entry(key(&item)).or_insert(0.0) += weight(&item);
    }
    let mut ranked: Vec<(K, f64)> = totals.into_iter().collect();
    // sort_by is stable: equal totals keep insertion order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub product_id: EntityId,
    /// Name from the first order line that referenced the product.
    pub name: String,
    pub quantity: u64,
}

/// Products ranked by quantity sold. Lines of orders in `cancelled_status` are not
/// sales and do not count, matching [`revenue_summary`](super::aggregates::revenue_summary).
pub fn top_products(orders: &Collection, n: usize, cancelled_status: &str) -> Vec<RankedProduct> {
    let lines: Vec<_> = decode_orders(orders)
        .into_iter()
        .filter(|order| !order.has_status(cancelled_status))
        .flat_map(|order| order.items)
        .collect();

    let mut names: IndexMap<EntityId, String> = IndexMap::new();
    for line in &lines {
        names
            .entry(line.product_id.clone())
            .or_insert_with(|| line.name.clone());
    }

    top_n(
        lines.iter(),
        n,
        |line| line.product_id.clone(),
        |line| f64::from(line.quantity),
    )
    .into_iter()
    .map(|(product_id, quantity)| RankedProduct {
        name: names.get(&product_id).cloned().unwrap_or_default(),
        product_id,
        quantity: quantity as u64,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: EntityId,
    pub name: String,
    pub points: i64,
}

/// Participants sorted by points descending, ties in collection order, one page long.
pub fn leaderboard(participants: &Collection, page_size: usize) -> Vec<LeaderboardEntry> {
    let mut members: Vec<Participant> = participants
        .iter()
        .filter_map(|entity| match Participant::from_entity(entity) {
            Ok(member) => Some(member),
            Err(e) => {
                debug!(id = %entity.id, error = %e, "Skipping undecodable participant");
                None
            }
        })
        .collect();
    members.sort_by(|a, b| b.points.cmp(&a.points));
    members
        .into_iter()
        .take(page_size)
        .enumerate()
        .map(|(index, member)| LeaderboardEntry {
            rank: index + 1,
            id: member.id,
            name: member.name,
            points: member.points,
        })
        .collect()
}
