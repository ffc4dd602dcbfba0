//! Aggregate views: revenue, KPI rollups and flag filters.

use crate::records::Order;
use crate::store::{Collection, CollectionName, Entity, Record};
use crate::tree::StateTree;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RevenueSummary {
    /// Σ total over orders not in the cancelled status.
    pub total_revenue: f64,
    pub qualifying_orders: usize,
    pub cancelled_orders: usize,
    /// `total_revenue / qualifying_orders`, or 0 with no qualifying orders.
    pub average_ticket: f64,
}

/// Orders that decode; the rest are skipped.
pub fn decode_orders(orders: &Collection) -> Vec<Order> {
    orders
        .iter()
        .filter_map(|entity| match Order::from_entity(entity) {
            Ok(order) => Some(order),
            Err(e) => {
                debug!(id = %entity.id, error = %e, "Skipping undecodable order");
                None
            }
        })
        .collect()
}

pub fn revenue_summary(orders: &Collection, cancelled_status: &str) -> RevenueSummary {
    let mut summary = RevenueSummary::default();
    for order in decode_orders(orders) {
        if order.has_status(cancelled_status) {
            summary.cancelled_orders += 1;
        } else {
            summary.qualifying_orders += 1;
            summary.total_revenue += order.total;
        }
    }
    summary.average_ticket = if summary.qualifying_orders == 0 {
        0.0
    } else {
        summary.total_revenue / summary.qualifying_orders as f64
    };
    summary
}

/// Entities whose boolean `flag` field is true, in collection order.
pub fn active_entities(collection: &Collection, flag: &str) -> Vec<Entity> {
    collection
        .iter()
        .filter(|e| e.get_bool(flag).unwrap_or(false))
        .cloned()
        .collect()
}

/// Count of entities whose `field` equals `value` (case-insensitive).
pub fn count_with_status(collection: &Collection, field: &str, value: &str) -> usize {
    collection
        .iter()
        .filter(|e| {
            e.get_str(field)
                .map(|s| s.eq_ignore_ascii_case(value))
                .unwrap_or(false)
        })
        .count()
}

/// Dashboard KPI rollup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub revenue: RevenueSummary,
    pub order_count: usize,
    pub pending_orders: usize,
    pub active_campaigns: usize,
    pub customers: usize,
    pub open_tickets: usize,
    pub low_stock_products: usize,
}

/// Inputs the KPI rollup reads, in memo-key order.
pub const KPI_INPUTS: &[CollectionName] = &[
    CollectionName::Orders,
    CollectionName::Campaigns,
    CollectionName::Customers,
    CollectionName::SupportTickets,
    CollectionName::FeaturedProducts,
    CollectionName::BestSellers,
    CollectionName::NewArrivals,
    CollectionName::Offers,
];

pub fn kpi_rollup(tree: &StateTree, cancelled_status: &str, low_stock_threshold: i64) -> KpiSnapshot {
    let orders = tree.collection(CollectionName::Orders);
    let low_stock_products = crate::catalog::flatten_products(tree)
        .iter()
        .filter(|p| p.stock.map(|s| s <= low_stock_threshold).unwrap_or(false))
        .count();

    KpiSnapshot {
        revenue: revenue_summary(orders, cancelled_status),
        order_count: orders.len(),
        pending_orders: count_with_status(orders, "status", "pending"),
        active_campaigns: count_with_status(
            tree.collection(CollectionName::Campaigns),
            "status",
            "active",
        ),
        customers: tree.collection(CollectionName::Customers).len(),
        open_tickets: count_with_status(
            tree.collection(CollectionName::SupportTickets),
            "status",
            "open",
        ),
        low_stock_products,
    }
}
