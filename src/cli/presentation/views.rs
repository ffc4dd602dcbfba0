//! Derived view presentation.

use super::shared::{format_section_heading, money};
use crate::store::Entity;
use crate::views::{KpiSnapshot, LeaderboardEntry, RankedProduct, RevenueSummary};
use comfy_table::Table;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ViewsReport {
    pub revenue: RevenueSummary,
    pub kpis: KpiSnapshot,
    pub top_products: Vec<RankedProduct>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub active_banners: Vec<Entity>,
}

pub fn format_views_text(report: &ViewsReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", format_section_heading("Revenue")));
    out.push_str(&format!(
        "  Total: {}  Orders: {}  Cancelled: {}  Average ticket: {}\n",
        money(report.revenue.total_revenue),
        report.revenue.qualifying_orders,
        report.revenue.cancelled_orders,
        money(report.revenue.average_ticket)
    ));

    out.push_str(&format!("\n{}\n", format_section_heading("KPIs")));
    let kpis = &report.kpis;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    for (metric, value) in [
        ("Orders", kpis.order_count),
        ("Pending orders", kpis.pending_orders),
        ("Active campaigns", kpis.active_campaigns),
        ("Customers", kpis.customers),
        ("Open tickets", kpis.open_tickets),
        ("Low-stock products", kpis.low_stock_products),
    ] {
        table.add_row(vec![metric.to_string(), value.to_string()]);
    }
    out.push_str(&format!("{}\n", table));

    out.push_str(&format!("\n{}\n", format_section_heading("Top products")));
    if report.top_products.is_empty() {
        out.push_str("  No order lines.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["#", "Product", "Name", "Quantity"]);
        for (index, product) in report.top_products.iter().enumerate() {
            table.add_row(vec![
                (index + 1).to_string(),
                product.product_id.to_string(),
                product.name.clone(),
                product.quantity.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    out.push_str(&format!("\n{}\n", format_section_heading("Leaderboard")));
    if report.leaderboard.is_empty() {
        out.push_str("  No participants.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Rank", "Name", "Points"]);
        for entry in &report.leaderboard {
            table.add_row(vec![
                entry.rank.to_string(),
                entry.name.clone(),
                entry.points.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    out.push_str(&format!(
        "\nActive banners: {}",
        report.active_banners.len()
    ));
    out
}
