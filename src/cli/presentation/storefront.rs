//! Storefront presentation: routing, projection and generation results.

use super::shared::{format_section_heading, money};
use crate::catalog::Product;
use crate::projection::MemoryEnvironment;
use crate::router::{Route, View};
use crate::store::Operation;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub fragment: String,
    pub route: Route,
    pub canonical: String,
    pub view: &'static str,
    pub product: Option<Product>,
}

impl RouteReport {
    pub fn new(fragment: &str, route: Route, canonical: String, view: View) -> Self {
        let label = view.label();
        let product = match view {
            View::ProductDetail(product) => Some(product),
            View::Home | View::ProductNotFound(_) => None,
        };
        Self {
            fragment: fragment.to_string(),
            route,
            canonical,
            view: label,
            product,
        }
    }
}

pub fn format_route_text(report: &RouteReport) -> String {
    let mut out = format!(
        "{} -> {} ({})",
        report.fragment, report.view, report.canonical
    );
    match (&report.route, &report.product) {
        (_, Some(product)) => {
            out.push_str(&format!(
                "\n  {} #{}  {}",
                product.name.bold(),
                product.id,
                money(product.price)
            ));
            if let Some(description) = &product.description {
                out.push_str(&format!("\n  {}", description));
            }
        }
        (Route::ProductDetail(id), None) => {
            out.push_str(&format!("\n  {}", format!("Product {} not found", id).yellow()));
        }
        (Route::Home, None) => {}
    }
    out
}

pub fn format_projection_text(environment: &MemoryEnvironment) -> String {
    let mut out = format!("{}\n", format_section_heading("Projection"));
    out.push_str(&environment.to_css());
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    pub target: String,
    pub provider: String,
    pub operation: Operation,
    pub version: u64,
}

pub fn format_generate_text(report: &GenerateReport) -> String {
    let body = match &report.operation {
        Operation::MergeFields { fields, .. } => fields
            .values()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Operation::Upsert { entity, .. } => entity.get_str("body").unwrap_or_default().to_string(),
        other => other.kind().to_string(),
    };
    format!(
        "{} {} via {} (version {})\n\n{}",
        "Generated".green(),
        report.target,
        report.provider,
        report.version,
        body
    )
}
