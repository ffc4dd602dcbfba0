//! Tree presentation: inspect and apply results.

use super::shared::{format_section_heading, money};
use crate::runtime::Notice;
use crate::store::{CollectionName, IdentityScheme, InsertPolicy, Published};
use crate::tree::hasher;
use crate::types::Version;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct CollectionRow {
    pub name: CollectionName,
    pub entities: usize,
    pub identity: IdentityScheme,
    pub policy: InsertPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub lines: usize,
    pub items: u64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub version: Version,
    pub fingerprint: String,
    pub site_name: String,
    pub current_user: Option<String>,
    pub collections: Vec<CollectionRow>,
    pub cart: CartSummary,
}

impl InspectReport {
    /// Report for a published tree; `all` includes empty collections.
    pub fn from_published(published: &Published, all: bool) -> Self {
        let tree = &published.tree;
        let collections = CollectionName::ALL
            .iter()
            .map(|name| (*name, tree.collection(*name)))
            .filter(|(_, c)| all || !c.is_empty())
            .map(|(name, c)| CollectionRow {
                name,
                entities: c.len(),
                identity: name.identity_scheme(),
                policy: name.insert_policy(),
            })
            .collect();
        let cart = tree.cart();

        Self {
            version: published.version,
            fingerprint: hasher::fingerprint(tree),
            site_name: tree.site().name.clone(),
            current_user: tree.current_user().map(|u| u.name.clone()),
            collections,
            cart: CartSummary {
                lines: cart.lines().len(),
                items: cart.item_count(),
                subtotal: cart.subtotal(),
            },
        }
    }
}

fn scheme_label(scheme: IdentityScheme) -> &'static str {
    match scheme {
        IdentityScheme::Opaque => "opaque",
        IdentityScheme::LegacyNumeric => "legacy numeric",
    }
}

fn policy_label(policy: InsertPolicy) -> &'static str {
    match policy {
        InsertPolicy::Prepend => "prepend",
        InsertPolicy::Append => "append",
    }
}

pub fn format_inspect_text(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Storefront")));
    let site = if report.site_name.is_empty() {
        "(unnamed)"
    } else {
        report.site_name.as_str()
    };
    out.push_str(&format!("  Site: {}\n", site));
    out.push_str(&format!("  Version: {}\n", report.version));
    out.push_str(&format!("  Fingerprint: {}\n", report.fingerprint));
    if let Some(user) = &report.current_user {
        out.push_str(&format!("  Signed in: {}\n", user));
    }

    out.push_str(&format!("\n{}\n", format_section_heading("Collections")));
    if report.collections.is_empty() {
        out.push_str(&format!("  {}\n", "All collections are empty.".dimmed()));
    } else {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Collection", "Entities", "Identity", "Insert"]);
        for row in &report.collections {
            table.add_row(vec![
                row.name.to_string(),
                row.entities.to_string(),
                scheme_label(row.identity).to_string(),
                policy_label(row.policy).to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    out.push_str(&format!("\n{}\n", format_section_heading("Cart")));
    out.push_str(&format!(
        "  {} line(s), {} item(s), subtotal {}",
        report.cart.lines,
        report.cart.items,
        money(report.cart.subtotal)
    ));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub operations: usize,
    pub version: Version,
    pub fingerprint: String,
    pub notices: Vec<Notice>,
    pub written_to: Option<PathBuf>,
}

pub fn format_apply_text(report: &ApplyReport) -> String {
    let mut out = format!(
        "Processed {} operation(s); tree is at version {}\n  Fingerprint: {}",
        report.operations, report.version, report.fingerprint
    );
    if let Some(path) = &report.written_to {
        out.push_str(&format!("\n  Snapshot written to {}", path.display()));
    }
    if !report.notices.is_empty() {
        out.push_str(&format!(
            "\n\n{} ({}):",
            "Rejected".red(),
            report.notices.len()
        ));
        for notice in &report.notices {
            out.push_str(&format!("\n  - {}: {}", notice.origin, notice.message));
        }
    }
    out
}
