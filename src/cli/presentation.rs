//! CLI presentation: text and json formatters per command family.

mod shared;
mod storefront;
mod tree;
mod views;

pub use shared::{format_section_heading, to_json};
pub use storefront::{
    format_generate_text, format_projection_text, format_route_text, GenerateReport,
    RouteReport,
};
pub use tree::{format_apply_text, format_inspect_text, ApplyReport, InspectReport};
pub use views::{format_views_text, ViewsReport};
