//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, OutputFormat};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_apply_text, format_generate_text, format_inspect_text, format_projection_text,
    format_route_text, format_section_heading, format_views_text, ApplyReport, GenerateReport,
    InspectReport, RouteReport, ViewsReport,
};
pub use route::RunContext;
