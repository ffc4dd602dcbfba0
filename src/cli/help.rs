//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string used in log events (e.g. "inspect", "generate").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Inspect { .. } => "inspect",
        Commands::Views => "views",
        Commands::Route { .. } => "route",
        Commands::Project => "project",
        Commands::Apply { .. } => "apply",
        Commands::Generate { .. } => "generate",
    }
}
