//! CLI parse: clap types for Vitrine. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vitrine CLI - storefront state core
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Load, inspect and mutate a storefront state tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Snapshot file (overrides snapshot.path from the configuration)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the loaded tree: version, fingerprint, populated collections, cart
    Inspect {
        /// List every collection, including empty ones
        #[arg(long)]
        all: bool,
    },
    /// Compute the derived views (revenue, KPIs, rankings, leaderboard)
    Views,
    /// Resolve an address fragment against the loaded catalog
    Route {
        /// Fragment such as "#/produto/42"
        fragment: String,
    },
    /// Render the presentation projection of the loaded tree
    Project,
    /// Apply a JSON array of operations to the loaded tree
    Apply {
        /// Operations file
        ops: PathBuf,
        /// Write the resulting tree as a snapshot to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate content and merge it into the tree
    Generate {
        /// Prompt sent to the generator
        prompt: String,
        /// Content kind (text, image, video)
        #[arg(long, default_value = "text")]
        kind: String,
        /// Provider name from the configuration (default: generation.provider)
        #[arg(long)]
        provider: Option<String>,
        /// Target collection (default: generation.target_collection)
        #[arg(long)]
        collection: Option<String>,
        /// Existing entity to update instead of creating a new one
        #[arg(long, requires = "field")]
        id: Option<String>,
        /// Field of the existing entity receiving the result
        #[arg(long, requires = "id")]
        field: Option<String>,
    },
}
