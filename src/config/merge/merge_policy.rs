//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key: defaults, global file, workspace
/// files, environment.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("views.top_n", 5_i64)?
        .set_default("views.leaderboard_page_size", 10_i64)?
        .set_default("views.cancelled_status", "cancelled")?
        .set_default("views.low_stock_threshold", 5_i64)?
        .set_default("router.product_marker", "produto")?
        .set_default("generation.target_collection", "generatedAssets")
}
