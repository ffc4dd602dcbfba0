//! Derived Views
//!
//! Read-only projections of the state tree: revenue, KPI rollups, top-N rankings,
//! leaderboards and flag filters. Each view is a pure function of one or more
//! collections. [`DerivedViews`] memoizes them on collection identity, so a view is
//! recomputed only when one of its input collections was replaced.
//!
//! Views always read a whole published tree, never a tree under construction.

pub mod aggregates;
pub mod memo;
pub mod ranking;

pub use aggregates::{KpiSnapshot, RevenueSummary};
pub use memo::{Memo, MemoStats};
pub use ranking::{LeaderboardEntry, RankedProduct};

use crate::store::{CollectionName, Entity};
use crate::tree::StateTree;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tuning for the derived views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Number of entries in the top-products ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Leaderboard page size
    #[serde(default = "default_page_size")]
    pub leaderboard_page_size: usize,

    /// Order status excluded from revenue
    #[serde(default = "default_cancelled_status")]
    pub cancelled_status: String,

    /// Products with stock at or below this count as low stock
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: i64,
}

fn default_top_n() -> usize {
    5
}

fn default_page_size() -> usize {
    10
}

fn default_cancelled_status() -> String {
    "cancelled".to_string()
}

fn default_low_stock() -> i64 {
    5
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            leaderboard_page_size: default_page_size(),
            cancelled_status: default_cancelled_status(),
            low_stock_threshold: default_low_stock(),
        }
    }
}

impl ViewsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }
        if self.leaderboard_page_size == 0 {
            return Err("leaderboard_page_size must be at least 1".to_string());
        }
        if self.cancelled_status.trim().is_empty() {
            return Err("cancelled_status cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Memoized derived views over published trees.
pub struct DerivedViews {
    config: ViewsConfig,
    revenue: Memo<RevenueSummary>,
    kpis: Memo<KpiSnapshot>,
    top_products: Memo<Vec<RankedProduct>>,
    leaderboard: Memo<Vec<LeaderboardEntry>>,
    active_banners: Memo<Vec<Entity>>,
}

impl Default for DerivedViews {
    fn default() -> Self {
        Self::new(ViewsConfig::default())
    }
}

impl DerivedViews {
    pub fn new(config: ViewsConfig) -> Self {
        Self {
            config,
            revenue: Memo::new(),
            kpis: Memo::new(),
            top_products: Memo::new(),
            leaderboard: Memo::new(),
            active_banners: Memo::new(),
        }
    }

    pub fn config(&self) -> &ViewsConfig {
        &self.config
    }

    pub fn revenue(&self, tree: &StateTree) -> Arc<RevenueSummary> {
        let orders = tree.collection(CollectionName::Orders);
        self.revenue.get_or_compute(&[orders], || {
            aggregates::revenue_summary(orders, &self.config.cancelled_status)
        })
    }

    pub fn kpis(&self, tree: &StateTree) -> Arc<KpiSnapshot> {
        let inputs: Vec<_> = aggregates::KPI_INPUTS
            .iter()
            .map(|name| tree.collection(*name))
            .collect();
        self.kpis.get_or_compute(&inputs, || {
            aggregates::kpi_rollup(
                tree,
                &self.config.cancelled_status,
                self.config.low_stock_threshold,
            )
        })
    }

    pub fn top_products(&self, tree: &StateTree) -> Arc<Vec<RankedProduct>> {
        let orders = tree.collection(CollectionName::Orders);
        self.top_products.get_or_compute(&[orders], || {
            ranking::top_products(orders, self.config.top_n, &self.config.cancelled_status)
        })
    }

    pub fn leaderboard(&self, tree: &StateTree) -> Arc<Vec<LeaderboardEntry>> {
        let members = tree.collection(CollectionName::LoyaltyMembers);
        self.leaderboard.get_or_compute(&[members], || {
            ranking::leaderboard(members, self.config.leaderboard_page_size)
        })
    }

    pub fn active_banners(&self, tree: &StateTree) -> Arc<Vec<Entity>> {
        let banners = tree.collection(CollectionName::Banners);
        self.active_banners
            .get_or_compute(&[banners], || aggregates::active_entities(banners, "active"))
    }

    /// Combined hit/miss counters of every view.
    pub fn stats(&self) -> MemoStats {
        self.revenue.stats()
            + self.kpis.stats()
            + self.top_products.stats()
            + self.leaderboard.stats()
            + self.active_banners.stats()
    }
}
