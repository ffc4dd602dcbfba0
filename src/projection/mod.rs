//! Presentation Projection
//!
//! One-way mirror from tree singletons into a [`RenderEnvironment`]. The projector
//! watches four fields (theme, typography, site identity, injected markup) by
//! identity. When any of them was replaced since the last application it re-applies
//! all four effects; otherwise it does nothing. Color variables of keys the previous
//! theme had and the new one lacks are removed.

pub mod environment;

pub use environment::{MemoryEnvironment, RenderEnvironment};

use crate::store::Published;
use crate::tree::{SiteIdentity, StateTree, Theme, Typography};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Prefix of the style variable written for each theme color key.
pub const COLOR_VARIABLE_PREFIX: &str = "--color-";

pub fn color_variable(key: &str) -> String {
    format!("{}{}", COLOR_VARIABLE_PREFIX, key)
}

/// The watched fields of the last applied tree.
struct Watched {
    theme: Arc<Theme>,
    typography: Arc<Typography>,
    site: Arc<SiteIdentity>,
    injected_markup: Arc<str>,
}

impl Watched {
    fn of(tree: &StateTree) -> Self {
        Self {
            theme: Arc::clone(tree.theme()),
            typography: Arc::clone(tree.typography()),
            site: Arc::clone(tree.site()),
            injected_markup: Arc::clone(tree.injected_markup()),
        }
    }

    fn unchanged_in(&self, tree: &StateTree) -> bool {
        Arc::ptr_eq(&self.theme, tree.theme())
            && Arc::ptr_eq(&self.typography, tree.typography())
            && Arc::ptr_eq(&self.site, tree.site())
            && Arc::ptr_eq(&self.injected_markup, tree.injected_markup())
    }
}

pub struct Projector<E: RenderEnvironment> {
    environment: E,
    last: Option<Watched>,
    applications: u64,
}

impl<E: RenderEnvironment> Projector<E> {
    pub fn new(environment: E) -> Self {
        Self {
            environment,
            last: None,
            applications: 0,
        }
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn into_environment(self) -> E {
        self.environment
    }

    /// Number of times the effects were applied.
    pub fn applications(&self) -> u64 {
        self.applications
    }

    /// Apply the effects if a watched field changed identity since the last
    /// application (or nothing was applied yet). Returns whether effects ran.
    pub fn observe(&mut self, tree: &StateTree) -> bool {
        if let Some(last) = &self.last {
            if last.unchanged_in(tree) {
                return false;
            }
        }
        self.apply(tree);
        true
    }

    /// Unconditionally write the four effects for `tree`.
    pub fn apply(&mut self, tree: &StateTree) {
        let theme = tree.theme();
        if let Some(last) = &self.last {
            for key in last.theme.colors.keys() {
                if !theme.colors.contains_key(key) {
                    self.environment.remove_style_variable(&color_variable(key));
                }
            }
        }
        for (key, value) in &theme.colors {
            self.environment
                .set_style_variable(&color_variable(key), value);
        }

        let typography = tree.typography();
        self.environment
            .set_base_font(typography.font_size, &typography.font_family);

        self.environment.set_favicon(&tree.site().favicon);
        self.environment
            .replace_injected_markup(tree.injected_markup());

        self.last = Some(Watched::of(tree));
        self.applications += 1;
        debug!(
            colors = theme.colors.len(),
            font_size = typography.font_size,
            application = self.applications,
            "Projection applied"
        );
    }

    /// Follow published trees until the store goes away, then hand back the
    /// environment.
    pub async fn follow(mut self, mut receiver: watch::Receiver<Published>) -> E {
        let initial = Arc::clone(&receiver.borrow_and_update().tree);
        self.observe(&initial);
        while receiver.changed().await.is_ok() {
            let tree = Arc::clone(&receiver.borrow_and_update().tree);
            self.observe(&tree);
        }
        info!(applications = self.applications, "Projection stopped");
        self.environment
    }
}
