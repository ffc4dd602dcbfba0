//! Fragment Router
//!
//! Maps the address fragment to a view selector. Parsing never fails: anything that
//! is not a product marker followed by an integer routes home. Product ids are resolved
//! against the tree at render time, so a dangling id has its own view.

use crate::catalog::{find_product, Product};
use crate::tree::StateTree;
use crate::types::ProductNumber;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// First path segment of a product-detail fragment
    #[serde(default = "default_product_marker")]
    pub product_marker: String,
}

fn default_product_marker() -> String {
    "produto".to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            product_marker: default_product_marker(),
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.product_marker.is_empty() {
            return Err("product_marker cannot be empty".to_string());
        }
        if self.product_marker.contains('/') || self.product_marker.contains('#') {
            return Err(format!(
                "product_marker '{}' cannot contain '/' or '#'",
                self.product_marker
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    ProductDetail(ProductNumber),
}

impl Route {
    /// Canonical fragment for this route.
    pub fn to_fragment(&self, product_marker: &str) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::ProductDetail(id) => format!("#/{}/{}", product_marker, id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FragmentRouter {
    config: RouterConfig,
}

impl FragmentRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn product_marker(&self) -> &str {
        &self.config.product_marker
    }

    pub fn parse(&self, fragment: &str) -> Route {
        let path = fragment.strip_prefix('#').unwrap_or(fragment);
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut segments = path.split('/');

        let route = match (segments.next(), segments.next()) {
            (Some(marker), Some(id)) if marker == self.config.product_marker => id
                .parse::<ProductNumber>()
                .map(Route::ProductDetail)
                .unwrap_or(Route::Home),
            _ => Route::Home,
        };
        trace!(fragment, ?route, "Fragment parsed");
        route
    }

    pub fn fragment_for(&self, route: &Route) -> String {
        route.to_fragment(&self.config.product_marker)
    }
}

/// What the visible screen shows for a route against the current tree.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    ProductDetail(Product),
    ProductNotFound(ProductNumber),
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::ProductDetail(_) => "product_detail",
            View::ProductNotFound(_) => "product_not_found",
        }
    }
}

/// Resolve `route` against the flattened product collection of `tree`.
pub fn resolve(route: Route, tree: &StateTree) -> View {
    match route {
        Route::Home => View::Home,
        Route::ProductDetail(id) => match find_product(tree, id) {
            Some(product) => View::ProductDetail(product),
            None => View::ProductNotFound(id),
        },
    }
}
