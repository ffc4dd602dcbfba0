//! State Tree
//!
//! The single in-memory value holding every collection and singleton. A tree is
//! always complete: every collection exists (possibly empty) and every singleton
//! has a value. Trees are immutable; operations in [`crate::store::ops`] return new
//! trees that share unchanged parts with the old one.

pub mod hasher;
pub mod singleton;
pub mod snapshot;

pub use singleton::{
    CurrentUser, SecuritySettings, Singleton, SiteIdentity, Theme, Typography, SINGLETON_KEYS,
};
pub use snapshot::{FileSnapshot, InlineSnapshot, SnapshotSource};

use crate::cart::Cart;
use crate::store::{Collection, CollectionName};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Root of the application state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTree {
    /// Indexed by `CollectionName` declaration order.
    collections: Vec<Collection>,
    theme: Arc<Theme>,
    typography: Arc<Typography>,
    site: Arc<SiteIdentity>,
    security: Arc<SecuritySettings>,
    current_user: Option<Arc<CurrentUser>>,
    cart: Arc<Cart>,
    injected_markup: Arc<str>,
}

impl Default for StateTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl StateTree {
    /// Complete tree with empty collections and default singletons.
    pub fn empty() -> Self {
        Self {
            collections: vec![Collection::default(); CollectionName::ALL.len()],
            theme: Arc::new(Theme::default()),
            typography: Arc::new(Typography::default()),
            site: Arc::new(SiteIdentity::default()),
            security: Arc::new(SecuritySettings::default()),
            current_user: None,
            cart: Arc::new(Cart::default()),
            injected_markup: Arc::from(""),
        }
    }

    pub fn collection(&self, name: CollectionName) -> &Collection {
        &self.collections[name as usize]
    }

    /// Non-empty collections with their names.
    pub fn populated(&self) -> impl Iterator<Item = (CollectionName, &Collection)> {
        CollectionName::ALL
            .iter()
            .map(move |name| (*name, self.collection(*name)))
            .filter(|(_, c)| !c.is_empty())
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    pub fn typography(&self) -> &Arc<Typography> {
        &self.typography
    }

    pub fn site(&self) -> &Arc<SiteIdentity> {
        &self.site
    }

    pub fn security(&self) -> &Arc<SecuritySettings> {
        &self.security
    }

    pub fn current_user(&self) -> Option<&Arc<CurrentUser>> {
        self.current_user.as_ref()
    }

    pub fn cart(&self) -> &Arc<Cart> {
        &self.cart
    }

    pub fn injected_markup(&self) -> &Arc<str> {
        &self.injected_markup
    }

    pub(crate) fn with_collection(&self, name: CollectionName, collection: Collection) -> Self {
        let mut next = self.clone();
        next.collections[name as usize] = collection;
        next
    }

    pub(crate) fn with_singleton(&self, singleton: Singleton) -> Self {
        let mut next = self.clone();
        match singleton {
            Singleton::Theme(theme) => next.theme = Arc::new(theme),
            Singleton::Typography(typography) => next.typography = Arc::new(typography),
            Singleton::Site(site) => next.site = Arc::new(site),
            Singleton::Security(security) => next.security = Arc::new(security),
            Singleton::CurrentUser(user) => next.current_user = user.map(Arc::new),
            Singleton::Cart(cart) => next.cart = Arc::new(cart),
            Singleton::InjectedMarkup(markup) => next.injected_markup = Arc::from(markup),
        }
        next
    }

    /// True when both trees share all of their storage, i.e. one is an unmodified
    /// copy of the other.
    pub fn same_storage(&self, other: &StateTree) -> bool {
        let users_match = match (&self.current_user, &other.current_user) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        users_match
            && Arc::ptr_eq(&self.theme, &other.theme)
            && Arc::ptr_eq(&self.typography, &other.typography)
            && Arc::ptr_eq(&self.site, &other.site)
            && Arc::ptr_eq(&self.security, &other.security)
            && Arc::ptr_eq(&self.cart, &other.cart)
            && Arc::ptr_eq(&self.injected_markup, &other.injected_markup)
            && self
                .collections
                .iter()
                .zip(other.collections.iter())
                .all(|(a, b)| a.same_identity(b))
    }

    /// Snapshot-shaped JSON form. Key order is canonical (sorted), so equal trees
    /// produce equal documents.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("theme".into(), to_json(self.theme.as_ref()));
        root.insert("typography".into(), to_json(self.typography.as_ref()));
        root.insert("site".into(), to_json(self.site.as_ref()));
        root.insert("security".into(), to_json(self.security.as_ref()));
        root.insert(
            "currentUser".into(),
            self.current_user
                .as_ref()
                .map(|u| to_json(u.as_ref()))
                .unwrap_or(Value::Null),
        );
        root.insert("cart".into(), to_json(self.cart.as_ref()));
        root.insert(
            "injectedMarkup".into(),
            Value::String(self.injected_markup.to_string()),
        );
        for name in CollectionName::ALL {
            let entities: Vec<Value> = self
                .collection(*name)
                .iter()
                .map(|e| e.to_value())
                .collect();
            root.insert(name.as_str().into(), Value::Array(entities));
        }
        Value::Object(root)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
