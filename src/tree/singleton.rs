//! Singleton records held at the root of the state tree.

use crate::cart::Cart;
use crate::store::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Theme colors keyed by role (`primary`, `accent`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    pub colors: BTreeMap<String, String>,
}

impl Theme {
    pub fn with_color(mut self, key: &str, value: &str) -> Self {
        self.colors.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Base font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

fn default_font_size() -> u16 {
    16
}

fn default_font_family() -> String {
    "Inter, sans-serif".to_string()
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            font_family: default_font_family(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteIdentity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    #[serde(default)]
    pub two_factor_required: bool,
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: u32,
    #[serde(default = "default_login_attempts")]
    pub login_attempt_limit: u32,
    #[serde(default)]
    pub allowed_admin_ips: Vec<String>,
}

fn default_session_timeout() -> u32 {
    30
}

fn default_login_attempts() -> u32 {
    5
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor_required: false,
            session_timeout_minutes: default_session_timeout(),
            login_attempt_limit: default_login_attempts(),
            allowed_admin_ips: Vec::new(),
        }
    }
}

/// The signed-in console user. Looked up, not authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Full replacement value for one root singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
pub enum Singleton {
    Theme(Theme),
    Typography(Typography),
    Site(SiteIdentity),
    Security(SecuritySettings),
    CurrentUser(Option<CurrentUser>),
    Cart(Cart),
    InjectedMarkup(String),
}

impl Singleton {
    pub fn name(&self) -> &'static str {
        match self {
            Singleton::Theme(_) => "theme",
            Singleton::Typography(_) => "typography",
            Singleton::Site(_) => "site",
            Singleton::Security(_) => "security",
            Singleton::CurrentUser(_) => "currentUser",
            Singleton::Cart(_) => "cart",
            Singleton::InjectedMarkup(_) => "injectedMarkup",
        }
    }
}

/// Snapshot keys that hold singletons rather than collections.
pub const SINGLETON_KEYS: &[&str] = &[
    "theme",
    "typography",
    "site",
    "security",
    "currentUser",
    "cart",
    "injectedMarkup",
];
