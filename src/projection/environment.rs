//! Rendering environment seam.
//!
//! The projection writes through this small vocabulary and never reads back.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Output boundary of the presentation projection.
pub trait RenderEnvironment {
    fn set_style_variable(&mut self, name: &str, value: &str);

    /// Drop a variable written earlier.
    fn remove_style_variable(&mut self, name: &str);

    fn set_base_font(&mut self, size_px: u16, family: &str);

    fn set_favicon(&mut self, href: &str);

    /// Replace the whole contents of the injection target.
    fn replace_injected_markup(&mut self, markup: &str);
}

/// In-memory environment holding the last value of every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEnvironment {
    pub style_variables: BTreeMap<String, String>,
    pub base_font: Option<(u16, String)>,
    pub favicon: Option<String>,
    pub injected_markup: String,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the state as a `:root` style block followed by the head extras.
    pub fn to_css(&self) -> String {
        let mut out = String::from(":root {\n");
        for (name, value) in &self.style_variables {
            let _ = writeln!(out, "  {}: {};", name, value);
        }
        if let Some((size, family)) = &self.base_font {
            let _ = writeln!(out, "  font-size: {}px;", size);
            let _ = writeln!(out, "  font-family: {};", family);
        }
        out.push_str("}\n");
        if let Some(favicon) = &self.favicon {
            let _ = writeln!(out, "/* favicon: {} */", favicon);
        }
        if !self.injected_markup.is_empty() {
            let _ = writeln!(out, "/* injected markup: {} bytes */", self.injected_markup.len());
        }
        out
    }
}

impl RenderEnvironment for MemoryEnvironment {
    fn set_style_variable(&mut self, name: &str, value: &str) {
        self.style_variables
            .insert(name.to_string(), value.to_string());
    }

    fn remove_style_variable(&mut self, name: &str) {
        self.style_variables.remove(name);
    }

    fn set_base_font(&mut self, size_px: u16, family: &str) {
        self.base_font = Some((size_px, family.to_string()));
    }

    fn set_favicon(&mut self, href: &str) {
        self.favicon = Some(href.to_string());
    }

    fn replace_injected_markup(&mut self, markup: &str) {
        self.injected_markup = markup.to_string();
    }
}
