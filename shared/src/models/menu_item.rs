//! Menu Item Model
//!
//! Read-only shape delivered by the menu provider. The cart consumes items of
//! this shape but never validates them against live inventory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback language for localized fields
pub const DEFAULT_LANG: &str = "en";

/// Menu item (String ID, localized name/description per language code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    /// Localized display names, keyed by language code ("en", "tr", ...)
    pub names: HashMap<String, String>,
    /// Localized descriptions, keyed by language code
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
    /// Price in currency unit
    pub price: f64,
    /// Image reference (URL or asset path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Category reference (String ID)
    pub category_id: String,
}

impl MenuItem {
    /// Display name for a language, falling back to the default language,
    /// then to any available translation
    pub fn name(&self, lang: &str) -> &str {
        self.names
            .get(lang)
            .or_else(|| self.names.get(DEFAULT_LANG))
            .or_else(|| self.names.values().next())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Description for a language, with the same fallback chain as [`Self::name`]
    pub fn description(&self, lang: &str) -> Option<&str> {
        self.descriptions
            .get(lang)
            .or_else(|| self.descriptions.get(DEFAULT_LANG))
            .map(String::as_str)
    }
}
