/// Settings passed explicitly to every surface

use crate::tags::TagCatalog;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// chrome.storage.local key holding the saved store
    pub storage_key: String,
    /// Key holding the store's write revision
    pub revision_key: String,
    /// Extension-relative path of the display page
    pub display_page: String,
    /// How long a transient message stays on the display page
    pub message_ttl_ms: u32,
    /// Area select value meaning "no area chosen"
    pub area_placeholder: String,
    /// Subject select values that never become tags
    pub subject_sentinels: Vec<String>,
    pub catalog: TagCatalog,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            storage_key: "savedItemsByWindow".to_string(),
            revision_key: "savedItemsRevision".to_string(),
            display_page: "display.html".to_string(),
            message_ttl_ms: 6000,
            area_placeholder: "area".to_string(),
            subject_sentinels: vec!["untagged".to_string(), "Subjects".to_string()],
            catalog: TagCatalog::default(),
        }
    }
}

impl Settings {
    /// Decode settings handed over from JS, falling back to defaults on any problem
    pub fn from_js(value: JsValue) -> Settings {
        if value.is_null() || value.is_undefined() {
            return Settings::default();
        }

        Settings::or_defaults(serde_wasm_bindgen::from_value(value))
    }

    /// Take decoded settings, or log why they were rejected and use the defaults
    pub(crate) fn or_defaults<E: std::fmt::Display>(decoded: std::result::Result<Settings, E>) -> Settings {
        decoded.unwrap_or_else(|e| {
            log::warn!("Ignoring invalid settings, using defaults: {}", e);
            Settings::default()
        })
    }
}
