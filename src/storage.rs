/// Saved-item store and its serialization to chrome.storage.local

use crate::bridge;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::tab_data::WindowRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use wasm_bindgen::JsValue;

/// Root storage structure: saved records keyed by originating window id.
/// Key order is the order windows were first saved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SavedStore {
    pub windows: IndexMap<String, WindowRecord>,
}

impl SavedStore {
    pub fn new() -> Self {
        SavedStore {
            windows: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, window_id: &str) -> Option<&WindowRecord> {
        self.windows.get(window_id)
    }

    pub fn get_mut(&mut self, window_id: &str) -> Option<&mut WindowRecord> {
        self.windows.get_mut(window_id)
    }

    /// Every URL saved anywhere in the store, grouped or not
    pub fn saved_urls(&self) -> HashSet<String> {
        self.windows
            .values()
            .flat_map(|record| record.urls())
            .collect()
    }

    /// Append a capture increment to a window's record, creating it if needed.
    /// Returns false (and leaves the store alone) for an empty increment.
    pub fn merge_window(&mut self, window_id: &str, increment: WindowRecord) -> bool {
        if increment.is_empty() {
            return false;
        }

        self.windows
            .entry(window_id.to_string())
            .or_default()
            .extend(increment);
        true
    }

    pub fn remove_window(&mut self, window_id: &str) -> Option<WindowRecord> {
        self.windows.shift_remove(window_id)
    }

    /// Drop the window's record if nothing is left in it
    pub fn prune_window(&mut self, window_id: &str) -> bool {
        if self.windows.get(window_id).is_some_and(WindowRecord::is_empty) {
            self.remove_window(window_id);
            true
        } else {
            false
        }
    }

    pub fn total_items(&self) -> usize {
        self.windows
            .values()
            .map(|r| r.ungrouped_tabs.len() + r.tab_groups.iter().map(|g| g.tabs.len()).sum::<usize>())
            .sum()
    }
}

/// The copy of the store a surface works from, with the revision it was read at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub items: SavedStore,
    pub revision: u64,
}

impl StoreSnapshot {
    /// The snapshot that results from persisting `items` on top of this one
    pub fn next(&self, items: SavedStore) -> StoreSnapshot {
        StoreSnapshot {
            items,
            revision: self.revision + 1,
        }
    }
}

/// Fail if someone else wrote since `expected` was read
pub fn check_revision(expected: u64, found: u64) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::Conflict { expected, found })
    }
}

// Helper functions

pub async fn load_snapshot(settings: &Settings) -> Result<StoreSnapshot> {
    let items_js = bridge::get_storage(&settings.storage_key).await?;
    let items = if items_js.is_null() || items_js.is_undefined() {
        SavedStore::new()
    } else {
        serde_wasm_bindgen::from_value(items_js)?
    };

    let revision = load_revision(settings).await?;

    Ok(StoreSnapshot { items, revision })
}

/// Persist `items` over `base`, refusing to overwrite a newer write from another view.
/// Items and revision go out in a single `set` call.
pub async fn save_snapshot(settings: &Settings, base: &StoreSnapshot, items: SavedStore) -> Result<StoreSnapshot> {
    let found = load_revision(settings).await?;
    if let Err(e) = check_revision(base.revision, found) {
        log::warn!("{}", e);
        return Err(e);
    }

    let next = base.next(items);
    let payload = storage_payload(settings, &next)?;
    bridge::set_storage(payload).await?;

    log::debug!("Saved {} windows at revision {}", next.items.windows.len(), next.revision);
    Ok(next)
}

async fn load_revision(settings: &Settings) -> Result<u64> {
    let revision_js = bridge::get_storage(&settings.revision_key).await?;
    if revision_js.is_null() || revision_js.is_undefined() {
        Ok(0)
    } else {
        Ok(serde_wasm_bindgen::from_value(revision_js)?)
    }
}

fn storage_payload(settings: &Settings, snapshot: &StoreSnapshot) -> Result<JsValue> {
    // Plain objects, not JS Maps: chrome.storage cannot persist Map instances
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let items = snapshot.items.serialize(&serializer)?;

    let payload = js_sys::Object::new();
    js_sys::Reflect::set(&payload, &JsValue::from_str(&settings.storage_key), &items)
        .map_err(|e| Error::storage("Failed to build payload", e))?;
    js_sys::Reflect::set(
        &payload,
        &JsValue::from_str(&settings.revision_key),
        &JsValue::from_f64(snapshot.revision as f64),
    )
    .map_err(|e| Error::storage("Failed to build payload", e))?;

    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::{GroupTab, ItemKind, SavedGroup, SavedTab, UNGROUPED};
    use uuid::Uuid;

    fn create_test_tab(url: &str) -> SavedTab {
        SavedTab {
            id: Uuid::new_v4(),
            kind: ItemKind::Tab,
            url: url.to_string(),
            title: url.to_string(),
            saved_at: "2024-10-28T10:30:00.000Z".to_string(),
            tags: vec![],
            group_id: UNGROUPED,
            fav_icon_url: None,
        }
    }

    fn create_test_group(urls: &[&str]) -> SavedGroup {
        SavedGroup {
            id: Uuid::new_v4(),
            kind: ItemKind::Group,
            title: "Group".to_string(),
            color: "blue".to_string(),
            saved_at: "2024-10-28T10:30:00.000Z".to_string(),
            tags: vec![],
            tabs: urls
                .iter()
                .map(|url| GroupTab {
                    url: url.to_string(),
                    title: String::new(),
                    fav_icon_url: None,
                })
                .collect(),
        }
    }

    fn record(tabs: &[&str], groups: Vec<SavedGroup>) -> WindowRecord {
        WindowRecord {
            ungrouped_tabs: tabs.iter().map(|u| create_test_tab(u)).collect(),
            tab_groups: groups,
        }
    }

    #[test]
    fn test_saved_urls_spans_windows_and_groups() {
        let mut store = SavedStore::new();
        store.merge_window("1", record(&["https://a.test"], vec![]));
        store.merge_window("2", record(&[], vec![create_test_group(&["https://b.test", "https://c.test"])]));

        let urls = store.saved_urls();

        assert_eq!(urls.len(), 3);
        assert!(urls.contains("https://a.test"));
        assert!(urls.contains("https://c.test"));
    }

    #[test]
    fn test_merge_appends_to_existing_window() {
        let mut store = SavedStore::new();
        store.merge_window("1", record(&["https://a.test"], vec![create_test_group(&["https://g.test"])]));

        let merged = store.merge_window("1", record(&["https://b.test"], vec![create_test_group(&["https://h.test"])]));

        assert!(merged);
        let window = store.get("1").unwrap();
        assert_eq!(window.ungrouped_tabs[0].url, "https://a.test");
        assert_eq!(window.ungrouped_tabs[1].url, "https://b.test");
        assert_eq!(window.tab_groups.len(), 2);
    }

    #[test]
    fn test_merge_empty_increment_is_noop() {
        let mut store = SavedStore::new();
        let before = store.clone();

        assert!(!store.merge_window("1", WindowRecord::default()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_window_keeps_order() {
        let mut store = SavedStore::new();
        store.merge_window("1", record(&["https://a.test"], vec![]));
        store.merge_window("2", record(&["https://b.test"], vec![]));
        store.merge_window("3", record(&["https://c.test"], vec![]));

        store.remove_window("2");

        let ids: Vec<&String> = store.windows.keys().collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_prune_window_only_when_empty() {
        let mut store = SavedStore::new();
        store.merge_window("1", record(&["https://a.test"], vec![]));

        assert!(!store.prune_window("1"));

        store.get_mut("1").unwrap().ungrouped_tabs.clear();
        assert!(store.prune_window("1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_check_revision() {
        assert!(check_revision(4, 4).is_ok());
        assert!(matches!(
            check_revision(4, 5),
            Err(Error::Conflict { expected: 4, found: 5 })
        ));
    }

    #[test]
    fn test_snapshot_next_bumps_revision() {
        let base = StoreSnapshot::default();
        let next = base.next(SavedStore::new());
        assert_eq!(next.revision, 1);
    }

    #[test]
    fn test_serialization_preserves_window_order() {
        let mut store = SavedStore::new();
        store.merge_window("42", record(&["https://a.test"], vec![]));
        store.merge_window("7", record(&["https://b.test"], vec![]));

        let json = serde_json::to_string(&store).unwrap();
        let deserialized: SavedStore = serde_json::from_str(&json).unwrap();

        let ids: Vec<&String> = deserialized.windows.keys().collect();
        assert_eq!(ids, vec!["42", "7"]);
        assert_eq!(deserialized.total_items(), 2);
    }
}
