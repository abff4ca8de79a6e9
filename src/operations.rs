/// Browse-surface operations: open, forget, delete and restore saved items.
///
/// Each operation edits a working copy of the store and reports what has to
/// be opened in the browser. The caller opens, persists, then re-renders.

use crate::storage::SavedStore;
use uuid::Uuid;

/// Where a displayed item lives in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Ungrouped { window_id: String, url: String },
    Grouped { window_id: String, group_id: Uuid, url: String },
}

impl ItemRef {
    pub fn url(&self) -> &str {
        match self {
            ItemRef::Ungrouped { url, .. } | ItemRef::Grouped { url, .. } => url,
        }
    }

    pub fn window_id(&self) -> &str {
        match self {
            ItemRef::Ungrouped { window_id, .. } | ItemRef::Grouped { window_id, .. } => window_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    /// One new inactive tab per URL in the current window
    BackgroundTabs,
    /// All URLs together in a single new window
    NewWindow,
}

/// What the browser must do for an operation, and whether the store needs saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    pub open: Vec<String>,
    pub target: OpenTarget,
    pub changed: bool,
}

impl Effect {
    fn none() -> Effect {
        Effect {
            open: Vec::new(),
            target: OpenTarget::BackgroundTabs,
            changed: false,
        }
    }
}

/// Open a saved item. Unless `keep` is set, the item is then forgotten:
/// an emptied group is removed, and so is an emptied window.
pub fn open_item(store: &mut SavedStore, item: &ItemRef, keep: bool) -> Effect {
    let open = vec![item.url().to_string()];
    let changed = !keep && forget_item(store, item);

    Effect {
        open,
        target: OpenTarget::BackgroundTabs,
        changed,
    }
}

fn forget_item(store: &mut SavedStore, item: &ItemRef) -> bool {
    let window_id = item.window_id();
    let Some(record) = store.get_mut(window_id) else {
        return false;
    };

    let removed = match item {
        ItemRef::Ungrouped { url, .. } => {
            let before = record.ungrouped_tabs.len();
            record.ungrouped_tabs.retain(|t| &t.url != url);
            record.ungrouped_tabs.len() < before
        }
        ItemRef::Grouped { group_id, url, .. } => {
            match record.tab_groups.iter().position(|g| &g.id == group_id) {
                Some(index) => {
                    let group = &mut record.tab_groups[index];
                    let before = group.tabs.len();
                    group.tabs.retain(|t| &t.url != url);
                    let removed = group.tabs.len() < before;

                    if group.tabs.is_empty() {
                        record.tab_groups.remove(index);
                    }
                    removed
                }
                None => false,
            }
        }
    };

    if store.prune_window(window_id) {
        log::info!("Window {} has no saved items left, removed", window_id);
    }
    removed
}

/// Remove a window's record outright. Confirmation is the caller's job.
pub fn delete_window(store: &mut SavedStore, window_id: &str) -> Effect {
    Effect {
        changed: store.remove_window(window_id).is_some(),
        ..Effect::none()
    }
}

/// Reopen every URL of a window (ungrouped first, then groups in order) as one
/// new browser window, and drop the record. Group structure is not rebuilt.
pub fn restore_window(store: &mut SavedStore, window_id: &str) -> Effect {
    match store.remove_window(window_id) {
        Some(record) => Effect {
            open: record.urls(),
            target: OpenTarget::NewWindow,
            changed: true,
        },
        None => Effect::none(),
    }
}

/// Open every tab of a saved group; the store is left untouched
pub fn open_group(store: &SavedStore, window_id: &str, group_id: &Uuid) -> Effect {
    let open = store
        .get(window_id)
        .and_then(|record| record.tab_groups.iter().find(|g| &g.id == group_id))
        .map(|group| group.tabs.iter().map(|t| t.url.clone()).collect())
        .unwrap_or_default();

    Effect {
        open,
        ..Effect::none()
    }
}

/// A user action on the display page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Click on an item; `keep` when a modifier key was held
    OpenItem { item: ItemRef, keep: bool },
    /// Click on a group title
    OpenGroup { window_id: String, group_id: Uuid },
    DeleteWindow(String),
    RestoreWindow(String),
}

impl Action {
    pub fn apply(&self, store: &mut SavedStore) -> Effect {
        match self {
            Action::OpenItem { item, keep } => open_item(store, item, *keep),
            Action::OpenGroup { window_id, group_id } => open_group(store, window_id, group_id),
            Action::DeleteWindow(window_id) => delete_window(store, window_id),
            Action::RestoreWindow(window_id) => restore_window(store, window_id),
        }
    }
}
