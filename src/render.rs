/// Pure view model of the saved store for the display page

use crate::operations::ItemRef;
use crate::storage::SavedStore;
use crate::tab_data::WindowRecord;
use uuid::Uuid;

/// Icon shown for items saved without a favicon
pub const FALLBACK_ICON: &str = "link.svg";

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayTree {
    /// Nothing saved yet
    Empty,
    /// Most recently saved window first
    Windows(Vec<WindowView>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowTitle {
    /// Every tag found in the window, in first-seen order
    Tagged(Vec<String>),
    Untagged(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowView {
    pub window_id: String,
    pub title: WindowTitle,
    pub ungrouped: Vec<ItemView>,
    pub groups: Vec<GroupView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub id: Uuid,
    pub title: String,
    pub color: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub item: ItemRef,
    pub title: String,
    pub fav_icon_url: Option<String>,
}

impl ItemView {
    pub fn icon(&self) -> &str {
        self.fav_icon_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(FALLBACK_ICON)
    }
}

impl WindowTitle {
    /// Badge texts for a tagged window, e.g. `#home`
    pub fn badges(&self) -> Vec<String> {
        match self {
            WindowTitle::Tagged(tags) => tags.iter().map(|t| format!("#{}", t)).collect(),
            WindowTitle::Untagged(_) => Vec::new(),
        }
    }
}

pub fn render(store: &SavedStore) -> DisplayTree {
    if store.is_empty() {
        return DisplayTree::Empty;
    }

    DisplayTree::Windows(
        store
            .windows
            .iter()
            .rev()
            .map(|(window_id, record)| render_window(window_id, record))
            .collect(),
    )
}

fn render_window(window_id: &str, record: &WindowRecord) -> WindowView {
    let ungrouped = record
        .ungrouped_tabs
        .iter()
        .map(|tab| ItemView {
            item: ItemRef::Ungrouped {
                window_id: window_id.to_string(),
                url: tab.url.clone(),
            },
            title: tab.title.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
        })
        .collect();

    let groups = record
        .tab_groups
        .iter()
        .map(|group| GroupView {
            id: group.id,
            title: group.title.clone(),
            color: group.color.clone(),
            items: group
                .tabs
                .iter()
                .map(|tab| ItemView {
                    item: ItemRef::Grouped {
                        window_id: window_id.to_string(),
                        group_id: group.id,
                        url: tab.url.clone(),
                    },
                    title: tab.title.clone(),
                    fav_icon_url: tab.fav_icon_url.clone(),
                })
                .collect(),
        })
        .collect();

    WindowView {
        window_id: window_id.to_string(),
        title: window_title(window_id, record),
        ungrouped,
        groups,
    }
}

fn window_title(window_id: &str, record: &WindowRecord) -> WindowTitle {
    let mut tags: Vec<String> = Vec::new();
    let all_tags = record
        .ungrouped_tabs
        .iter()
        .flat_map(|t| t.tags.iter())
        .chain(record.tab_groups.iter().flat_map(|g| g.tags.iter()));

    for tag in all_tags {
        if !tag.is_empty() && !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    if tags.is_empty() {
        WindowTitle::Untagged(format!("Window ID: {} (untagged)", window_id))
    } else {
        WindowTitle::Tagged(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::{GroupTab, ItemKind, SavedGroup, SavedTab, UNGROUPED};

    fn create_test_tab(url: &str, tags: &[&str]) -> SavedTab {
        SavedTab {
            id: Uuid::new_v4(),
            kind: ItemKind::Tab,
            url: url.to_string(),
            title: format!("Title of {}", url),
            saved_at: "2024-10-28T10:30:00.000Z".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            group_id: UNGROUPED,
            fav_icon_url: None,
        }
    }

    fn create_test_group(urls: &[&str], tags: &[&str]) -> SavedGroup {
        SavedGroup {
            id: Uuid::new_v4(),
            kind: ItemKind::Group,
            title: "Reading".to_string(),
            color: "purple".to_string(),
            saved_at: "2024-10-28T10:30:00.000Z".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            tabs: urls
                .iter()
                .map(|url| GroupTab {
                    url: url.to_string(),
                    title: String::new(),
                    fav_icon_url: Some("https://icons.test/x.png".to_string()),
                })
                .collect(),
        }
    }

    fn sample_store() -> SavedStore {
        let mut store = SavedStore::new();
        store.merge_window(
            "10",
            WindowRecord {
                ungrouped_tabs: vec![create_test_tab("https://a.test", &["home", "furniture"])],
                tab_groups: vec![create_test_group(&["https://g.test"], &["library", "home"])],
            },
        );
        store.merge_window(
            "20",
            WindowRecord {
                ungrouped_tabs: vec![create_test_tab("https://b.test", &[])],
                tab_groups: vec![],
            },
        );
        store
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(render(&SavedStore::new()), DisplayTree::Empty);
    }

    #[test]
    fn test_windows_in_reverse_order() {
        let DisplayTree::Windows(windows) = render(&sample_store()) else {
            panic!("expected windows");
        };

        let ids: Vec<&str> = windows.iter().map(|w| w.window_id.as_str()).collect();
        assert_eq!(ids, vec!["20", "10"]);
    }

    #[test]
    fn test_title_is_union_of_tags() {
        let DisplayTree::Windows(windows) = render(&sample_store()) else {
            panic!("expected windows");
        };

        assert_eq!(
            windows[1].title,
            WindowTitle::Tagged(vec!["home".to_string(), "furniture".to_string(), "library".to_string()])
        );
        assert_eq!(windows[1].title.badges(), vec!["#home", "#furniture", "#library"]);
    }

    #[test]
    fn test_untagged_title() {
        let DisplayTree::Windows(windows) = render(&sample_store()) else {
            panic!("expected windows");
        };

        assert_eq!(
            windows[0].title,
            WindowTitle::Untagged("Window ID: 20 (untagged)".to_string())
        );
        assert!(windows[0].title.badges().is_empty());
    }

    #[test]
    fn test_group_view_carries_refs() {
        let store = sample_store();
        let group_id = store.get("10").unwrap().tab_groups[0].id;
        let DisplayTree::Windows(windows) = render(&store) else {
            panic!("expected windows");
        };

        let group = &windows[1].groups[0];
        assert_eq!(group.color, "purple");
        assert_eq!(
            group.items[0].item,
            ItemRef::Grouped {
                window_id: "10".to_string(),
                group_id,
                url: "https://g.test".to_string(),
            }
        );
        assert_eq!(group.items[0].icon(), "https://icons.test/x.png");
        assert_eq!(windows[1].ungrouped[0].icon(), FALLBACK_ICON);
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = sample_store();
        assert_eq!(render(&store), render(&store));
    }
}
