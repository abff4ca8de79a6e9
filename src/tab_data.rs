/// Data structures for Tab Tagger
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Group id the browser reports for a tab outside any tab group
pub const UNGROUPED: i32 = -1;

/// Information about a live browser tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveTab {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    #[serde(default = "ungrouped")]
    pub group_id: i32,
}

impl LiveTab {
    pub fn is_ungrouped(&self) -> bool {
        self.group_id == UNGROUPED
    }
}

/// The current browser window with its tabs populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveWindow {
    pub id: i32,
    #[serde(default)]
    pub tabs: Vec<LiveTab>,
}

/// Metadata of a live tab group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Tab,
    Group,
}

/// A tab saved outside any group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedTab {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub saved_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "ungrouped")]
    pub group_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl SavedTab {
    pub fn capture(tab: &LiveTab, tags: &[String], saved_at: &str) -> SavedTab {
        SavedTab {
            id: Uuid::new_v4(),
            kind: ItemKind::Tab,
            url: tab.url.clone(),
            title: tab.title.clone(),
            saved_at: saved_at.to_string(),
            tags: tags.to_vec(),
            group_id: UNGROUPED,
            fav_icon_url: tab.fav_icon_url.clone(),
        }
    }
}

/// A tab stored inside a saved group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupTab {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl From<&LiveTab> for GroupTab {
    fn from(tab: &LiveTab) -> Self {
        GroupTab {
            url: tab.url.clone(),
            title: tab.title.clone(),
            fav_icon_url: tab.fav_icon_url.clone(),
        }
    }
}

/// A saved tab group; never persisted with an empty `tabs` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedGroup {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
    pub saved_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tabs: Vec<GroupTab>,
}

impl SavedGroup {
    pub fn capture(info: &GroupInfo, tabs: Vec<GroupTab>, tags: &[String], saved_at: &str) -> SavedGroup {
        SavedGroup {
            id: Uuid::new_v4(),
            kind: ItemKind::Group,
            title: info.title.clone(),
            color: info.color.clone(),
            saved_at: saved_at.to_string(),
            tags: tags.to_vec(),
            tabs,
        }
    }
}

/// Everything saved from one browser window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    #[serde(default)]
    pub ungrouped_tabs: Vec<SavedTab>,
    #[serde(default)]
    pub tab_groups: Vec<SavedGroup>,
}

impl WindowRecord {
    pub fn is_empty(&self) -> bool {
        self.ungrouped_tabs.is_empty() && self.tab_groups.is_empty()
    }

    /// Every URL in the record: ungrouped tabs first, then each group's tabs in order
    pub fn urls(&self) -> Vec<String> {
        self.ungrouped_tabs
            .iter()
            .map(|t| t.url.clone())
            .chain(
                self.tab_groups
                    .iter()
                    .flat_map(|g| g.tabs.iter().map(|t| t.url.clone())),
            )
            .collect()
    }

    /// Append another record's entries after this one's
    pub fn extend(&mut self, other: WindowRecord) {
        self.ungrouped_tabs.extend(other.ungrouped_tabs);
        self.tab_groups.extend(other.tab_groups);
    }
}

fn ungrouped() -> i32 {
    UNGROUPED
}
