/// Capture planning: decide what from the live window is new, then build the record to merge

use crate::error::{Error, Result};
use crate::storage::SavedStore;
use crate::tab_data::{GroupInfo, GroupTab, LiveTab, LiveWindow, SavedGroup, SavedTab, WindowRecord};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Tabs of one live group that survived deduplication
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBatch {
    pub group_id: i32,
    pub members: Vec<LiveTab>,
}

/// Outcome of comparing a live window against the saved store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturePlan {
    pub ungrouped: Vec<LiveTab>,
    pub groups: Vec<GroupBatch>,
    /// URLs left out because they are already saved (or repeat within this capture)
    pub skipped: Vec<String>,
}

impl CapturePlan {
    pub fn is_empty(&self) -> bool {
        self.ungrouped.is_empty() && self.groups.is_empty()
    }

    /// Group ids whose metadata has to be fetched, each listed once
    pub fn group_ids(&self) -> Vec<i32> {
        self.groups.iter().map(|g| g.group_id).collect()
    }

    /// Turn the plan into the increment for this window.
    /// Every planned group must have its metadata in `groups`.
    pub fn into_record(self, groups: &HashMap<i32, GroupInfo>, tags: &[String], saved_at: &str) -> Result<WindowRecord> {
        let ungrouped_tabs = self
            .ungrouped
            .iter()
            .map(|tab| SavedTab::capture(tab, tags, saved_at))
            .collect();

        let tab_groups = self
            .groups
            .into_iter()
            .map(|batch| -> Result<SavedGroup> {
                let info = groups
                    .get(&batch.group_id)
                    .ok_or(Error::MissingGroup(batch.group_id))?;
                let tabs = batch.members.iter().map(GroupTab::from).collect();
                Ok(SavedGroup::capture(info, tabs, tags, saved_at))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WindowRecord {
            ungrouped_tabs,
            tab_groups,
        })
    }
}

/// Work out which live tabs are new.
///
/// Deduplication is global: a URL saved under any window, grouped or not,
/// is skipped. The display page itself is never captured.
pub fn plan_capture(store: &SavedStore, window: &LiveWindow, display_page: &str) -> CapturePlan {
    let mut seen = store.saved_urls();
    let mut processed_groups = HashSet::new();
    let mut plan = CapturePlan::default();

    let tabs: Vec<&LiveTab> = window
        .tabs
        .iter()
        .filter(|tab| !is_display_page(&tab.url, display_page))
        .collect();

    for tab in &tabs {
        if tab.is_ungrouped() {
            if seen.insert(tab.url.clone()) {
                plan.ungrouped.push((*tab).clone());
            } else {
                plan.skipped.push(tab.url.clone());
            }
        } else if processed_groups.insert(tab.group_id) {
            let mut members = Vec::new();
            for member in tabs.iter().filter(|t| t.group_id == tab.group_id) {
                if seen.insert(member.url.clone()) {
                    members.push((*member).clone());
                } else {
                    plan.skipped.push(member.url.clone());
                }
            }

            if !members.is_empty() {
                plan.groups.push(GroupBatch {
                    group_id: tab.group_id,
                    members,
                });
            }
        }
    }

    plan
}

/// Whether `tab_url` points at the extension's display page, ignoring query and fragment
pub fn is_display_page(tab_url: &str, display_page: &str) -> bool {
    match (Url::parse(tab_url), Url::parse(display_page)) {
        (Ok(tab), Ok(page)) => {
            tab.scheme() == page.scheme() && tab.host_str() == page.host_str() && tab.path() == page.path()
        }
        _ => tab_url == display_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::UNGROUPED;

    const DISPLAY: &str = "chrome-extension://abcdef/display.html";

    fn create_test_tab(id: i32, url: &str, group_id: i32) -> LiveTab {
        LiveTab {
            id,
            url: url.to_string(),
            title: format!("Tab {}", id),
            fav_icon_url: None,
            group_id,
        }
    }

    fn window(id: i32, tabs: Vec<LiveTab>) -> LiveWindow {
        LiveWindow { id, tabs }
    }

    fn group_info(title: &str, color: &str) -> GroupInfo {
        GroupInfo {
            title: title.to_string(),
            color: color.to_string(),
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// Full capture of `live` into `store`, with every group's metadata available
    fn capture_into(store: &mut SavedStore, live: &LiveWindow, tag_list: &[String]) -> CapturePlan {
        let plan = plan_capture(store, live, DISPLAY);
        let infos: HashMap<i32, GroupInfo> = plan
            .group_ids()
            .into_iter()
            .map(|id| (id, group_info(&format!("Group {}", id), "blue")))
            .collect();
        let record = plan
            .clone()
            .into_record(&infos, tag_list, "2024-10-28T10:30:00.000Z")
            .unwrap();
        store.merge_window(&live.id.to_string(), record);
        plan
    }

    #[test]
    fn test_capture_into_empty_store() {
        let mut store = SavedStore::new();
        let live = window(9, vec![create_test_tab(1, "https://x.test", UNGROUPED)]);

        capture_into(&mut store, &live, &tags(&["home", "furniture"]));

        let record = store.get("9").unwrap();
        assert_eq!(record.ungrouped_tabs.len(), 1);
        assert!(record.tab_groups.is_empty());

        let saved = &record.ungrouped_tabs[0];
        assert_eq!(saved.url, "https://x.test");
        assert_eq!(saved.tags, tags(&["home", "furniture"]));
        assert_eq!(saved.group_id, UNGROUPED);
    }

    #[test]
    fn test_capture_of_saved_url_changes_nothing() {
        let mut store = SavedStore::new();
        capture_into(&mut store, &window(1, vec![create_test_tab(1, "https://x.test", UNGROUPED)]), &[]);
        let before = store.clone();

        let live = window(2, vec![create_test_tab(5, "https://x.test", UNGROUPED)]);
        let plan = plan_capture(&store, &live, DISPLAY);

        assert!(plan.is_empty());
        assert_eq!(plan.skipped, vec!["https://x.test"]);
        assert_eq!(store, before);
    }

    #[test]
    fn test_dedup_is_global_across_windows_and_groups() {
        let mut store = SavedStore::new();
        capture_into(
            &mut store,
            &window(1, vec![create_test_tab(1, "https://grouped.test", 3)]),
            &[],
        );

        let live = window(
            2,
            vec![
                create_test_tab(7, "https://grouped.test", UNGROUPED),
                create_test_tab(8, "https://new.test", UNGROUPED),
            ],
        );
        let plan = plan_capture(&store, &live, DISPLAY);

        let urls: Vec<&str> = plan.ungrouped.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://new.test"]);
        assert_eq!(plan.skipped, vec!["https://grouped.test"]);
    }

    #[test]
    fn test_group_emitted_once_with_all_members() {
        let store = SavedStore::new();
        let live = window(
            1,
            vec![
                create_test_tab(1, "https://a.test", 10),
                create_test_tab(2, "https://loose.test", UNGROUPED),
                create_test_tab(3, "https://b.test", 10),
                create_test_tab(4, "https://c.test", 10),
            ],
        );

        let plan = plan_capture(&store, &live, DISPLAY);

        assert_eq!(plan.group_ids(), vec![10]);
        let members: Vec<&str> = plan.groups[0].members.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(members, vec!["https://a.test", "https://b.test", "https://c.test"]);
        assert_eq!(plan.ungrouped.len(), 1);
    }

    #[test]
    fn test_group_members_already_saved_are_dropped() {
        let mut store = SavedStore::new();
        capture_into(&mut store, &window(1, vec![create_test_tab(1, "https://b.test", UNGROUPED)]), &[]);

        let live = window(
            2,
            vec![
                create_test_tab(1, "https://a.test", 10),
                create_test_tab(2, "https://b.test", 10),
            ],
        );
        let plan = plan_capture(&store, &live, DISPLAY);

        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].members.len(), 1);
        assert_eq!(plan.skipped, vec!["https://b.test"]);
    }

    #[test]
    fn test_group_of_only_duplicates_is_not_emitted() {
        let mut store = SavedStore::new();
        capture_into(&mut store, &window(1, vec![create_test_tab(1, "https://a.test", UNGROUPED)]), &[]);

        let live = window(2, vec![create_test_tab(3, "https://a.test", 10)]);
        let plan = plan_capture(&store, &live, DISPLAY);

        assert!(plan.is_empty());
        assert!(plan.group_ids().is_empty());
    }

    #[test]
    fn test_repeated_url_within_capture_saved_once() {
        let store = SavedStore::new();
        let live = window(
            1,
            vec![
                create_test_tab(1, "https://a.test", UNGROUPED),
                create_test_tab(2, "https://a.test", UNGROUPED),
            ],
        );

        let plan = plan_capture(&store, &live, DISPLAY);

        assert_eq!(plan.ungrouped.len(), 1);
        assert_eq!(plan.skipped, vec!["https://a.test"]);
    }

    #[test]
    fn test_display_page_excluded() {
        let store = SavedStore::new();
        let live = window(
            1,
            vec![
                create_test_tab(1, "chrome-extension://abcdef/display.html#top", UNGROUPED),
                create_test_tab(2, "https://a.test", UNGROUPED),
            ],
        );

        let plan = plan_capture(&store, &live, DISPLAY);

        assert_eq!(plan.ungrouped.len(), 1);
        assert_eq!(plan.ungrouped[0].url, "https://a.test");
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_merge_is_additive() {
        let mut store = SavedStore::new();
        capture_into(&mut store, &window(1, vec![create_test_tab(1, "https://a.test", UNGROUPED)]), &tags(&["home"]));
        let prior = store.get("1").unwrap().clone();

        capture_into(
            &mut store,
            &window(
                1,
                vec![
                    create_test_tab(1, "https://a.test", UNGROUPED),
                    create_test_tab(2, "https://b.test", UNGROUPED),
                    create_test_tab(3, "https://c.test", 4),
                ],
            ),
            &tags(&["library"]),
        );

        let record = store.get("1").unwrap();
        assert_eq!(record.ungrouped_tabs[0], prior.ungrouped_tabs[0]);
        assert_eq!(record.ungrouped_tabs.len(), 2);
        assert_eq!(record.ungrouped_tabs[1].tags, tags(&["library"]));
        assert_eq!(record.tab_groups.len(), 1);
    }

    #[test]
    fn test_into_record_requires_group_metadata() {
        let store = SavedStore::new();
        let live = window(1, vec![create_test_tab(1, "https://a.test", 10)]);
        let plan = plan_capture(&store, &live, DISPLAY);

        let result = plan.into_record(&HashMap::new(), &[], "now");

        assert!(matches!(result, Err(Error::MissingGroup(10))));
    }

    #[test]
    fn test_into_record_uses_group_metadata() {
        let store = SavedStore::new();
        let live = window(1, vec![create_test_tab(1, "https://a.test", 10)]);
        let plan = plan_capture(&store, &live, DISPLAY);
        let infos = HashMap::from([(10, group_info("Reading", "green"))]);

        let record = plan.into_record(&infos, &tags(&["home"]), "now").unwrap();

        let group = &record.tab_groups[0];
        assert_eq!(group.title, "Reading");
        assert_eq!(group.color, "green");
        assert_eq!(group.tags, tags(&["home"]));
        assert_eq!(group.tabs[0].url, "https://a.test");
    }

    #[test]
    fn test_fresh_ids_per_item() {
        let store = SavedStore::new();
        let live = window(
            1,
            vec![
                create_test_tab(1, "https://a.test", UNGROUPED),
                create_test_tab(2, "https://b.test", UNGROUPED),
            ],
        );

        let record = plan_capture(&store, &live, DISPLAY)
            .into_record(&HashMap::new(), &[], "now")
            .unwrap();

        assert_ne!(record.ungrouped_tabs[0].id, record.ungrouped_tabs[1].id);
    }

    #[test]
    fn test_is_display_page_fallback_for_unparseable() {
        assert!(is_display_page("display.html", "display.html"));
        assert!(!is_display_page("https://a.test/display.html", DISPLAY));
    }
}
