/// Popup UI: tag the current window's tabs and archive them

use crate::bridge;
use crate::capture::plan_capture;
use crate::config::Settings;
use crate::error::Result;
use crate::messages::RuntimeMessage;
use crate::storage::{load_snapshot, save_snapshot};
use crate::tags::TagSelection;
use patternfly_yew::prelude::*;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlOptionElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Saving,
    Error(String),
}

/// What a save attempt ended with
#[derive(Debug, Clone, PartialEq)]
enum SaveOutcome {
    Saved { window_id: i32, tabs: usize, groups: usize },
    NothingNew,
}

#[derive(Properties, PartialEq, Default)]
pub struct PopupProps {
    #[prop_or_default]
    pub settings: Settings,
}

#[function_component(App)]
pub fn app(props: &PopupProps) -> Html {
    let settings = &props.settings;
    let state = use_state(|| AppState::Idle);
    let area = use_state(|| settings.area_placeholder.clone());
    let subjects = use_state(Vec::<String>::new);

    // Area change repopulates the subject list
    let on_area_change = {
        let area = area.clone();
        let subjects = subjects.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                area.set(select.value());
                subjects.set(Vec::new());
            }
        })
    };

    let on_subject_change = {
        let subjects = subjects.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                subjects.set(selected_values(&select));
            }
        })
    };

    // Save tabs handler
    let on_save = {
        let state = state.clone();
        let area = area.clone();
        let subjects = subjects.clone();
        let settings = settings.clone();

        Callback::from(move |_| {
            let state = state.clone();
            let settings = settings.clone();
            let selection = TagSelection {
                area: (*area).clone(),
                subjects: (*subjects).clone(),
            };

            state.set(AppState::Saving);

            spawn_local(async move {
                let tags = selection.tags(&settings.area_placeholder, &settings.subject_sentinels);

                match save_current_window(&settings, tags).await {
                    Ok(SaveOutcome::Saved { window_id, tabs, groups }) => {
                        log::info!("Saved {} tabs and {} groups from window {}", tabs, groups, window_id);
                        bridge::send_message(&RuntimeMessage::user("Tabs saved successfully!"));
                        // Sent before closing: this popup dies with its window
                        bridge::send_message(&RuntimeMessage::OpenDisplayPage);
                        if let Err(e) = bridge::close_window(window_id).await {
                            log::error!("{}", e);
                        }
                        state.set(AppState::Idle);
                    }
                    Ok(SaveOutcome::NothingNew) => {
                        bridge::send_message(&RuntimeMessage::user("No new tabs or groups to save"));
                        bridge::close_popup();
                    }
                    Err(e) => {
                        let e = e.save_failed();
                        log::error!("{}", e);
                        bridge::send_message(&RuntimeMessage::log(format!("Error saving: {}", e)));
                        bridge::send_message(&RuntimeMessage::user("There was a problem saving!"));
                        state.set(AppState::Error(e.to_string()));
                    }
                }
            });
        })
    };

    // View saved items handler
    let on_view_saved = Callback::from(move |_| {
        bridge::send_message(&RuntimeMessage::OpenDisplayPage);
        bridge::close_popup();
    });

    let is_busy = !matches!(*state, AppState::Idle);
    let subject_options = settings.catalog.subjects(&area);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Tagger"}</h1>

            {match &*state {
                AppState::Saving => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Saving tabs..."}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            <div class="flex-column-gap">
                <select id="area" name="areatag" onchange={on_area_change}>
                    <option value={settings.area_placeholder.clone()} selected={*area == settings.area_placeholder}>
                        {"Area"}
                    </option>
                    {for settings.catalog.area_names().map(|name| html! {
                        <option value={name.to_string()} selected={*area == name}>{name}</option>
                    })}
                </select>

                <select
                    id="subject"
                    name="subjecttags"
                    multiple={true}
                    disabled={subject_options.is_none()}
                    onchange={on_subject_change}
                >
                    {for subject_options.unwrap_or_default().iter().map(|subject| html! {
                        <option value={subject.clone()} selected={subjects.contains(subject)}>
                            {subject}
                        </option>
                    })}
                </select>

                <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {"Save Current Window"}
                </Button>
                <Button onclick={on_view_saved} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"View Saved Items"}
                </Button>
            </div>

            <p class="footer-popup">
                {"Tab Tagger v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

/// Capture the current window into storage. Writes nothing unless there is something new.
async fn save_current_window(settings: &Settings, tags: Vec<String>) -> Result<SaveOutcome> {
    let window = bridge::current_window().await?;
    if window.tabs.is_empty() {
        return Ok(SaveOutcome::NothingNew);
    }

    let base = load_snapshot(settings).await?;
    let display_page = bridge::display_page_url(&settings.display_page);
    let plan = plan_capture(&base.items, &window, &display_page);

    for url in &plan.skipped {
        log::debug!("Skipping duplicate tab: {}", url);
        bridge::send_message(&RuntimeMessage::user(format!("Skipping duplicate tab: {}", url)));
    }

    if plan.is_empty() {
        return Ok(SaveOutcome::NothingNew);
    }

    let mut groups = HashMap::new();
    for group_id in plan.group_ids() {
        groups.insert(group_id, bridge::tab_group(group_id).await?);
    }

    let increment = plan.into_record(&groups, &tags, &bridge::now_iso8601())?;
    let outcome = SaveOutcome::Saved {
        window_id: window.id,
        tabs: increment.ungrouped_tabs.len(),
        groups: increment.tab_groups.len(),
    };

    let mut items = base.items.clone();
    items.merge_window(&window.id.to_string(), increment);
    save_snapshot(settings, &base, items).await?;

    Ok(outcome)
}

fn selected_values(select: &HtmlSelectElement) -> Vec<String> {
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.value())
        .collect()
}
