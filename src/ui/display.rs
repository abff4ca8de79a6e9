/// Display page: browse, reopen and delete saved windows

use crate::bridge;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::messages::{MessageBoard, RuntimeMessage};
use crate::operations::{Action, OpenTarget};
use crate::render::{render, DisplayTree, GroupView, ItemView, WindowView};
use crate::storage::{load_snapshot, save_snapshot, SavedStore, StoreSnapshot};
use crate::ui::components::{ItemRow, MessageList, WindowTitleView};
use patternfly_yew::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Working,
    Error(String),
}

#[derive(Properties, PartialEq, Default)]
pub struct DisplayProps {
    #[prop_or_default]
    pub settings: Settings,
}

#[function_component(SavedItemsViewer)]
pub fn saved_items_viewer(props: &DisplayProps) -> Html {
    let state = use_state(|| ViewState::Loading);
    let snapshot = use_state(StoreSnapshot::default);
    let board = use_mut_ref(MessageBoard::default);
    let busy = use_mut_ref(|| false);
    let refresh = use_force_update();

    let settings = Rc::new(props.settings.clone());

    // Load storage and start listening for user messages on mount
    {
        let state = state.clone();
        let snapshot = snapshot.clone();
        let board = board.clone();
        let refresh = refresh.clone();
        let settings = settings.clone();

        use_effect_with((), move |_| {
            let ttl = settings.message_ttl_ms;
            bridge::on_message(move |message| {
                if let RuntimeMessage::UserMessage { message } = message {
                    show_message(&board, &refresh, message, ttl);
                }
            });

            spawn_local(async move {
                match load_snapshot(&settings).await {
                    Ok(loaded) => {
                        snapshot.set(loaded);
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        log::error!("Failed to load saved items: {}", e);
                        state.set(ViewState::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    // Every click ends up here: apply, open, persist, re-render.
    // One action at a time; clicks while busy are dropped.
    let on_action = {
        let state = state.clone();
        let snapshot = snapshot.clone();
        let board = board.clone();
        let busy = busy.clone();
        let refresh = refresh.clone();
        let settings = settings.clone();

        Callback::from(move |action: Action| {
            if *busy.borrow() {
                log::debug!("Ignoring {:?} while another action runs", action);
                return;
            }

            if let Action::DeleteWindow(window_id) = &action {
                if !confirm_delete(window_id) {
                    return;
                }
            }

            *busy.borrow_mut() = true;
            state.set(ViewState::Working);

            let base = (*snapshot).clone();
            let state = state.clone();
            let snapshot = snapshot.clone();
            let board = board.clone();
            let busy = busy.clone();
            let refresh = refresh.clone();
            let settings = settings.clone();

            spawn_local(async move {
                match run_action(&settings, &base, &action).await {
                    Ok(Some(next)) => {
                        snapshot.set(next);
                        state.set(ViewState::Idle);
                    }
                    Ok(None) => state.set(ViewState::Idle),
                    Err(e) => {
                        log::error!("{:?} failed: {}", action, e);
                        let text = match e {
                            Error::Conflict { .. } => "Saved items changed in another view; reloaded.".to_string(),
                            other => format!("Could not update saved items: {}", other),
                        };
                        show_message(&board, &refresh, text, settings.message_ttl_ms);

                        match load_snapshot(&settings).await {
                            Ok(fresh) => {
                                snapshot.set(fresh);
                                state.set(ViewState::Idle);
                            }
                            Err(e) => state.set(ViewState::Error(format!("Failed to load: {}", e))),
                        }
                    }
                }
                *busy.borrow_mut() = false;
            });
        })
    };

    let tree = render(&snapshot.items);
    let messages = board.borrow().entries.clone();

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"Saved Tabs"}</h1>
            </div>

            <MessageList messages={messages} />

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading saved items..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Working => html! {
                    <p class="loading-text">{"Updating saved items..."}</p>
                },
                ViewState::Idle => html! {}
            }}

            <div id="savedItemsContainer">
                {match tree {
                    DisplayTree::Empty => html! {
                        <p class="empty-state">{"No items saved yet."}</p>
                    },
                    DisplayTree::Windows(windows) => html! {
                        <>
                            {for windows.into_iter().map(|window| {
                                let key = window.window_id.clone();
                                html! {
                                    <WindowSection
                                        key={key}
                                        window={window}
                                        on_action={on_action.clone()}
                                    />
                                }
                            })}
                        </>
                    },
                }}
            </div>

            // Footer stats
            <div class="footer">
                {format!("{} windows • {} saved tabs",
                    snapshot.items.windows.len(),
                    snapshot.items.total_items()
                )}
            </div>
        </div>
    }
}

// Window section component
#[derive(Properties, PartialEq)]
struct WindowSectionProps {
    window: WindowView,
    on_action: Callback<Action>,
}

#[function_component(WindowSection)]
fn window_section(props: &WindowSectionProps) -> Html {
    let window = &props.window;

    let on_item = props
        .on_action
        .reform(|(view, keep): (ItemView, bool)| Action::OpenItem { item: view.item, keep });

    let on_delete = props.on_action.reform({
        let window_id = window.window_id.clone();
        move |_: MouseEvent| Action::DeleteWindow(window_id.clone())
    });

    let on_restore = props.on_action.reform({
        let window_id = window.window_id.clone();
        move |_: MouseEvent| Action::RestoreWindow(window_id.clone())
    });

    html! {
        <div class="window-section">
            <div class="window-title-bar">
                <WindowTitleView title={window.title.clone()} />
                <div class="window-actions">
                    <Button onclick={on_delete} variant={ButtonVariant::Danger}>
                        {"Delete"}
                    </Button>
                    <Button onclick={on_restore} variant={ButtonVariant::Secondary}>
                        {"Restore"}
                    </Button>
                </div>
            </div>

            if !window.ungrouped.is_empty() {
                <div class="ungrouped-tabs-section">
                    <ul>
                        {for window.ungrouped.iter().map(|view| html! {
                            <ItemRow view={view.clone()} onclick={on_item.clone()} />
                        })}
                    </ul>
                </div>
            }

            if !window.groups.is_empty() {
                <div>
                    {for window.groups.iter().map(|group| html! {
                        <GroupSection
                            key={group.id.to_string()}
                            window_id={window.window_id.clone()}
                            group={group.clone()}
                            on_action={props.on_action.clone()}
                        />
                    })}
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct GroupSectionProps {
    window_id: String,
    group: GroupView,
    on_action: Callback<Action>,
}

#[function_component(GroupSection)]
fn group_section(props: &GroupSectionProps) -> Html {
    let group = &props.group;

    let on_title = props.on_action.reform({
        let window_id = props.window_id.clone();
        let group_id: Uuid = group.id;
        move |_: MouseEvent| Action::OpenGroup {
            window_id: window_id.clone(),
            group_id,
        }
    });

    let on_item = props
        .on_action
        .reform(|(view, keep): (ItemView, bool)| Action::OpenItem { item: view.item, keep });

    html! {
        <div class="tab-group-section" style={format!("border-color: {};", group.color)}>
            <h3
                class="group-title"
                style={format!("background-color: {};", group.color)}
                onclick={on_title}
            >
                {&group.title}
            </h3>
            <ul>
                {for group.items.iter().map(|view| html! {
                    <ItemRow view={view.clone()} grouped={true} onclick={on_item.clone()} />
                })}
            </ul>
        </div>
    }
}

// Helper functions

/// Apply an action to a copy of `base`, do the browser side, then persist.
/// Returns the new snapshot when the store changed.
///
/// On a revision conflict the tabs are already open, so the store edit alone
/// is replayed once against a fresh load.
async fn run_action(settings: &Settings, base: &StoreSnapshot, action: &Action) -> Result<Option<StoreSnapshot>> {
    let mut items = base.items.clone();
    let effect = action.apply(&mut items);

    match effect.target {
        OpenTarget::BackgroundTabs => {
            for url in &effect.open {
                bridge::open_tab(url, false).await?;
            }
        }
        OpenTarget::NewWindow => {
            if !effect.open.is_empty() {
                bridge::open_window(&effect.open).await?;
                log::info!("Restored {} tabs into a new window", effect.open.len());
            }
        }
    }

    if !effect.changed {
        return Ok(None);
    }

    match save_snapshot(settings, base, items).await {
        Err(Error::Conflict { .. }) => {
            let fresh = load_snapshot(settings).await?;
            match replay(&fresh, action) {
                Some(items) => {
                    log::info!("Replaying {:?} at revision {}", action, fresh.revision);
                    save_snapshot(settings, &fresh, items).await.map(Some)
                }
                None => Ok(Some(fresh)),
            }
        }
        saved => saved.map(Some),
    }
}

/// The store edit of `action` applied to `fresh`, or `None` when it no longer changes anything
fn replay(fresh: &StoreSnapshot, action: &Action) -> Option<SavedStore> {
    let mut items = fresh.items.clone();
    action.apply(&mut items).changed.then_some(items)
}

fn confirm_delete(window_id: &str) -> bool {
    let question = format!(
        "Are you sure you want to delete all saved items for Window ID: {}?",
        window_id
    );
    web_sys::window()
        .and_then(|w| w.confirm_with_message(&question).ok())
        .unwrap_or(false)
}

/// Add a message to the board and schedule its removal
fn show_message(board: &Rc<RefCell<MessageBoard>>, refresh: &UseForceUpdateHandle, text: String, ttl_ms: u32) {
    let id = board.borrow_mut().push(text);
    refresh.force_update();

    let board = board.clone();
    let refresh = refresh.clone();
    let dismiss = Closure::once_into_js(move || {
        board.borrow_mut().dismiss(id);
        refresh.force_update();
    });

    let scheduled = web_sys::window().map(|w| {
        w.set_timeout_with_callback_and_timeout_and_arguments_0(dismiss.unchecked_ref(), ttl_ms as i32)
    });
    if !matches!(scheduled, Some(Ok(_))) {
        log::warn!("Could not schedule message dismissal");
    }
}
