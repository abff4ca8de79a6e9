/// Service worker: logs messages from other contexts and brings up the display page

use crate::bridge;
use crate::config::Settings;
use crate::error::Result;
use crate::messages::RuntimeMessage;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;

/// Where the display page should appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    /// A display tab already exists; bring it forward
    Focus(i32),
    /// Open a pinned display tab in this window
    OpenIn(i32),
    /// No suitable window; create one first
    CreateWindow,
}

/// Prefer an existing display tab, then any window other than the current one
pub fn choose_display_target(display_tabs: &[i32], windows: &[i32], current: Option<i32>) -> DisplayTarget {
    if let Some(tab_id) = display_tabs.first() {
        return DisplayTarget::Focus(*tab_id);
    }

    windows
        .iter()
        .find(|id| Some(**id) != current)
        .map(|id| DisplayTarget::OpenIn(*id))
        .unwrap_or(DisplayTarget::CreateWindow)
}

pub fn start(settings: Settings) {
    log::info!("Service worker started.");
    let settings = Rc::new(settings);

    bridge::on_message(move |message| match message {
        RuntimeMessage::Log { message } => log::info!("[From extension] {}", message),
        RuntimeMessage::LogMessage { message } => log::info!("[Message] {}", message),
        RuntimeMessage::OpenDisplayPage => {
            let settings = settings.clone();
            spawn_local(async move {
                if let Err(e) = open_display_page(&settings).await {
                    log::error!("Could not open display page: {}", e);
                }
            });
        }
        // Meant for the display page
        RuntimeMessage::UserMessage { .. } => {}
    });
}

async fn open_display_page(settings: &Settings) -> Result<()> {
    let url = bridge::display_page_url(&settings.display_page);
    let display_tabs = bridge::tab_ids_with_url(&url).await?;
    let windows = bridge::window_ids().await?;
    let current = bridge::current_window_id().await?;

    match choose_display_target(&display_tabs, &windows, current) {
        DisplayTarget::Focus(tab_id) => {
            bridge::focus_tab(tab_id).await?;
            log::info!("Focused existing display tab {}", tab_id);
        }
        DisplayTarget::OpenIn(window_id) => {
            bridge::open_pinned_tab(window_id, &url).await?;
            log::info!("Display tab created and pinned in window {}", window_id);
        }
        DisplayTarget::CreateWindow => {
            log::info!("No other window found, creating a new one");
            let window_id = bridge::create_empty_window().await?;
            bridge::open_pinned_tab(window_id, &url).await?;
            log::info!("Display tab created and pinned in window {}", window_id);
        }
    }

    Ok(())
}
