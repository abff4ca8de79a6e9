/// Typed wrappers over the `chrome.*` calls exposed by extension.js

use crate::error::{Error, Result};
use crate::messages::RuntimeMessage;
use crate::tab_data::{GroupInfo, LiveWindow};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindow() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowId() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAllWindowIds() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTabGroup(group_id: i32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createTab(url: &str, active: bool) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createPinnedTab(window_id: i32, url: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createWindow(urls: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createEmptyWindow() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeWindow(window_id: i32) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabIdsByUrl(url: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn focusTab(tab_id: i32) -> std::result::Result<(), JsValue>;

    fn displayPageUrl(path: &str) -> String;

    fn sendRuntimeMessage(message: JsValue);

    fn onRuntimeMessage(callback: &js_sys::Function);

    fn closePopup();
}

pub async fn get_storage(key: &str) -> Result<JsValue> {
    getStorage(key)
        .await
        .map_err(|e| Error::storage("Failed to get storage", e))
}

pub async fn set_storage(items: JsValue) -> Result<()> {
    setStorage(items)
        .await
        .map_err(|e| Error::storage("Failed to save storage", e))
}

pub async fn current_window() -> Result<LiveWindow> {
    let window_js = getCurrentWindow()
        .await
        .map_err(|e| Error::browser("Failed to get current window", e))?;
    Ok(serde_wasm_bindgen::from_value(window_js)?)
}

pub async fn current_window_id() -> Result<Option<i32>> {
    let id_js = getCurrentWindowId()
        .await
        .map_err(|e| Error::browser("Failed to get current window", e))?;
    Ok(serde_wasm_bindgen::from_value(id_js)?)
}

pub async fn window_ids() -> Result<Vec<i32>> {
    let ids_js = getAllWindowIds()
        .await
        .map_err(|e| Error::browser("Failed to list windows", e))?;
    Ok(serde_wasm_bindgen::from_value(ids_js)?)
}

pub async fn tab_group(group_id: i32) -> Result<GroupInfo> {
    let group_js = getTabGroup(group_id)
        .await
        .map_err(|e| Error::browser(&format!("Failed to get tab group {}", group_id), e))?;
    Ok(serde_wasm_bindgen::from_value(group_js)?)
}

pub async fn open_tab(url: &str, active: bool) -> Result<()> {
    createTab(url, active)
        .await
        .map_err(|e| Error::browser("Failed to open tab", e))
}

pub async fn open_pinned_tab(window_id: i32, url: &str) -> Result<()> {
    createPinnedTab(window_id, url)
        .await
        .map_err(|e| Error::browser("Failed to open pinned tab", e))
}

pub async fn open_window(urls: &[String]) -> Result<()> {
    let urls_js = serde_wasm_bindgen::to_value(urls)?;
    createWindow(urls_js)
        .await
        .map_err(|e| Error::browser("Failed to open window", e))
}

pub async fn create_empty_window() -> Result<i32> {
    let id_js = createEmptyWindow()
        .await
        .map_err(|e| Error::browser("Failed to create window", e))?;
    Ok(serde_wasm_bindgen::from_value(id_js)?)
}

pub async fn close_window(window_id: i32) -> Result<()> {
    removeWindow(window_id)
        .await
        .map_err(|e| Error::browser("Failed to close window", e))
}

pub async fn tab_ids_with_url(url: &str) -> Result<Vec<i32>> {
    let ids_js = queryTabIdsByUrl(url)
        .await
        .map_err(|e| Error::browser("Failed to query tabs", e))?;
    Ok(serde_wasm_bindgen::from_value(ids_js)?)
}

pub async fn focus_tab(tab_id: i32) -> Result<()> {
    focusTab(tab_id)
        .await
        .map_err(|e| Error::browser("Failed to focus tab", e))
}

pub fn display_page_url(path: &str) -> String {
    displayPageUrl(path)
}

/// Fire-and-forget; a context with no listener is not an error
pub fn send_message(message: &RuntimeMessage) {
    match message.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(message_js) => sendRuntimeMessage(message_js),
        Err(e) => log::error!("Failed to serialize message {:?}: {}", message, e),
    }
}

/// Listen for runtime messages for the lifetime of the page
pub fn on_message(handler: impl Fn(RuntimeMessage) + 'static) {
    let callback = Closure::wrap(Box::new(move |message_js: JsValue| {
        match serde_wasm_bindgen::from_value::<RuntimeMessage>(message_js) {
            Ok(message) => handler(message),
            Err(e) => log::debug!("Ignoring unrecognised message: {}", e),
        }
    }) as Box<dyn Fn(JsValue)>);

    onRuntimeMessage(callback.as_ref().unchecked_ref());
    callback.forget();
}

pub fn close_popup() {
    closePopup()
}

/// Current time as an ISO-8601 string, the format stored in `savedAt`
pub fn now_iso8601() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
