/// Tab Tagger - Chrome Extension that tags and archives a window's tabs
/// Built with Rust + WASM + Yew

mod background;
mod bridge;
mod capture;
mod config;
mod error;
mod messages;
mod operations;
mod render;
mod storage;
mod tab_data;
mod tags;
pub mod ui;

pub use config::Settings;
use wasm_bindgen::prelude::*;

pub use bridge::now_iso8601;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

#[wasm_bindgen]
pub fn start_popup_with_settings(settings: JsValue) {
    let props = ui::popup::PopupProps {
        settings: Settings::from_js(settings),
    };
    yew::Renderer::<ui::popup::App>::with_props(props).render();
}

// Start the Yew app for the saved items display page
#[wasm_bindgen]
pub fn start_display() {
    yew::Renderer::<ui::display::SavedItemsViewer>::new().render();
}

#[wasm_bindgen]
pub fn start_display_with_settings(settings: JsValue) {
    let props = ui::display::DisplayProps {
        settings: Settings::from_js(settings),
    };
    yew::Renderer::<ui::display::SavedItemsViewer>::with_props(props).render();
}

// Service worker entry point
#[wasm_bindgen]
pub fn start_background() {
    background::start(Settings::default());
}

#[wasm_bindgen]
pub fn start_background_with_settings(settings: JsValue) {
    background::start(Settings::from_js(settings));
}
