/// UI module exports
pub mod components;
pub mod display;
pub mod popup;
