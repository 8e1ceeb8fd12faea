//! # toraxview-client
//!
//! Leptos + WASM front-end for the ToraxVIEW chest X-ray triage workflow.
//!
//! Pages and components render the UI; `state` holds the page state machines
//! (session, analysis flow, record lists, user management, export) as plain
//! Rust types; `net` talks to the REST backend.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    leptos::mount::hydrate_body(app::App);
}
