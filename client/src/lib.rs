//! # storefront-client
//!
//! Leptos + WASM frontend for the storefront and the admin dashboard.
//!
//! This crate contains pages, components and the reactive mirror of the
//! session. Everything that talks to the CMS, decides access or holds form
//! state lives in the `storefront` crate; screens here only render it and
//! forward user input.

pub mod app;
pub mod components;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install panic and log hooks, then mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
