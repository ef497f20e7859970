//! # account-client
//!
//! Leptos + WASM client for the user-account application: registration,
//! login, profile management, per-user theme preference and the admin user
//! listing.
//!
//! The interesting state lives in [`state`]: the [`state::session`] store is
//! the single source of truth for "who is signed in", and the
//! [`state::theme`] resolver derives the active display mode from it.
//! [`services`] connect the REST layer in [`net`] to those stores, and
//! [`app`] is the composition root that owns them.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod observe;
pub mod services;
pub mod state;
pub mod storage;
pub mod util;

/// WASM entry point: installs browser logging and hydrates the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
