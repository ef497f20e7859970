//! Browser bindings for the theme resolver.
//!
//! `MediaQueryColorScheme` reads `prefers-color-scheme` and `DocumentTheme`
//! restyles the `<html>` element through a `data-theme` attribute plus a
//! `theme-light`/`theme-dark` class. Requires a browser environment.
//!
//! TRADE-OFFS
//! ==========
//! Both are best-effort browser-only behavior; SSR paths safely no-op to keep
//! server rendering deterministic.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use crate::state::theme::{ColorSchemeSignal, ThemeApplier, ThemeMode};

/// Class added to `<html>` for `mode`.
pub fn theme_class(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "theme-light",
        ThemeMode::Dark => "theme-dark",
    }
}

/// System preference via `matchMedia("(prefers-color-scheme: dark)")`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MediaQueryColorScheme;

impl ColorSchemeSignal for MediaQueryColorScheme {
    fn prefers_dark_mode(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return false;
            };
            match window.match_media("(prefers-color-scheme: dark)") {
                Ok(Some(mq)) => mq.matches(),
                Ok(None) | Err(_) => false,
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }
}

/// Applies the active mode to the document root.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

#[cfg(feature = "hydrate")]
impl ThemeApplier for DocumentTheme {
    fn apply_mode(&self, mode: ThemeMode) {
        let Some(el) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.document_element()) else {
            return;
        };
        if let Err(e) = el.set_attribute("data-theme", mode.as_str()) {
            leptos::logging::warn!("theme: failed to set data-theme: {e:?}");
        }
        let classes = el.class_list();
        let stale = theme_class(mode.toggled());
        if let Err(e) = classes.remove_1(stale).and_then(|()| classes.add_1(theme_class(mode))) {
            leptos::logging::warn!("theme: failed to update root class: {e:?}");
        }
    }
}

/// No document outside the browser.
#[cfg(not(feature = "hydrate"))]
impl ThemeApplier for DocumentTheme {
    fn apply_mode(&self, _mode: ThemeMode) {}
}
