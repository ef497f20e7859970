//! Top bar: signed-in user, theme toggle and logout.

#[cfg(test)]
#[path = "header_test.rs"]
mod header_test;

use leptos::prelude::*;

use crate::app::AccountContext;
use crate::state::auth::AuthState;
use crate::state::theme::ThemeMode;

/// Label for the toggle button: names the mode a click switches to.
fn toggle_label(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "Dark mode",
        ThemeMode::Dark => "Light mode",
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let ctx = expect_context::<AccountContext>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let mode = expect_context::<RwSignal<ThemeMode>>();

    let theme = ctx.theme.clone();
    let on_toggle = move |_: leptos::ev::MouseEvent| theme.toggle_theme();
    let auth_service = ctx.auth.clone();
    let on_logout = move |_: leptos::ev::MouseEvent| auth_service.logout();

    view! {
        <header class="app-header">
            <span class="app-header__title">"Accounts"</span>
            <span class="app-header__user">{move || auth.get().display_name().to_owned()}</span>
            <Show when=move || auth.get().is_admin()>
                <span class="app-header__badge">"admin"</span>
            </Show>
            <button class="app-header__theme" on:click=on_toggle>
                {move || toggle_label(mode.get())}
            </button>
            <button
                class="app-header__logout"
                disabled=move || !auth.get().is_signed_in()
                on:click=on_logout
            >
                "Log out"
            </button>
        </header>
    }
}
