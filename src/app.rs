//! Root application component and composition root.
//!
//! ARCHITECTURE
//! ============
//! `App` is the only place the session store, token store, theme resolver
//! and services are constructed. Components reach them through
//! [`AccountContext`]; rendering reads the mirrored `RwSignal<AuthState>` and
//! `RwSignal<ThemeMode>` so it reacts to changes without subscribing itself.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};

use crate::components::header::Header;
use crate::config::ApiConfig;
use crate::net::token::TokenStore;
use crate::observe::Subscription;
use crate::services::auth::AuthService;
use crate::services::profile::ProfileService;
use crate::state::auth::AuthState;
use crate::state::session::SessionStore;
use crate::state::theme::{ThemeApplier, ThemeMode, ThemeResolver};
use crate::storage;
use crate::util::dark_mode::{DocumentTheme, MediaQueryColorScheme};

/// Handles to the application's stateful services, provided as context.
#[derive(Clone, Debug)]
pub struct AccountContext {
    pub session: SessionStore,
    pub theme: ThemeResolver,
    pub auth: AuthService,
    pub profile: ProfileService,
    /// Keeps the session → `AuthState` mirror alive for the app's lifetime.
    _auth_mirror: Arc<Subscription>,
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the stores, wires the theme resolver to the session and provides
/// everything as context.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store = storage::default_store();
    let session = SessionStore::new(Arc::clone(&store));
    let tokens = TokenStore::new(Arc::clone(&store));

    let auth_state = RwSignal::new(AuthState::from(session.get_user()));
    let theme_mode = RwSignal::new(ThemeMode::default());

    let applier: Arc<dyn ThemeApplier> = Arc::new(move |mode: ThemeMode| {
        DocumentTheme.apply_mode(mode);
        theme_mode.set(mode);
    });
    let theme = ThemeResolver::new(&session, store, Arc::new(MediaQueryColorScheme), applier);

    let auth_mirror = session.subscribe(move |user| auth_state.set(AuthState::from(user.clone())));

    let auth = AuthService::new(ApiConfig::from_env(), session.clone(), tokens);
    let profile = ProfileService::new(auth.clone());

    provide_context(AccountContext { session, theme, auth, profile, _auth_mirror: Arc::new(auth_mirror) });
    provide_context(auth_state);
    provide_context(theme_mode);

    view! {
        <Stylesheet id="leptos" href="/pkg/account-client.css"/>
        <Title text="Accounts"/>

        <Header/>
    }
}
