//! Theme resolver: per-user light/dark preference with global and system
//! fallbacks.
//!
//! DESIGN
//! ======
//! Resolution is an ordered list of rules, each returning an optional mode;
//! the first hit wins:
//!
//! 1. the current user's scoped key,
//! 2. the global key,
//! 3. the system colour-scheme signal (never persisted).
//!
//! User scope always beats global scope, whatever was written last. The
//! resolver re-runs the chain at construction and on every session
//! notification, and calls the [`ThemeApplier`] hook only when the active
//! mode actually changes (plus once at construction).
//!
//! LIFECYCLE
//! =========
//! The session subscription is released when the last resolver handle is
//! dropped, or earlier via [`ThemeResolver::dispose`].

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use super::session::SessionStore;
use crate::config::{GLOBAL_THEME_KEY, user_theme_key};
use crate::observe::Subscription;
use crate::storage::KeyValueStore;

/// Display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not `"light"` or `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported theme mode: {0:?}")]
pub struct ParseThemeModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeModeError(other.to_owned())),
        }
    }
}

/// OS-level colour-scheme signal, read once per resolution.
pub trait ColorSchemeSignal: Send + Sync {
    /// `true` when the system asks for dark mode. Report `false` when the
    /// signal is unavailable.
    fn prefers_dark_mode(&self) -> bool;
}

/// Fixed answer, for SSR and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedColorScheme {
    pub prefers_dark: bool,
}

impl ColorSchemeSignal for FixedColorScheme {
    fn prefers_dark_mode(&self) -> bool {
        self.prefers_dark
    }
}

/// Side effect run when the active mode changes (e.g. restyle the page).
pub trait ThemeApplier: Send + Sync {
    fn apply_mode(&self, mode: ThemeMode);
}

impl<F> ThemeApplier for F
where
    F: Fn(ThemeMode) + Send + Sync,
{
    fn apply_mode(&self, mode: ThemeMode) {
        self(mode);
    }
}

// =============================================================================
// RESOLUTION CHAIN
// =============================================================================

/// Inputs to one resolution run.
struct ResolveScope<'a> {
    storage: &'a dyn KeyValueStore,
    user_id: Option<&'a str>,
    system: &'a dyn ColorSchemeSignal,
}

type ResolveRule = fn(&ResolveScope<'_>) -> Option<ThemeMode>;

const RESOLUTION_ORDER: [ResolveRule; 3] = [user_scoped, global_scoped, system_default];

fn resolve(scope: &ResolveScope<'_>) -> ThemeMode {
    RESOLUTION_ORDER.iter().find_map(|rule| rule(scope)).unwrap_or_default()
}

fn user_scoped(scope: &ResolveScope<'_>) -> Option<ThemeMode> {
    let user_id = scope.user_id?;
    read_mode(scope.storage, &user_theme_key(user_id))
}

fn global_scoped(scope: &ResolveScope<'_>) -> Option<ThemeMode> {
    read_mode(scope.storage, GLOBAL_THEME_KEY)
}

fn system_default(scope: &ResolveScope<'_>) -> Option<ThemeMode> {
    Some(if scope.system.prefers_dark_mode() { ThemeMode::Dark } else { ThemeMode::Light })
}

/// Persisted mode under `key`. Missing, unreadable and foreign values all
/// count as absent so the next rule gets a chance.
fn read_mode(storage: &dyn KeyValueStore, key: &str) -> Option<ThemeMode> {
    match storage.get(key) {
        Ok(Some(raw)) => match raw.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                leptos::logging::warn!("theme: ignoring value under {key}: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            leptos::logging::warn!("theme: failed to read {key}: {e}");
            None
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

struct ResolverState {
    active: ThemeMode,
    user_id: Option<String>,
}

struct ResolverCore {
    state: Mutex<ResolverState>,
    storage: Arc<dyn KeyValueStore>,
    system: Arc<dyn ColorSchemeSignal>,
    applier: Arc<dyn ThemeApplier>,
    session_sub: Mutex<Option<Subscription>>,
}

impl ResolverCore {
    fn lock(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve_for(&self, user_id: Option<&str>) -> ThemeMode {
        resolve(&ResolveScope { storage: self.storage.as_ref(), user_id, system: self.system.as_ref() })
    }

    /// Session changed: switch scope and re-run the chain.
    fn on_session_change(&self, user_id: Option<String>) {
        let next = self.resolve_for(user_id.as_deref());
        let changed = {
            let mut state = self.lock();
            state.user_id = user_id;
            let changed = state.active != next;
            state.active = next;
            changed
        };
        if changed {
            self.applier.apply_mode(next);
        }
    }
}

/// Resolves, persists and applies the active [`ThemeMode`].
///
/// Cloning yields another handle to the same resolver.
#[derive(Clone)]
pub struct ThemeResolver {
    core: Arc<ResolverCore>,
}

impl ThemeResolver {
    /// Resolve for the session's current user, apply the result, and follow
    /// the session from now on.
    pub fn new(
        session: &SessionStore,
        storage: Arc<dyn KeyValueStore>,
        system: Arc<dyn ColorSchemeSignal>,
        applier: Arc<dyn ThemeApplier>,
    ) -> Self {
        let user_id = session.user_id();
        let active = resolve(&ResolveScope {
            storage: storage.as_ref(),
            user_id: user_id.as_deref(),
            system: system.as_ref(),
        });
        let core = Arc::new(ResolverCore {
            state: Mutex::new(ResolverState { active, user_id }),
            storage,
            system,
            applier,
            session_sub: Mutex::new(None),
        });
        core.applier.apply_mode(active);

        let weak: Weak<ResolverCore> = Arc::downgrade(&core);
        let sub = session.subscribe(move |user| {
            if let Some(core) = weak.upgrade() {
                core.on_session_change(user.as_ref().map(|u| u.id.clone()));
            }
        });
        *core.session_sub.lock().unwrap_or_else(PoisonError::into_inner) = Some(sub);

        Self { core }
    }

    /// Active mode, without re-resolving.
    pub fn get_theme(&self) -> ThemeMode {
        self.core.lock().active
    }

    /// Persist `mode` for the current scope (user if signed in, else global)
    /// and make it active. The hook runs only if the active mode changes.
    pub fn set_theme(&self, mode: ThemeMode) {
        let (key, changed) = {
            let mut state = self.core.lock();
            let key = state.user_id.as_deref().map_or_else(|| GLOBAL_THEME_KEY.to_owned(), user_theme_key);
            let changed = state.active != mode;
            state.active = mode;
            (key, changed)
        };
        if let Err(e) = self.core.storage.set(&key, mode.as_str()) {
            leptos::logging::warn!("theme: failed to persist {key}: {e}");
        }
        if changed {
            self.core.applier.apply_mode(mode);
        }
    }

    /// [`set_theme`](Self::set_theme) from untrusted input such as a form
    /// value. Anything other than `"light"`/`"dark"` is ignored.
    pub fn set_theme_str(&self, raw: &str) {
        match raw.parse::<ThemeMode>() {
            Ok(mode) => self.set_theme(mode),
            Err(e) => leptos::logging::log!("theme: {e}"),
        }
    }

    pub fn toggle_theme(&self) {
        self.set_theme(self.get_theme().toggled());
    }

    /// Stop following the session. Idempotent; also happens when the last
    /// handle is dropped.
    pub fn dispose(&self) {
        let sub = self.core.session_sub.lock().unwrap_or_else(PoisonError::into_inner).take();
        drop(sub);
    }
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.core.lock();
        f.debug_struct("ThemeResolver")
            .field("active", &state.active)
            .field("user_id", &state.user_id)
            .finish_non_exhaustive()
    }
}
