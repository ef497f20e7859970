//! Session store: the single source of truth for the signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Auth flows write here; the theme resolver and the application shell
//! observe it. The snapshot is persisted under [`SESSION_KEY`] so a reload
//! restores the session.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures are logged and swallowed; the in-memory snapshot stays
//! authoritative for the rest of the page lifetime. A stored snapshot that
//! does not parse is dropped and deleted on startup.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use crate::config::SESSION_KEY;
use crate::net::types::{User, UserPatch};
use crate::observe::{Broadcaster, Subscription};
use crate::storage::KeyValueStore;

/// Observable, persisted holder of the current [`User`].
///
/// Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct SessionStore {
    current: Broadcaster<Option<User>>,
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create the store and restore any persisted snapshot.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let restored = restore(storage.as_ref());
        Self { current: Broadcaster::new(restored), storage }
    }

    /// Replace the current user, persist it and notify subscribers.
    ///
    /// A user without an id is rejected.
    pub fn set_user(&self, user: User) {
        if !user.has_identity() {
            leptos::logging::warn!("session: ignoring user without id");
            return;
        }
        self.persist(&user);
        self.current.publish(Some(user));
    }

    pub fn get_user(&self) -> Option<User> {
        self.current.get()
    }

    /// Id of the current user without cloning the whole snapshot.
    pub fn user_id(&self) -> Option<String> {
        self.current.with(|user| user.as_ref().map(|u| u.id.clone()))
    }

    /// Merge `patch` over the current user. Does nothing when signed out.
    pub fn update_user(&self, patch: UserPatch) {
        let Some(mut user) = self.get_user() else {
            return;
        };
        patch.apply_to(&mut user);
        self.set_user(user);
    }

    /// Forget the current user and its persisted snapshot.
    pub fn clear_user(&self) {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            leptos::logging::warn!("session: failed to remove snapshot: {e}");
        }
        self.current.publish(None);
    }

    pub fn is_user_logged_in(&self) -> bool {
        self.current.with(Option::is_some)
    }

    /// Observe the current user. `listener` runs immediately with the current
    /// value and again after every change until the handle is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Option<User>) + Send + Sync + 'static,
    {
        self.current.subscribe(listener)
    }

    fn persist(&self, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                leptos::logging::warn!("session: failed to encode snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, &raw) {
            leptos::logging::warn!("session: failed to persist snapshot: {e}");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("user", &self.get_user()).finish_non_exhaustive()
    }
}

/// Load the persisted snapshot, deleting it if it is not a valid [`User`].
fn restore(storage: &dyn KeyValueStore) -> Option<User> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            leptos::logging::warn!("session: failed to read snapshot: {e}");
            return None;
        }
    };
    match serde_json::from_str::<User>(&raw) {
        Ok(user) if user.has_identity() => return Some(user),
        Ok(_) => leptos::logging::warn!("session: stored snapshot has no id, discarding"),
        Err(e) => leptos::logging::warn!("session: stored snapshot is corrupt, discarding: {e}"),
    }
    if let Err(e) = storage.remove(SESSION_KEY) {
        leptos::logging::warn!("session: failed to remove corrupt snapshot: {e}");
    }
    None
}
