//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The application shell mirrors every session notification into an
//! `RwSignal<AuthState>` so components re-render on login and logout without
//! holding a session subscription themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Authentication state as seen by the view layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Name shown in the header; `"Guest"` when signed out.
    pub fn display_name(&self) -> &str {
        self.user.as_ref().map_or("Guest", |u| u.name.as_str())
    }

    /// Whether the signed-in user carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().and_then(|u| u.role.as_deref()).is_some_and(|role| role.eq_ignore_ascii_case("admin"))
    }
}

impl From<Option<User>> for AuthState {
    fn from(user: Option<User>) -> Self {
        Self { user }
    }
}
