//! Holder for the opaque identity token issued at login/registration.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::sync::Arc;

use crate::config::TOKEN_KEY;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persisted token, if any. Read failures count as signed out.
    pub fn get_token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                leptos::logging::warn!("token read failed: {e}");
                None
            }
        }
    }

    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// Persist `token`. Empty tokens are ignored.
    pub fn set_token(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            leptos::logging::warn!("token write failed: {e}");
        }
    }

    pub fn clear_token(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            leptos::logging::warn!("token removal failed: {e}");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("has_token", &self.has_token()).finish()
    }
}
