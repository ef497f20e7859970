//! Profile view/update/delete and the admin user listing.
//!
//! SYSTEM CONTEXT
//! ==============
//! Server-confirmed profile data is merged back into the session so the
//! header and anything else observing it stay in step with the account.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::auth::AuthService;
use crate::net::api::{self, ApiError};
use crate::net::types::{UpdateProfilePayload, UserPatch, UserProfile};

#[derive(Clone, Debug)]
pub struct ProfileService {
    auth: AuthService,
}

impl ProfileService {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    /// Fetch the signed-in profile and refresh the session from it.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the request fails.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let token = self.auth.tokens().get_token();
        let profile = api::fetch_profile(self.auth.config(), token.as_deref()).await?;
        self.merge_into_session(&profile);
        Ok(profile)
    }

    /// Send a partial update and merge the confirmed fields into the session.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out, or when the server rejects the
    /// update (for example an email already in use).
    pub async fn update_profile(&self, payload: &UpdateProfilePayload) -> Result<UserProfile, ApiError> {
        let token = self.auth.tokens().get_token();
        let profile = api::update_profile(self.auth.config(), token.as_deref(), payload).await?;
        self.merge_into_session(&profile);
        Ok(profile)
    }

    /// Delete the account, then sign out locally.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the request fails; the local
    /// session is kept in that case.
    pub async fn delete_account(&self) -> Result<String, ApiError> {
        let token = self.auth.tokens().get_token();
        let confirmation = api::delete_profile(self.auth.config(), token.as_deref()).await?;
        self.auth.logout();
        Ok(confirmation.message)
    }

    /// Every account, newest first as ordered by the server.
    ///
    /// # Errors
    ///
    /// Returns an error when signed out or when the request fails.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        let token = self.auth.tokens().get_token();
        api::fetch_all_users(self.auth.config(), token.as_deref()).await
    }

    /// Merge `profile` into the current session. Profiles for a different
    /// id are ignored; a missing id is taken to mean the current user.
    fn merge_into_session(&self, profile: &UserProfile) {
        let session = self.auth.session();
        let Some(current_id) = session.user_id() else {
            return;
        };
        if profile.id.as_deref().is_some_and(|id| id != current_id) {
            leptos::logging::warn!("profile: response for {:?} does not match session {current_id}", profile.id);
            return;
        }
        let patch = UserPatch::from(profile);
        if !patch.is_empty() {
            session.update_user(patch);
        }
    }
}
