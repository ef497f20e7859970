//! Login, registration and logout.
//!
//! The network layer only produces `{ token?, user? }`; this service owns
//! what happens next: the token goes to the [`TokenStore`], the user to the
//! [`SessionStore`].

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::config::ApiConfig;
use crate::net::api::{self, ApiError};
use crate::net::token::TokenStore;
use crate::net::types::{AuthResponse, AuthUser, LoginPayload, RegisterPayload, User};
use crate::state::session::SessionStore;

#[derive(Clone, Debug)]
pub struct AuthService {
    config: ApiConfig,
    session: SessionStore,
    tokens: TokenStore,
}

impl AuthService {
    pub fn new(config: ApiConfig, session: SessionStore, tokens: TokenStore) -> Self {
        Self { config, session, tokens }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Sign in and record the resulting session.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; local state is untouched on failure.
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, ApiError> {
        let resp = api::login(&self.config, payload).await?;
        self.accept(&resp);
        Ok(resp)
    }

    /// Create an account and record the resulting session, if the server
    /// returned one.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; local state is untouched on failure.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, ApiError> {
        let resp = api::register(&self.config, payload).await?;
        self.accept(&resp);
        Ok(resp)
    }

    /// Store the token and user carried by a successful auth response.
    ///
    /// Returns the user that became the session, if any.
    pub fn accept(&self, resp: &AuthResponse) -> Option<User> {
        if let Some(token) = resp.token.as_deref() {
            self.tokens.set_token(token);
        }
        let user = resp.user.clone().and_then(AuthUser::into_user)?;
        self.session.set_user(user.clone());
        Some(user)
    }

    /// Drop the token and destroy the session.
    pub fn logout(&self) {
        self.tokens.clear_token();
        self.session.clear_user();
    }

    /// `true` while an identity token is held.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.has_token()
    }
}
