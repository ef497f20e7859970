//! REST API helpers for the account endpoints.
//!
//! Every endpoint is described once and handed to `send`, the only
//! transport-specific function.
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native builds: every call returns
//! [`ApiError::Unavailable`] since these endpoints are only meaningful in the
//! browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses carry the server's `{ "message": ... }` text when the
//! body has one, so callers can surface it directly in the UI.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiMessage, AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload, UserProfile};
use crate::config::ApiConfig;

#[cfg(any(test, feature = "hydrate"))]
const FALLBACK_ERROR_MESSAGE: &str = "request failed";

/// Error returned by the REST helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
    #[error("invalid request body: {0}")]
    Encode(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("not signed in")]
    MissingToken,
    #[error("not available on server")]
    Unavailable,
}

#[cfg(feature = "hydrate")]
impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Map a non-2xx status and its raw body to an [`ApiError::Status`].
#[cfg(any(test, feature = "hydrate"))]
fn status_error(status: u16, body: &str) -> ApiError {
    let message = match serde_json::from_str::<ApiMessage>(body) {
        Ok(parsed) if !parsed.message.trim().is_empty() => parsed.message,
        _ => FALLBACK_ERROR_MESSAGE.to_owned(),
    };
    ApiError::Status { status, message }
}

/// `Authorization` header value for `token`.
#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn require_token(token: Option<&str>) -> Result<&str, ApiError> {
    token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)
}

/// 2xx status.
#[cfg(any(test, feature = "hydrate"))]
fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// HTTP method of an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

#[cfg(feature = "hydrate")]
async fn read_json<T: DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    if !is_success(resp.status()) {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(resp.status(), &body));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Perform one call and decode the JSON response.
#[cfg(feature = "hydrate")]
async fn send<T: DeserializeOwned>(
    verb: Verb,
    url: String,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Result<T, ApiError> {
    use gloo_net::http::Request;

    let mut builder = match verb {
        Verb::Get => Request::get(&url),
        Verb::Post => Request::post(&url),
        Verb::Put => Request::put(&url),
        Verb::Delete => Request::delete(&url),
    };
    if let Some(token) = token {
        builder = builder.header("Authorization", &bearer(token));
    }
    let request = match body {
        Some(body) => builder.json(&body)?,
        None => builder.build()?,
    };
    read_json(request.send().await?).await
}

#[cfg(not(feature = "hydrate"))]
async fn send<T: DeserializeOwned>(
    _verb: Verb,
    _url: String,
    _token: Option<&str>,
    _body: Option<serde_json::Value>,
) -> Result<T, ApiError> {
    Err(ApiError::Unavailable)
}

// =============================================================================
// ENDPOINTS
// =============================================================================


/// Create an account via `POST {base}/auth/register`.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects it.
pub async fn register(config: &ApiConfig, payload: &RegisterPayload) -> Result<AuthResponse, ApiError> {
    send(Verb::Post, config.register_url(), None, Some(encode(payload)?)).await
}

/// Sign in via `POST {base}/auth/login`.
///
/// # Errors
///
/// Returns an error if the request fails or the credentials are rejected.
pub async fn login(config: &ApiConfig, payload: &LoginPayload) -> Result<AuthResponse, ApiError> {
    send(Verb::Post, config.login_url(), None, Some(encode(payload)?)).await
}

/// Fetch the signed-in user's profile from `GET {base}/users/profile`.
///
/// # Errors
///
/// Returns an error without a token, or if the request fails.
pub async fn fetch_profile(config: &ApiConfig, token: Option<&str>) -> Result<UserProfile, ApiError> {
    let token = require_token(token)?;
    send(Verb::Get, config.profile_url(), Some(token), None).await
}

/// Update name/email/password via `PUT {base}/users/profile`.
///
/// # Errors
///
/// Returns an error without a token, or if the server rejects the update
/// (for example an email already in use).
pub async fn update_profile(
    config: &ApiConfig,
    token: Option<&str>,
    payload: &UpdateProfilePayload,
) -> Result<UserProfile, ApiError> {
    let token = require_token(token)?;
    send(Verb::Put, config.profile_url(), Some(token), Some(encode(payload)?)).await
}

/// Delete the signed-in account via `DELETE {base}/users/profile`.
///
/// # Errors
///
/// Returns an error without a token, or if the request fails.
pub async fn delete_profile(config: &ApiConfig, token: Option<&str>) -> Result<ApiMessage, ApiError> {
    let token = require_token(token)?;
    send(Verb::Delete, config.profile_url(), Some(token), None).await
}

/// List every account via `GET {base}/users/all` (admin listing).
///
/// # Errors
///
/// Returns an error without a token, or if the request fails.
pub async fn fetch_all_users(config: &ApiConfig, token: Option<&str>) -> Result<Vec<UserProfile>, ApiError> {
    let token = require_token(token)?;
    send(Verb::Get, config.all_users_url(), Some(token), None).await
}
