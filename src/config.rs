//! API endpoint and storage-key configuration.
//!
//! Browser builds have no process environment, so the API base URL is baked
//! in at compile time from `ACCOUNT_API_BASE_URL`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Storage key holding the serialized session snapshot.
pub const SESSION_KEY: &str = "currentUser";
/// Storage key holding the opaque identity token.
pub const TOKEN_KEY: &str = "authToken";
/// Storage key for the device-wide theme preference.
pub const GLOBAL_THEME_KEY: &str = "app_theme_mode";
/// Prefix for per-user theme preference keys; the user id is appended.
pub const USER_THEME_KEY_PREFIX: &str = "app_theme_mode:";

/// Per-user theme key for `user_id`.
pub fn user_theme_key(user_id: &str) -> String {
    format!("{USER_THEME_KEY_PREFIX}{user_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_API_BASE_URL.to_owned() }
    }
}

impl ApiConfig {
    /// Build config from the compile-time environment.
    ///
    /// Optional:
    /// - `ACCOUNT_API_BASE_URL`: default `http://localhost:3000/api`
    pub fn from_env() -> Self {
        Self::from_base_url(option_env!("ACCOUNT_API_BASE_URL"))
    }

    /// Normalize a raw base URL. Blank values fall back to the default and a
    /// trailing `/` is dropped so endpoint joins never double up.
    pub fn from_base_url(raw: Option<&str>) -> Self {
        let base = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_API_BASE_URL);
        Self { base_url: base.trim_end_matches('/').to_owned() }
    }

    pub fn register_url(&self) -> String {
        format!("{}/auth/register", self.base_url)
    }

    pub fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url)
    }

    pub fn profile_url(&self) -> String {
        format!("{}/users/profile", self.base_url)
    }

    pub fn all_users_url(&self) -> String {
        format!("{}/users/all", self.base_url)
    }
}
