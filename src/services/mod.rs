//! Application services bridging the REST API and local state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components call these instead of `net::api` directly so every successful
//! response lands in the session and token stores the same way.

pub mod auth;
pub mod profile;
