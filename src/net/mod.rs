//! Networking modules for the account REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `token` holds the identity token those calls
//! authenticate with, and `types` defines the shared wire schema.

pub mod api;
pub mod token;
pub mod types;
