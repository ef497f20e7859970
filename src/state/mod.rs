//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` and `theme` hold the durable, observable state; `auth` is the
//! reactive view of the session that components render from.

pub mod auth;
pub mod session;
pub mod theme;
