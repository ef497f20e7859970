//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from state logic to
//! improve reuse and testability.

pub mod dark_mode;
