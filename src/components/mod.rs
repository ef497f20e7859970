//! UI components rendered by the application shell.

pub mod header;
