//! Durable key-value persistence surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! Session and theme state persist through this trait so they can be tested
//! against `MemoryStore` and run against `localStorage` in the browser.
//! Callers treat every error as recoverable: in-memory state stays
//! authoritative and the failure is logged.

pub mod browser;
pub mod memory;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use browser::LocalStorage;
pub use memory::MemoryStore;

/// Error returned by a [`KeyValueStore`] operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage rejected write: {0}")]
    Rejected(String),
}

/// Synchronous string key-value store scoped to the device/profile.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store cannot be reached.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Store used by the application shell: `localStorage` in the browser,
/// a process-local map for SSR and native builds.
pub fn default_store() -> Arc<dyn KeyValueStore> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(LocalStorage)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(MemoryStore::new())
    }
}
