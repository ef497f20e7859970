//! Store doubles for exercising storage failure paths.

use super::{KeyValueStore, MemoryStore, StorageError};

/// Reads come from `inner`; every write and removal is rejected, as when
/// `localStorage` is full or disabled.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReadOnlyStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Rejected("QuotaExceededError".to_owned()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
