use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::store::{CacheEntry, CacheError, CacheStore};
use crate::types::CacheKey;

/// Process-local cache, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry with an explicit write time.
    pub fn insert_entry(&self, key: CacheKey, entry: CacheEntry) {
        self.lock().insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // Entries are plain data; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        self.lock()
            .insert(key.clone(), CacheEntry::new(bytes.to_vec(), Utc::now()));
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.lock().remove(key);
        Ok(())
    }
}
