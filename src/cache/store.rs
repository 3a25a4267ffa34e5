use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::types::CacheKey;

/// Entries older than this are treated as a miss.
pub const DEFAULT_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No platform cache directory available")]
    NoCacheDir,
}

/// Raw document bytes plus the wall-clock time they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub bytes: Vec<u8>,
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(bytes: Vec<u8>, written_at: DateTime<Utc>) -> Self {
        Self { bytes, written_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.written_at) <= max_age
    }
}

/// Storage for fetched taxonomy documents, keyed by source fingerprint.
///
/// Every failure is recoverable for callers: a failed `get` is a miss and a
/// failed `put` only means the next fetch goes to the network again.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError>;
}
