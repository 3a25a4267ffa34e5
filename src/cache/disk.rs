use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use super::store::{CacheEntry, CacheError, CacheStore};
use crate::types::CacheKey;

const APP_DIR: &str = "taxowalk";

/// One `<fingerprint>.json` file per source under a single directory.
/// Entry age is the file's modification time.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<platform cache dir>/taxowalk`.
    pub fn platform_default() -> Result<Self, CacheError> {
        let dir = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(Self::new(dir.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl CacheStore for DiskCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let written_at: DateTime<Utc> = metadata.modified()?.into();
        let bytes = fs::read(&path)?;
        Ok(Some(CacheEntry::new(bytes, written_at)))
    }

    fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root)?;

        // Each writer gets its own temp file in the cache dir so the rename
        // stays on one filesystem. Dropping it unpersisted removes it.
        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(self.entry_path(key)).map_err(|err| err.error)?;
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
