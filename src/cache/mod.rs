pub mod disk;
pub mod memory;
pub mod store;

pub use disk::DiskCache;
pub use memory::MemoryCache;
pub use store::{CacheEntry, CacheError, CacheStore, DEFAULT_MAX_AGE_SECS};
