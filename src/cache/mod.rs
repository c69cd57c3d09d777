// Cache module for the persisted response cache.
// Stores ETag-validated GitHub API responses and derived summaries across runs.

pub mod paths;
pub mod store;

pub use paths::cache_dir;
pub use store::{
    CacheData, CacheEntry, CacheStore, EntryField, Relations, SharedCache, lock_cache,
};
