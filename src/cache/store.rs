// Cache store for the persisted response cache.
// Owns the cross-process lock, loads the JSON document and writes it back atomically.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

use super::paths::{cache_path, lock_path};

/// Pagination relations of a response, keyed by relation name (`next`, `last`, ...).
pub type Relations = BTreeMap<String, String>;

/// Followers summary: account login -> formatted follower names.
pub type UserSummaries = BTreeMap<String, Vec<String>>;

/// Repository summary: account login -> repository name -> formatted user names.
pub type RepoSummaries = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// In-memory cache shared between the fetcher, its concurrent requests and the assembler.
pub type SharedCache = Arc<Mutex<CacheData>>;

/// Optional fields a cached entry may be required to carry before it is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Relations,
}

/// A cached response for one request URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// The response payload.
    pub data: Value,
    /// The validation token sent back in `If-None-Match`.
    pub etag: String,
    /// Pagination relations, absent in entries written before they were captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Relations>,
    /// When the response was fetched.
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(data: Value, etag: impl Into<String>, relations: Relations) -> Self {
        Self {
            data,
            etag: etag.into(),
            relations: Some(relations),
            fetched_at: Utc::now(),
        }
    }

    /// Check whether the entry carries the given optional field.
    pub fn has(&self, field: EntryField) -> bool {
        match field {
            EntryField::Relations => self.relations.is_some(),
        }
    }
}

/// The whole persisted cache document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheData {
    /// Derived follower lists.
    #[serde(rename = "#user", default)]
    pub users: UserSummaries,
    /// Derived stargazer/watcher lists.
    #[serde(rename = "#repo", default)]
    pub repos: RepoSummaries,
    /// Raw responses keyed by request URL.
    #[serde(flatten)]
    pub responses: BTreeMap<String, CacheEntry>,
}

/// Lock the shared cache, recovering the data if a holder panicked.
pub fn lock_cache(cache: &SharedCache) -> MutexGuard<'_, CacheData> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive, persisted cache session over one cache directory.
///
/// `open` takes the directory lock and loads the document; `close` writes it
/// back and releases the lock. Dropping an open store closes it too, so the
/// cache is persisted on error paths as well.
pub struct CacheStore {
    dir: PathBuf,
    data: SharedCache,
    lock: Option<File>,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            data: SharedCache::default(),
            lock: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock.is_some()
    }

    /// Handle to the in-memory cache.
    pub fn shared(&self) -> SharedCache {
        Arc::clone(&self.data)
    }

    /// Acquire the directory lock, blocking while another process holds it, then load the cache.
    ///
    /// # Panics
    ///
    /// Panics if the store is already open.
    pub fn open(&mut self) -> Result<()> {
        assert!(
            self.lock.is_none(),
            "cache store at {} is already open",
            self.dir.display()
        );

        create_private_dir(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(&self.dir))?;
        acquire_lock(&file, &self.dir)?;

        *lock_cache(&self.data) = load(&cache_path(&self.dir));
        self.lock = Some(file);
        debug!(dir = %self.dir.display(), "cache opened");
        Ok(())
    }

    /// Persist the cache and release the lock. Closing a closed store does nothing.
    ///
    /// The lock is released even when persisting fails; the previous cache file is left intact.
    pub fn close(&mut self) -> Result<()> {
        let Some(file) = self.lock.take() else {
            return Ok(());
        };
        let result = self.persist();
        drop(file);
        debug!(dir = %self.dir.display(), ok = result.is_ok(), "cache closed");
        result
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&*lock_cache(&self.data))?;
        write_atomic(&cache_path(&self.dir), json.as_bytes())
    }
}

impl Drop for CacheStore {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(dir = %self.dir.display(), error = %err, "failed to persist cache");
        }
    }
}

fn acquire_lock(file: &File, dir: &Path) -> Result<()> {
    match FileExt::try_lock_exclusive(file) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
            warn!(
                dir = %dir.display(),
                "cache is locked by another github-vanity process, waiting"
            );
            eprintln!("Waiting for the cache lock in {}...", dir.display());
            FileExt::lock_exclusive(file)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Read the cache document, treating a missing, unreadable or corrupt file as empty.
fn load(path: &Path) -> CacheData {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return CacheData::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cache unreadable, starting empty");
            return CacheData::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cache corrupt, starting empty");
            CacheData::default()
        }
    }
}

/// Write via a temp file in the same directory, then rename over the target.
///
/// On failure the temp file is removed and the target is left untouched.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let written = write_synced(&temp_path, contents).and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
