// Cache path utilities.
// Resolves the cache directory following the XDG base directory rule.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Directory name under the cache root.
pub const APP_DIR: &str = "github-vanity";

/// File name of the persisted cache document.
pub const CACHE_FILE: &str = "cache.json";

/// File name of the cross-process lock.
pub const LOCK_FILE: &str = "cache.lock";

/// Get the base cache directory (`$XDG_CACHE_HOME/github-vanity` or `~/.cache/github-vanity`).
pub fn cache_dir() -> Option<PathBuf> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    cache_dir_from(std::env::var_os("XDG_CACHE_HOME"), home)
}

/// Resolve the cache directory from an `XDG_CACHE_HOME` value and a home directory.
///
/// A relative or empty `XDG_CACHE_HOME` is ignored.
pub fn cache_dir_from(xdg_cache_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    let root = match xdg_cache_home.map(PathBuf::from) {
        Some(xdg) if xdg.is_absolute() => xdg,
        _ => home?.join(".cache"),
    };
    Some(root.join(APP_DIR))
}

/// Path to the cache document inside a cache directory.
pub fn cache_path(dir: &Path) -> PathBuf {
    dir.join(CACHE_FILE)
}

/// Path to the lock file inside a cache directory.
pub fn lock_path(dir: &Path) -> PathBuf {
    dir.join(LOCK_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_xdg_cache_home_wins() {
        let dir = cache_dir_from(
            Some(OsString::from("/var/cache/me")),
            Some(PathBuf::from("/home/me")),
        );
        assert_eq!(dir, Some(PathBuf::from("/var/cache/me/github-vanity")));
    }

    #[test]
    fn test_relative_xdg_cache_home_ignored() {
        let dir = cache_dir_from(
            Some(OsString::from("relative/cache")),
            Some(PathBuf::from("/home/me")),
        );
        assert_eq!(dir, Some(PathBuf::from("/home/me/.cache/github-vanity")));
    }

    #[test]
    fn test_empty_xdg_cache_home_ignored() {
        let dir = cache_dir_from(Some(OsString::new()), Some(PathBuf::from("/home/me")));
        assert_eq!(dir, Some(PathBuf::from("/home/me/.cache/github-vanity")));
    }

    #[test]
    fn test_no_home_and_no_xdg() {
        assert_eq!(cache_dir_from(None, None), None);
    }

    #[test]
    fn test_file_paths() {
        let dir = PathBuf::from("/tmp/gv");
        assert_eq!(cache_path(&dir), PathBuf::from("/tmp/gv/cache.json"));
        assert_eq!(lock_path(&dir), PathBuf::from("/tmp/gv/cache.lock"));
    }
}
