// Runtime settings.
// Combines command-line options with the GITHUB_VANITY_TOKEN and XDG_CACHE_HOME environment.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cache;
use crate::error::{Result, VanityError};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_VANITY_TOKEN";

/// Everything one invocation needs to run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Accounts to report on, in command-line order.
    pub accounts: Vec<String>,
    /// Logins left out of every list.
    pub ignored: BTreeSet<String>,
    /// Concurrent requests per fan-out.
    pub max_connections: usize,
    /// Token sent as `Authorization: token <value>`.
    pub token: Option<String>,
    /// Directory holding the cache document and its lock.
    pub cache_dir: PathBuf,
}

impl Settings {
    /// Build settings from command-line values and the process environment.
    pub fn load(
        accounts: Vec<String>,
        ignore: Vec<String>,
        max_connections: usize,
    ) -> Result<Self> {
        let cache_dir = cache::cache_dir().ok_or(VanityError::NoCacheDir)?;
        Ok(Self {
            accounts,
            ignored: ignore.into_iter().collect(),
            max_connections: max_connections.max(1),
            token: normalize_token(std::env::var(TOKEN_ENV).ok()),
            cache_dir,
        })
    }
}

/// Treat an empty or blank token as no token.
fn normalize_token(value: Option<String>) -> Option<String> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token(None), None);
        assert_eq!(normalize_token(Some(String::new())), None);
        assert_eq!(normalize_token(Some("  \n".to_string())), None);
        assert_eq!(
            normalize_token(Some(" ghp_abc\n".to_string())),
            Some("ghp_abc".to_string())
        );
    }

    #[test]
    fn test_load_deduplicates_ignores_and_clamps_connections() {
        let Ok(settings) = Settings::load(
            vec!["alice".to_string()],
            vec!["bob".to_string(), "bob".to_string()],
            0,
        ) else {
            // no home directory in this environment
            return;
        };
        assert_eq!(settings.ignored.len(), 1);
        assert_eq!(settings.max_connections, 1);
        assert!(settings.cache_dir.ends_with("github-vanity"));
    }
}
