// GitHub API endpoint functions.
// Typed accessors for the profile and list endpoints the social graph is built from.

use crate::error::Result;

use super::client::GitHubClient;
use super::pagination::DEFAULT_PAGE_SIZE;
use super::types::{Account, Repository, User};

impl GitHubClient {
    /// Get a user's full profile.
    pub async fn get_user(&self, login: &str) -> Result<User> {
        let value = self.get(&self.api_url(&format!("/users/{}", login))).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get every follower of an account.
    pub async fn get_followers(&self, login: &str) -> Result<Vec<Account>> {
        let url = self.api_url(&format!("/users/{}/followers", login));
        self.fetch_all_as(&url, DEFAULT_PAGE_SIZE).await
    }

    /// Get every public repository owned by an account.
    pub async fn get_repos(&self, login: &str) -> Result<Vec<Repository>> {
        let url = self.api_url(&format!("/users/{}/repos", login));
        self.fetch_all_as(&url, DEFAULT_PAGE_SIZE).await
    }

    /// Get every user who starred a repository.
    pub async fn get_stargazers(&self, owner: &str, repo: &str) -> Result<Vec<Account>> {
        let url = self.api_url(&format!("/repos/{}/{}/stargazers", owner, repo));
        self.fetch_all_as(&url, DEFAULT_PAGE_SIZE).await
    }

    /// Get every user watching a repository.
    pub async fn get_watchers(&self, owner: &str, repo: &str) -> Result<Vec<Account>> {
        let url = self.api_url(&format!("/repos/{}/{}/subscribers", owner, repo));
        self.fetch_all_as(&url, DEFAULT_PAGE_SIZE).await
    }
}
