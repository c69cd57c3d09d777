// Social graph assembly.
// Collects followers and per-repository stargazers/watchers, resolves profiles and writes the report.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use tracing::info;

use crate::cache::lock_cache;
use crate::error::Result;
use crate::fanout::fan_out;
use crate::github::{Account, GitHubClient, User};

/// Formatted users of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUsers {
    pub name: String,
    pub users: Vec<String>,
}

/// Builds follower and repository reports for accounts.
pub struct Vanity {
    client: GitHubClient,
    max_connections: usize,
}

impl Vanity {
    pub fn new(client: GitHubClient, max_connections: usize) -> Self {
        Self {
            client,
            max_connections,
        }
    }

    /// Formatted followers of `login`, sorted by follower login, also stored under `#user`.
    pub async fn followers(&self, login: &str, ignored: &BTreeSet<String>) -> Result<Vec<String>> {
        info!(login, "fetching followers");
        let followers = self.client.get_followers(login).await?;
        let logins = select_logins([followers.as_slice()], None, ignored);
        let names = self.profiles(&logins).await?;

        lock_cache(self.client.cache())
            .users
            .insert(login.to_string(), names.clone());
        Ok(names)
    }

    /// Stargazers and watchers of every repository of `login`, sorted by repository name.
    ///
    /// The account itself and ignored logins are dropped. Every repository,
    /// including ones left without users, is stored under `#repo`.
    pub async fn repositories(
        &self,
        login: &str,
        ignored: &BTreeSet<String>,
    ) -> Result<Vec<RepoUsers>> {
        info!(login, "fetching repositories");
        let mut repos = self.client.get_repos(login).await?;
        repos.sort_by(|a, b| a.name.cmp(&b.name));

        let client = &self.client;
        let stargazers = fan_out(self.max_connections, &repos, |repo| {
            client.get_stargazers(&repo.owner.login, &repo.name)
        })
        .await?;
        let watchers = fan_out(self.max_connections, &repos, |repo| {
            client.get_watchers(&repo.owner.login, &repo.name)
        })
        .await?;

        let mut results = Vec::with_capacity(repos.len());
        for ((repo, stars), watches) in repos.iter().zip(&stargazers).zip(&watchers) {
            let logins = select_logins(
                [stars.as_slice(), watches.as_slice()],
                Some(&repo.owner.login),
                ignored,
            );
            results.push(RepoUsers {
                name: repo.name.clone(),
                users: self.profiles(&logins).await?,
            });
        }

        let summary: BTreeMap<String, Vec<String>> = results
            .iter()
            .map(|repo| (repo.name.clone(), repo.users.clone()))
            .collect();
        lock_cache(self.client.cache())
            .repos
            .insert(login.to_string(), summary);
        Ok(results)
    }

    /// Write the followers section for `login`.
    pub async fn dump_followers<W: Write>(
        &self,
        login: &str,
        ignored: &BTreeSet<String>,
        out: &mut W,
    ) -> Result<()> {
        let names = self.followers(login, ignored).await?;
        writeln!(out, "{} followers:", login)?;
        write_entries(out, &names)?;
        out.flush()?;
        Ok(())
    }

    /// Write one section per repository of `login` that has any users.
    pub async fn dump_repositories<W: Write>(
        &self,
        login: &str,
        ignored: &BTreeSet<String>,
        out: &mut W,
    ) -> Result<()> {
        let repos = self.repositories(login, ignored).await?;
        for repo in repos.iter().filter(|repo| !repo.users.is_empty()) {
            writeln!(out, "{}/{}:", login, repo.name)?;
            write_entries(out, &repo.users)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Followers, then repositories, for one account.
    pub async fn dump<W: Write>(
        &self,
        login: &str,
        ignored: &BTreeSet<String>,
        out: &mut W,
    ) -> Result<()> {
        self.dump_followers(login, ignored, out).await?;
        self.dump_repositories(login, ignored, out).await
    }

    /// Fetch profiles concurrently; output follows the (sorted) order of `logins`.
    async fn profiles(&self, logins: &BTreeSet<String>) -> Result<Vec<String>> {
        let client = &self.client;
        let users = fan_out(self.max_connections, logins, |login| client.get_user(login)).await?;
        Ok(users.iter().map(User::display).collect())
    }
}

/// Distinct logins across `lists`, without `owner` and ignored logins, ordered by login.
pub fn select_logins<'a>(
    lists: impl IntoIterator<Item = &'a [Account]>,
    owner: Option<&str>,
    ignored: &BTreeSet<String>,
) -> BTreeSet<String> {
    lists
        .into_iter()
        .flatten()
        .map(|account| account.login.as_str())
        .filter(|login| Some(*login) != owner && !ignored.contains(*login))
        .map(str::to_string)
        .collect()
}

fn write_entries<W: Write>(out: &mut W, entries: &[String]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(out, "    {}", entry)?;
    }
    Ok(())
}
