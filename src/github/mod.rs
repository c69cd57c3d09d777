// GitHub API module.
// Conditional fetching, pagination and typed endpoints over the REST API.

pub mod client;
pub mod endpoints;
pub mod links;
pub mod pagination;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient, Page};
pub use pagination::DEFAULT_PAGE_SIZE;
pub use types::*;
