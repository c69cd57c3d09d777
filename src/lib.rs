// github-vanity: followers, stargazers and watchers of GitHub accounts.
// Responses are revalidated with ETags against a locked on-disk cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod fanout;
pub mod github;
pub mod logging;
pub mod vanity;

pub use error::{Result, VanityError};
