// Error types for github-vanity.
// Covers transport failures, remote API errors, protocol violations and cache I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VanityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed Link header: {0:?}")]
    MalformedLink(String),

    #[error("Server answered 304 Not Modified for uncached URL {url}")]
    InconsistentRevalidation { url: String },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unexpected payload from {url}: expected {expected}")]
    UnexpectedPayload { url: String, expected: &'static str },

    #[error("Gave up paginating {url} after {limit} pages")]
    TooManyPages { url: String, limit: usize },

    #[error("GITHUB_VANITY_TOKEN is not a valid header value")]
    InvalidToken,

    #[error("Unable to determine a home directory for the cache")]
    NoCacheDir,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VanityError>;
