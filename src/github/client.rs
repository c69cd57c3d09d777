// GitHub API HTTP client.
// Performs conditional GETs against the shared ETag cache.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, ETAG, HeaderMap, HeaderValue, IF_NONE_MATCH, LINK, USER_AGENT},
};
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, EntryField, Relations, SharedCache, lock_cache};
use crate::error::{Result, VanityError};

use super::links::parse_link_header;
use super::types::ApiErrorBody;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT_VALUE: &str = concat!("github-vanity/", env!("CARGO_PKG_VERSION"));

/// One fetched (or revalidated) response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub data: Value,
    pub relations: Relations,
}

/// GitHub API client backed by the session cache.
///
/// Cloning is cheap: clones share the connection pool and the cache.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    cache: SharedCache,
}

impl GitHubClient {
    /// Create a client for api.github.com, authenticating with `token` when given.
    pub fn new(token: Option<&str>, cache: SharedCache) -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE, token, cache)
    }

    /// Create a client for an arbitrary API root.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<&str>,
        cache: SharedCache,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| VanityError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Absolute URL for an API path such as `/users/octocat`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// GET `url` and return its payload.
    pub async fn get(&self, url: &str) -> Result<Value> {
        Ok(self.fetch(url, &[]).await?.data)
    }

    /// GET `url`, revalidating a cached copy with `If-None-Match`.
    ///
    /// A cached entry is only offered for revalidation when it carries every
    /// field in `required`. Responses without an `ETag` are not cached.
    pub async fn fetch(&self, url: &str, required: &[EntryField]) -> Result<Page> {
        let cached = lock_cache(&self.cache)
            .responses
            .get(url)
            .filter(|entry| required.iter().all(|field| entry.has(*field)))
            .cloned();

        let mut request = self.client.get(url);
        if let Some(entry) = &cached {
            request = request.header(IF_NONE_MATCH, entry.etag.as_str());
        }
        debug!(url, etag = cached.as_ref().map(|e| e.etag.as_str()), "GET");

        let response = request.send().await?;
        let status = response.status();
        trace!(url, %status, headers = ?response.headers(), "response");

        if status == StatusCode::NOT_MODIFIED {
            let entry = cached.ok_or_else(|| VanityError::InconsistentRevalidation {
                url: url.to_string(),
            })?;
            debug!(url, fetched_at = %entry.fetched_at, "not modified");
            return Ok(Page {
                data: entry.data,
                relations: entry.relations.unwrap_or_default(),
            });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(api_error(response).await);
        }

        let relations = match response.headers().get(LINK) {
            Some(value) => parse_link_header(value.to_str().map_err(|_| {
                VanityError::MalformedLink(String::from_utf8_lossy(value.as_bytes()).into_owned())
            })?)?,
            None => Relations::new(),
        };
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let data: Value = response.json().await?;

        match etag {
            Some(etag) => {
                let entry = CacheEntry::new(data.clone(), etag, relations.clone());
                lock_cache(&self.cache)
                    .responses
                    .insert(url.to_string(), entry);
            }
            None => debug!(url, "no ETag, response not cached"),
        }

        Ok(Page { data, relations })
    }
}

/// Convert an error response into `VanityError::Api`, preferring the body's `message`.
async fn api_error(response: Response) -> VanityError {
    let status = response.status();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    VanityError::Api {
        status: status.as_u16(),
        message,
    }
}
