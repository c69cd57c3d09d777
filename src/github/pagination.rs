// Paginated list fetching.
// Follows rel="next" links page by page; cached pages only count when they recorded their relations.

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cache::EntryField;
use crate::error::{Result, VanityError};

use super::client::GitHubClient;

/// Items requested per page (GitHub's maximum).
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on pages followed for one list.
pub const MAX_PAGES: usize = 1000;

impl GitHubClient {
    /// Fetch every page of a list endpoint and concatenate the items.
    pub async fn fetch_all(&self, url: &str, page_size: u32) -> Result<Vec<Value>> {
        let mut next = Some(with_page_size(url, page_size)?);
        let mut items = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = next.take() {
            if pages == MAX_PAGES {
                return Err(VanityError::TooManyPages {
                    url: url.to_string(),
                    limit: MAX_PAGES,
                });
            }

            let page = self.fetch(&page_url, &[EntryField::Relations]).await?;
            pages += 1;
            match page.data {
                Value::Array(batch) => items.extend(batch),
                _ => {
                    return Err(VanityError::UnexpectedPayload {
                        url: page_url,
                        expected: "a JSON array",
                    });
                }
            }
            next = page.relations.get("next").cloned();
        }

        debug!(url, pages, items = items.len(), "list fetched");
        Ok(items)
    }

    /// Fetch every page of a list endpoint and deserialize the items.
    pub async fn fetch_all_as<T: DeserializeOwned>(
        &self,
        url: &str,
        page_size: u32,
    ) -> Result<Vec<T>> {
        let items = self.fetch_all(url, page_size).await?;
        let typed = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<serde_json::Result<Vec<T>>>()?;
        Ok(typed)
    }
}

fn with_page_size(url: &str, page_size: u32) -> Result<String> {
    let mut parsed = Url::parse(url).map_err(|err| VanityError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    parsed
        .query_pairs_mut()
        .append_pair("per_page", &page_size.to_string());
    Ok(parsed.into())
}
