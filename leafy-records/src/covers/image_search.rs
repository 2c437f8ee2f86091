//! General image-search cover fallback (Google Custom Search JSON API)
//!
//! `GET {base}?key=..&cx=..&q={isbn}&searchType=image`. The first result
//! whose link is an absolute http(s) URL without a "no image" marker wins.

use super::placeholder::has_sentinel;
use crate::http;
use crate::isbn::Isbn13;
use crate::types::CoverResolver;
use async_trait::async_trait;
use leafy_common::config::ImageSearchConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

pub struct ImageSearchCovers {
    http_client: Client,
    base_url: String,
    credentials: ImageSearchConfig,
    sentinels: Vec<String>,
}

impl ImageSearchCovers {
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        credentials: ImageSearchConfig,
        sentinels: Vec<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            credentials,
            sentinels,
        }
    }
}

#[async_trait]
impl CoverResolver for ImageSearchCovers {
    fn name(&self) -> &'static str {
        "image_search"
    }

    async fn find_cover(&self, isbn: &Isbn13) -> Option<String> {
        let q = isbn.to_string();
        let query = [
            ("key", self.credentials.api_key.as_str()),
            ("cx", self.credentials.engine_id.as_str()),
            ("q", q.as_str()),
            ("searchType", "image"),
            ("num", "10"),
        ];

        let response =
            match http::get_json::<SearchResponse>(&self.http_client, &self.base_url, &query).await
            {
                Ok(Some(response)) => response,
                Ok(None) => return None,
                Err(e) => {
                    warn!(isbn = %isbn, error = %e, "Image search failed");
                    return None;
                }
            };

        let cover = first_usable_link(response.items, &self.sentinels);
        if cover.is_none() {
            debug!(isbn = %isbn, "Image search: no usable result");
        }
        cover
    }
}

/// First link that is an absolute http(s) URL free of sentinel markers
fn first_usable_link(items: Vec<SearchItem>, sentinels: &[String]) -> Option<String> {
    items
        .into_iter()
        .filter_map(|item| item.link)
        .find(|link| is_absolute_http(link) && !has_sentinel(link, sentinels))
}

fn is_absolute_http(link: &str) -> bool {
    match Url::parse(link.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

// ============================================================================
// Custom Search API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: Option<String>,
}
