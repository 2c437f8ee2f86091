//! Google Books source
//!
//! One JSON call: `GET {base}/volumes?q=isbn:{isbn}`. `totalItems == 0`
//! means the catalogue has no such book.

use crate::http;
use crate::isbn::{normalize, Isbn13};
use crate::language;
use crate::parsing::https_upgrade;
use crate::types::{LookupError, PartialRecord, SourceAdapter, SourceOutcome};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub struct GoogleBooksSource {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new(http_client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    async fn fetch(&self, isbn: &Isbn13) -> Result<Option<PartialRecord>, LookupError> {
        let url = format!("{}/volumes", self.base_url.trim_end_matches('/'));
        let q = format!("isbn:{}", isbn);
        let mut query = vec![("q", q.as_str())];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        let Some(response) = http::get_json::<VolumesResponse>(&self.http_client, &url, &query).await?
        else {
            return Ok(None);
        };
        Ok(parse_volumes(response, isbn))
    }
}

#[async_trait]
impl SourceAdapter for GoogleBooksSource {
    fn name(&self) -> &'static str {
        "google_books"
    }

    async fn lookup(&self, isbn: &Isbn13) -> SourceOutcome {
        self.fetch(isbn).await.into()
    }
}

/// Map a volumes search response; `None` when it holds no volume
fn parse_volumes(response: VolumesResponse, isbn: &Isbn13) -> Option<PartialRecord> {
    if response.total_items == 0 {
        debug!(isbn = %isbn, "Google Books: totalItems = 0");
        return None;
    }
    let volume = response.items.into_iter().next()?.volume_info?;

    let title = match volume.subtitle.as_deref().map(str::trim) {
        Some(subtitle) if !subtitle.is_empty() => {
            format!("{} {}", volume.title.unwrap_or_default().trim(), subtitle)
        }
        _ => volume.title.unwrap_or_default(),
    };

    let echoed_isbn = volume
        .industry_identifiers
        .iter()
        .find(|id| id.kind == "ISBN_13")
        .and_then(|id| normalize(&id.identifier).ok());

    let cover = volume
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .map(|link| https_upgrade(&link));

    Some(PartialRecord {
        title,
        author: volume.authors.join(", "),
        publisher: volume.publisher,
        abstract_text: volume.description,
        publication_date: volume.published_date,
        format: volume.page_count.filter(|n| *n > 0).map(|n| format!("{}p.", n)),
        language: language::derive(volume.language.as_deref(), isbn),
        isbn: echoed_isbn,
        cover,
        record_source: volume.info_link,
    })
}

// ============================================================================
// Google Books API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u32,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    page_count: Option<u32>,
    language: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    image_links: Option<ImageLinks>,
    info_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}
