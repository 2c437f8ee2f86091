//! Open Library Covers probe
//!
//! `GET {base}/b/isbn/{isbn}-L.jpg` returns the image itself. Missing
//! covers come back as a tiny stock image, so the body is checked before
//! the URL is accepted.

use super::placeholder::is_placeholder;
use crate::http;
use crate::isbn::Isbn13;
use crate::types::CoverResolver;
use async_trait::async_trait;
use leafy_common::config::PlaceholderConfig;
use reqwest::Client;
use tracing::{debug, warn};

pub struct OpenLibraryCovers {
    http_client: Client,
    base_url: String,
    placeholder: PlaceholderConfig,
}

impl OpenLibraryCovers {
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        placeholder: PlaceholderConfig,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            placeholder,
        }
    }

    /// Public URL of the large cover for `isbn`
    pub fn cover_url(&self, isbn: &Isbn13) -> String {
        format!("{}/b/isbn/{}-L.jpg", self.base_url.trim_end_matches('/'), isbn)
    }
}

#[async_trait]
impl CoverResolver for OpenLibraryCovers {
    fn name(&self) -> &'static str {
        "open_library_covers"
    }

    async fn find_cover(&self, isbn: &Isbn13) -> Option<String> {
        let url = self.cover_url(isbn);
        let bytes = match http::get_bytes(&self.http_client, &url).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(isbn = %isbn, "Open Library Covers: no cover");
                return None;
            }
            Err(e) => {
                warn!(isbn = %isbn, error = %e, "Open Library Covers probe failed");
                return None;
            }
        };

        if is_placeholder(&bytes, &self.placeholder) {
            debug!(isbn = %isbn, len = bytes.len(), "Open Library Covers: placeholder rejected");
            return None;
        }
        Some(url)
    }
}
