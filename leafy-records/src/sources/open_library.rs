//! Open Library source
//!
//! `GET {base}/api/books?bibkeys=ISBN:{isbn}&jscmd=data&format=json`
//! returns an object keyed by bibkey; `{}` means not found.
//!
//! Open Library omits `cover` only when it holds no cover for the edition,
//! so a record from here settles the cover question.

use crate::http;
use crate::isbn::{normalize, Isbn13};
use crate::language;
use crate::types::{LookupError, PartialRecord, SourceAdapter, SourceOutcome};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub struct OpenLibrarySource {
    http_client: Client,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, isbn: &Isbn13) -> Result<Option<PartialRecord>, LookupError> {
        let url = format!("{}/api/books", self.base_url.trim_end_matches('/'));
        let bibkey = format!("ISBN:{}", isbn);
        let query = [
            ("bibkeys", bibkey.as_str()),
            ("jscmd", "data"),
            ("format", "json"),
        ];

        let Some(mut books) =
            http::get_json::<HashMap<String, BookData>>(&self.http_client, &url, &query).await?
        else {
            return Ok(None);
        };

        // Keyed by the bibkey we sent; fall back to any entry
        let book = match books.remove(&bibkey) {
            Some(book) => book,
            None => match books.into_values().next() {
                Some(book) => book,
                None => {
                    debug!(isbn = %isbn, "Open Library: empty response");
                    return Ok(None);
                }
            },
        };
        Ok(Some(map_book(book, isbn)))
    }
}

#[async_trait]
impl SourceAdapter for OpenLibrarySource {
    fn name(&self) -> &'static str {
        "open_library"
    }

    fn checks_cover(&self) -> bool {
        true
    }

    async fn lookup(&self, isbn: &Isbn13) -> SourceOutcome {
        self.fetch(isbn).await.into()
    }
}

fn map_book(book: BookData, isbn: &Isbn13) -> PartialRecord {
    let title = match book.subtitle.as_deref().map(str::trim) {
        Some(subtitle) if !subtitle.is_empty() => {
            format!("{}: {}", book.title.trim(), subtitle)
        }
        _ => book.title,
    };

    let author = book
        .authors
        .into_iter()
        .map(|a| a.name)
        .filter(|n| !n.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let abstract_text = book
        .notes
        .map(Notes::into_text)
        .or_else(|| book.excerpts.into_iter().next().map(|e| e.text));

    let cover = book
        .cover
        .and_then(|c| c.large.or(c.medium).or(c.small));

    let echoed_isbn = book
        .identifiers
        .and_then(|ids| ids.isbn_13.into_iter().find_map(|i| normalize(&i).ok()));

    PartialRecord {
        title,
        author,
        publisher: book.publishers.into_iter().next().map(|p| p.name),
        abstract_text,
        publication_date: book.publish_date,
        format: book
            .number_of_pages
            .filter(|n| *n > 0)
            .map(|n| format!("{}p.", n)),
        language: language::derive(None, isbn),
        isbn: echoed_isbn,
        cover,
        record_source: book.url,
    }
}

// ============================================================================
// Open Library API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct BookData {
    #[serde(default)]
    title: String,
    subtitle: Option<String>,
    #[serde(default)]
    authors: Vec<Named>,
    #[serde(default)]
    publishers: Vec<Named>,
    publish_date: Option<String>,
    number_of_pages: Option<u32>,
    notes: Option<Notes>,
    #[serde(default)]
    excerpts: Vec<Excerpt>,
    cover: Option<CoverLinks>,
    identifiers: Option<Identifiers>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

/// `notes` is either a bare string or a typed text object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Notes {
    Plain(String),
    Typed { value: String },
}

impl Notes {
    fn into_text(self) -> String {
        match self {
            Notes::Plain(text) | Notes::Typed { value: text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Excerpt {
    text: String,
}

#[derive(Debug, Deserialize)]
struct CoverLinks {
    small: Option<String>,
    medium: Option<String>,
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Identifiers {
    #[serde(default)]
    isbn_13: Vec<String>,
}
