//! Bibliographic source adapters
//!
//! Each adapter queries one catalogue and maps its native payload onto
//! [`PartialRecord`](crate::types::PartialRecord):
//!
//! 1. **google_books** - Google Books volumes search (JSON)
//! 2. **sudoc** - Sudoc isbn2ppn lookup, then the RDF/XML record
//! 3. **bnf** - BnF catalogue SRU, Dublin Core schema (XML)
//! 4. **open_library** - Open Library books API (JSON, cover-aware)
//!
//! Adapters are independent; the cascade order lives in the config.

pub mod bnf;
pub mod google_books;
pub mod open_library;
pub mod sudoc;

pub use bnf::BnfSource;
pub use google_books::GoogleBooksSource;
pub use open_library::OpenLibrarySource;
pub use sudoc::SudocSource;

use crate::types::SourceAdapter;
use leafy_common::config::{LookupConfig, SourceKind};
use reqwest::Client;
use std::sync::Arc;

/// Build the adapter for one configured source
pub fn build_source(
    kind: SourceKind,
    config: &LookupConfig,
    http_client: &Client,
) -> Arc<dyn SourceAdapter> {
    let endpoints = &config.endpoints;
    match kind {
        SourceKind::GoogleBooks => Arc::new(GoogleBooksSource::new(
            http_client.clone(),
            endpoints.google_books.clone(),
            config.google_books_api_key.clone(),
        )),
        SourceKind::Sudoc => Arc::new(SudocSource::new(
            http_client.clone(),
            endpoints.sudoc.clone(),
        )),
        SourceKind::Bnf => Arc::new(BnfSource::new(
            http_client.clone(),
            endpoints.bnf_sru.clone(),
        )),
        SourceKind::OpenLibrary => Arc::new(OpenLibrarySource::new(
            http_client.clone(),
            endpoints.open_library.clone(),
        )),
    }
}

/// Adapters in configured cascade order, duplicates removed
pub fn build_sources(config: &LookupConfig, http_client: &Client) -> Vec<Arc<dyn SourceAdapter>> {
    config
        .effective_source_order()
        .into_iter()
        .map(|kind| build_source(kind, config, http_client))
        .collect()
}
