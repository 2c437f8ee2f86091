//! Cover resolvers
//!
//! Tried in configured order when the winning record has no cover:
//! 1. **open_library_covers** - direct image probe, placeholder-checked
//! 2. **image_search** - general image search, only built with credentials

pub mod image_search;
pub mod open_library_covers;
pub mod placeholder;

pub use image_search::ImageSearchCovers;
pub use open_library_covers::OpenLibraryCovers;

use crate::types::CoverResolver;
use leafy_common::config::{CoverKind, LookupConfig};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// Cover resolvers in configured order
///
/// The image-search resolver is left out unless usable credentials are set.
pub fn build_covers(config: &LookupConfig, http_client: &Client) -> Vec<Arc<dyn CoverResolver>> {
    let mut covers: Vec<Arc<dyn CoverResolver>> = Vec::new();
    for kind in config.effective_cover_order() {
        match kind {
            CoverKind::OpenLibraryCovers => covers.push(Arc::new(OpenLibraryCovers::new(
                http_client.clone(),
                config.endpoints.open_library_covers.clone(),
                config.placeholder.clone(),
            ))),
            CoverKind::ImageSearch => match config.image_search.as_ref().filter(|c| c.is_usable()) {
                Some(credentials) => covers.push(Arc::new(ImageSearchCovers::new(
                    http_client.clone(),
                    config.endpoints.custom_search.clone(),
                    credentials.clone(),
                    config.placeholder.sentinels.clone(),
                ))),
                None => debug!("Image search cover resolver skipped: no credentials"),
            },
        }
    }
    covers
}
