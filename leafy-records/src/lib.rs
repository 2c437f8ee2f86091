//! leafy-records: ISBN → bibliographic record resolution
//!
//! Normalises a raw ISBN, walks a cascade of catalogue services until one
//! has a record, fills a missing cover from cover services and returns one
//! [`CanonicalRecord`]. No caching, no persistence.
//!
//! # Example
//! ```rust,ignore
//! use leafy_common::config::LookupConfig;
//! use leafy_records::Resolver;
//!
//! let resolver = Resolver::from_config(&LookupConfig::default())?;
//! if let Some(record) = resolver.resolve("978-2-01-394476-2").await {
//!     println!("{} ({})", record.title, record.author);
//! }
//! ```

pub mod covers;
pub mod http;
pub mod isbn;
pub mod language;
pub mod parsing;
pub mod resolver;
pub mod sources;
pub mod types;

pub use isbn::{normalize, Isbn13, IsbnError};
pub use resolver::{Resolution, ResolveError, Resolver, SourceAttempt};
pub use types::{
    CanonicalRecord, CoverResolver, LookupError, OutcomeKind, PartialRecord, SourceAdapter,
    SourceOutcome,
};

use leafy_common::config::{ImageSearchConfig, LookupConfig};
use tracing::error;

/// Resolve one ISBN with the default cascade
///
/// `image_search` enables the image-search cover fallback. Invalid input,
/// exhausted sources and client setup failures all yield `None`.
pub async fn resolve(
    raw_isbn: &str,
    image_search: Option<&ImageSearchConfig>,
) -> Option<CanonicalRecord> {
    let config = LookupConfig {
        image_search: image_search.cloned(),
        ..Default::default()
    };

    match Resolver::from_config(&config) {
        Ok(resolver) => resolver.resolve(raw_isbn).await,
        Err(e) => {
            error!(error = %e, "Failed to build resolver");
            None
        }
    }
}
