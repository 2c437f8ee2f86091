//! Core types and trait definitions
//!
//! - [`SourceAdapter`]: one external catalogue, ISBN → [`SourceOutcome`]
//! - [`CoverResolver`]: one cover service, ISBN → cover URL
//! - [`CanonicalRecord`]: the unified record handed to the caller

use crate::isbn::Isbn13;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Records
// ============================================================================

/// Fields contributed by a single source adapter
///
/// Empty strings are treated as missing when the canonical record is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub format: Option<String>,
    /// 2-letter language code
    pub language: Option<String>,
    /// ISBN echoed back by the source, already normalised
    pub isbn: Option<Isbn13>,
    pub cover: Option<String>,
    /// Provenance pointer into the source (record URL, ARK, PPN IRI)
    pub record_source: Option<String>,
}

/// Resolved bibliographic record
///
/// Built once by the resolver and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub format: Option<String>,
    pub language: Option<String>,
    pub isbn: Option<Isbn13>,
    pub cover: Option<String>,
    pub record_source: Option<String>,
}

impl CanonicalRecord {
    /// Assemble from a source record, the normalised ISBN and an optional cover
    ///
    /// The source's ISBN is kept when present; `isbn` only backfills.
    /// `cover` is only used when the source supplied none.
    pub(crate) fn assemble(partial: PartialRecord, isbn: Isbn13, cover: Option<String>) -> Self {
        Self {
            title: partial.title.trim().to_string(),
            author: partial.author.trim().to_string(),
            publisher: non_empty(partial.publisher),
            abstract_text: non_empty(partial.abstract_text),
            publication_date: non_empty(partial.publication_date),
            format: non_empty(partial.format),
            language: non_empty(partial.language),
            isbn: partial.isbn.or(Some(isbn)),
            cover: non_empty(partial.cover).or_else(|| non_empty(cover)),
            record_source: non_empty(partial.record_source),
        }
    }
}

/// Trimmed value, `None` when blank
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Source adapters
// ============================================================================

/// Per-source failure; consumed by the cascade, never surfaced to callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Unexpected HTTP status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Malformed payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Body could not be read or decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout(e.to_string())
        } else if e.is_decode() || e.is_body() {
            LookupError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            LookupError::Status(status.as_u16())
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

/// Three-way result of one source lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    /// The source has a record
    Found(PartialRecord),
    /// The source answered and definitively has no record
    NotFound,
    /// Transient or parse failure at this source
    SourceError(LookupError),
}

impl SourceOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            SourceOutcome::Found(_) => OutcomeKind::Found,
            SourceOutcome::NotFound => OutcomeKind::NotFound,
            SourceOutcome::SourceError(_) => OutcomeKind::Error,
        }
    }
}

impl From<Result<Option<PartialRecord>, LookupError>> for SourceOutcome {
    fn from(result: Result<Option<PartialRecord>, LookupError>) -> Self {
        match result {
            Ok(Some(record)) => SourceOutcome::Found(record),
            Ok(None) => SourceOutcome::NotFound,
            Err(e) => SourceOutcome::SourceError(e),
        }
    }
}

/// Outcome without payload, for attempt reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Found,
    NotFound,
    Error,
}

/// One external bibliographic service
///
/// # Example
/// ```rust,ignore
/// use leafy_records::types::{SourceAdapter, SourceOutcome};
///
/// match adapter.lookup(&isbn).await {
///     SourceOutcome::Found(record) => println!("{}", record.title),
///     SourceOutcome::NotFound => println!("no record"),
///     SourceOutcome::SourceError(e) => println!("failed: {}", e),
/// }
/// ```
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Source name for logs and provenance
    fn name(&self) -> &'static str;

    /// Whether a record from this source already settles the cover question
    ///
    /// When true and this source wins, the cover cascade is skipped.
    fn checks_cover(&self) -> bool {
        false
    }

    /// Look up one ISBN. Never panics, never returns early with an error:
    /// every failure is a [`SourceOutcome::SourceError`].
    async fn lookup(&self, isbn: &Isbn13) -> SourceOutcome;
}

// ============================================================================
// Cover resolvers
// ============================================================================

/// One cover-image service
#[async_trait::async_trait]
pub trait CoverResolver: Send + Sync {
    /// Resolver name for logs
    fn name(&self) -> &'static str;

    /// Usable cover URL, or `None` (no cover, placeholder, or failure)
    async fn find_cover(&self, isbn: &Isbn13) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isbn::normalize;

    #[test]
    fn test_assemble_backfills_isbn() {
        let isbn = normalize("9782013944762").unwrap();
        let record = CanonicalRecord::assemble(
            PartialRecord {
                title: " Title ".to_string(),
                ..Default::default()
            },
            isbn,
            None,
        );
        assert_eq!(record.isbn, Some(isbn));
        assert_eq!(record.title, "Title");
    }

    #[test]
    fn test_assemble_keeps_source_isbn() {
        let source_isbn = normalize("9780738531366").unwrap();
        let record = CanonicalRecord::assemble(
            PartialRecord {
                isbn: Some(source_isbn),
                ..Default::default()
            },
            normalize("9782013944762").unwrap(),
            None,
        );
        assert_eq!(record.isbn, Some(source_isbn));
    }

    #[test]
    fn test_assemble_blank_fields_become_none() {
        let record = CanonicalRecord::assemble(
            PartialRecord {
                publisher: Some("  ".to_string()),
                cover: Some(String::new()),
                ..Default::default()
            },
            normalize("9782013944762").unwrap(),
            Some("https://example.com/c.jpg".to_string()),
        );
        assert_eq!(record.publisher, None);
        assert_eq!(record.cover.as_deref(), Some("https://example.com/c.jpg"));
    }

    #[test]
    fn test_outcome_from_result() {
        let found = SourceOutcome::from(Ok::<_, LookupError>(Some(PartialRecord::default())));
        assert_eq!(found.kind(), OutcomeKind::Found);
        let missing = SourceOutcome::from(Ok::<_, LookupError>(None));
        assert_eq!(missing, SourceOutcome::NotFound);
        let failed = SourceOutcome::from(Err::<Option<PartialRecord>, _>(LookupError::Status(503)));
        assert_eq!(failed.kind(), OutcomeKind::Error);
    }

    #[test]
    fn test_record_serializes_abstract_key() {
        let record = CanonicalRecord::assemble(
            PartialRecord {
                abstract_text: Some("Summary".to_string()),
                ..Default::default()
            },
            normalize("9782013944762").unwrap(),
            None,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["abstract"], "Summary");
        assert_eq!(json["isbn"], 9782013944762u64);
    }
}
