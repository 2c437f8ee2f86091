//! Resolution orchestrator
//!
//! Normalise → try sources in order until one has a record → fill a
//! missing cover from the cover resolvers → assemble the canonical record.
//!
//! Sources are consulted strictly one after another; the first `Found`
//! wins and later sources are never called. `NotFound` and `SourceError`
//! both advance the cascade.

use crate::covers::build_covers;
use crate::http::build_client;
use crate::isbn::{normalize, Isbn13, IsbnError};
use crate::sources::build_sources;
use crate::types::{
    CanonicalRecord, CoverResolver, OutcomeKind, PartialRecord, SourceAdapter, SourceOutcome,
};
use leafy_common::config::LookupConfig;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why no record was produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Input rejected before any network call
    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(#[from] IsbnError),

    /// Every source answered not found or failed
    #[error("No record found for ISBN {0}")]
    NoRecordFound(Isbn13),

    /// Caller abandoned the lookup
    #[error("Resolution cancelled")]
    Cancelled,
}

/// One consulted source and how it answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAttempt {
    pub source: &'static str,
    pub outcome: OutcomeKind,
}

/// Record plus provenance of each part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub record: CanonicalRecord,
    /// Source that supplied the record
    pub source: &'static str,
    /// Cover resolver that supplied the cover, when the source had none
    pub cover_source: Option<&'static str>,
    /// Sources consulted, in order, ending with the winner
    pub attempts: Vec<SourceAttempt>,
}

/// ISBN → canonical record engine
///
/// Holds no per-lookup state; one instance can serve concurrent lookups.
pub struct Resolver {
    sources: Vec<Arc<dyn SourceAdapter>>,
    covers: Vec<Arc<dyn CoverResolver>>,
}

impl Resolver {
    /// Resolver over explicit adapters, tried in the given order
    pub fn new(sources: Vec<Arc<dyn SourceAdapter>>, covers: Vec<Arc<dyn CoverResolver>>) -> Self {
        Self { sources, covers }
    }

    /// Resolver with the configured sources and cover resolvers, sharing
    /// one HTTP client
    pub fn from_config(config: &LookupConfig) -> leafy_common::Result<Self> {
        let http_client = build_client(config)?;
        let sources = build_sources(config, &http_client);
        let covers = build_covers(config, &http_client);
        debug!(
            sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            covers = ?covers.iter().map(|c| c.name()).collect::<Vec<_>>(),
            "Resolver configured"
        );
        Ok(Self::new(sources, covers))
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn cover_names(&self) -> Vec<&'static str> {
        self.covers.iter().map(|c| c.name()).collect()
    }

    /// Resolve a raw ISBN string; `None` for invalid input or when no
    /// source has a record
    pub async fn resolve(&self, raw_isbn: &str) -> Option<CanonicalRecord> {
        self.resolve_detailed(raw_isbn).await.ok().map(|r| r.record)
    }

    /// Like [`resolve`](Self::resolve), but aborts the in-flight request
    /// when `token` fires
    pub async fn resolve_with_cancellation(
        &self,
        raw_isbn: &str,
        token: &CancellationToken,
    ) -> Result<Resolution, ResolveError> {
        if token.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!(input = %raw_isbn, "Resolution cancelled by caller");
                Err(ResolveError::Cancelled)
            }
            result = self.resolve_detailed(raw_isbn) => result,
        }
    }

    /// Resolve with provenance
    pub async fn resolve_detailed(&self, raw_isbn: &str) -> Result<Resolution, ResolveError> {
        let isbn = normalize(raw_isbn).map_err(|e| {
            debug!(input = %raw_isbn, error = %e, "Rejected ISBN input");
            ResolveError::InvalidIsbn(e)
        })?;

        let mut attempts = Vec::with_capacity(self.sources.len());
        let (partial, winner) = match self.run_sources(&isbn, &mut attempts).await {
            Some(found) => found,
            None => {
                info!(isbn = %isbn, attempts = attempts.len(), "No source has a record");
                return Err(ResolveError::NoRecordFound(isbn));
            }
        };

        let has_cover = partial
            .cover
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());

        let (cover, cover_source) = if has_cover {
            (None, None)
        } else if winner.checks_cover() {
            debug!(isbn = %isbn, source = winner.name(), "Source already checked covers, skipping cover cascade");
            (None, None)
        } else {
            match self.run_covers(&isbn).await {
                Some((url, name)) => (Some(url), Some(name)),
                None => (None, None),
            }
        };

        let record = CanonicalRecord::assemble(partial, isbn, cover);
        info!(
            isbn = %isbn,
            source = winner.name(),
            cover = record.cover.is_some(),
            "Resolved record"
        );

        Ok(Resolution {
            record,
            source: winner.name(),
            cover_source,
            attempts,
        })
    }

    async fn run_sources(
        &self,
        isbn: &Isbn13,
        attempts: &mut Vec<SourceAttempt>,
    ) -> Option<(PartialRecord, &Arc<dyn SourceAdapter>)> {
        for source in &self.sources {
            debug!(isbn = %isbn, source = source.name(), "Trying source");
            let outcome = source.lookup(isbn).await;
            attempts.push(SourceAttempt {
                source: source.name(),
                outcome: outcome.kind(),
            });

            match outcome {
                SourceOutcome::Found(partial) => return Some((partial, source)),
                SourceOutcome::NotFound => {
                    debug!(isbn = %isbn, source = source.name(), "Not found at source");
                }
                SourceOutcome::SourceError(e) => {
                    warn!(isbn = %isbn, source = source.name(), error = %e, "Source failed");
                }
            }
        }
        None
    }

    async fn run_covers(&self, isbn: &Isbn13) -> Option<(String, &'static str)> {
        for resolver in &self.covers {
            debug!(isbn = %isbn, resolver = resolver.name(), "Trying cover resolver");
            if let Some(url) = resolver.find_cover(isbn).await {
                debug!(isbn = %isbn, resolver = resolver.name(), cover = %url, "Cover found");
                return Some((url, resolver.name()));
            }
        }
        None
    }
}
