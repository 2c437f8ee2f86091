//! Setup errors shared by the Leafy crates
//!
//! Per-lookup failures live in `leafy_records` (`LookupError`, `ResolveError`).

use thiserror::Error;

/// Result with the shared [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a lookup
#[derive(Error, Debug)]
pub enum Error {
    /// Log file could not be opened for appending
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or malformed TOML, an HTTP client that fails to build,
    /// or an unparseable log level
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown source name or an empty source list
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Global tracing subscriber was already installed
    #[error("Internal error: {0}")]
    Internal(String),
}
