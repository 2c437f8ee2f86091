//! Configuration loading for the Leafy record lookup
//!
//! Two tiers, highest priority first:
//! 1. Environment variables (credentials only)
//! 2. TOML config file
//!
//! Missing config files never abort startup: a warning is logged and the
//! compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the image-search API key
pub const ENV_GOOGLE_API_KEY: &str = "LEAFY_GOOGLE_API_KEY";

/// Environment variable holding the image-search engine identifier
pub const ENV_GOOGLE_CSE_ID: &str = "LEAFY_GOOGLE_CSE_ID";

/// Bibliographic services that can produce a full record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    GoogleBooks,
    Sudoc,
    Bnf,
    OpenLibrary,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::GoogleBooks => "google_books",
            SourceKind::Sudoc => "sudoc",
            SourceKind::Bnf => "bnf",
            SourceKind::OpenLibrary => "open_library",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google_books" | "googlebooks" | "google" => Ok(SourceKind::GoogleBooks),
            "sudoc" => Ok(SourceKind::Sudoc),
            "bnf" => Ok(SourceKind::Bnf),
            "open_library" | "openlibrary" => Ok(SourceKind::OpenLibrary),
            other => Err(Error::InvalidInput(format!("Unknown source: {}", other))),
        }
    }
}

/// Services that can only contribute a cover image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverKind {
    OpenLibraryCovers,
    ImageSearch,
}

impl CoverKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverKind::OpenLibraryCovers => "open_library_covers",
            CoverKind::ImageSearch => "image_search",
        }
    }
}

impl fmt::Display for CoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials for the general image-search cover fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchConfig {
    /// API key of the search service
    pub api_key: String,
    /// Programmable search engine identifier (`cx`)
    pub engine_id: String,
}

impl ImageSearchConfig {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    /// Both values present and non-blank
    pub fn is_usable(&self) -> bool {
        is_valid_key(&self.api_key) && is_valid_key(&self.engine_id)
    }
}

/// Placeholder-cover detection thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Image bodies shorter than this are stock "no cover" graphics
    pub min_bytes: usize,
    /// Known fixed pixel sizes (width, height) of stock graphics
    pub dimensions: Vec<[u32; 2]>,
    /// Case-insensitive substrings marking "no image" links
    pub sentinels: Vec<String>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            min_bytes: 50,
            dimensions: vec![[1, 1], [92, 138]],
            sentinels: ["no-image", "noimage", "no_cover", "nocover", "placeholder"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Base URLs of the external services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub google_books: String,
    pub sudoc: String,
    pub bnf_sru: String,
    pub open_library: String,
    pub open_library_covers: String,
    pub custom_search: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_books: "https://www.googleapis.com/books/v1".to_string(),
            sudoc: "https://www.sudoc.fr".to_string(),
            bnf_sru: "https://catalogue.bnf.fr/api/SRU".to_string(),
            open_library: "https://openlibrary.org".to_string(),
            open_library_covers: "https://covers.openlibrary.org".to_string(),
            custom_search: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every service at one base URL (mock servers, mirrors)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            google_books: format!("{}/books/v1", base),
            sudoc: base.to_string(),
            bnf_sru: format!("{}/api/SRU", base),
            open_library: base.to_string(),
            open_library_covers: base.to_string(),
            custom_search: format!("{}/customsearch/v1", base),
        }
    }
}

/// Record lookup configuration
///
/// Passed explicitly into the resolver; nothing in the engine reads
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Cascade order of record sources
    pub source_order: Vec<SourceKind>,
    /// Cascade order of cover resolvers
    pub cover_order: Vec<CoverKind>,
    /// Whole-request timeout per outbound call (milliseconds)
    pub request_timeout_ms: u64,
    /// Connection establishment timeout (milliseconds)
    pub connect_timeout_ms: u64,
    /// User-Agent sent to every service
    pub user_agent: String,
    /// Optional quota key for Google Books
    pub google_books_api_key: Option<String>,
    /// Image-search credentials; the image-search resolver is skipped without them
    pub image_search: Option<ImageSearchConfig>,
    pub placeholder: PlaceholderConfig,
    pub endpoints: Endpoints,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source_order: vec![
                SourceKind::GoogleBooks,
                SourceKind::Sudoc,
                SourceKind::Bnf,
                SourceKind::OpenLibrary,
            ],
            cover_order: vec![CoverKind::OpenLibraryCovers, CoverKind::ImageSearch],
            request_timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            user_agent: format!("leafy-records/{}", env!("CARGO_PKG_VERSION")),
            google_books_api_key: None,
            image_search: None,
            placeholder: PlaceholderConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl LookupConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Source order with duplicates removed (first occurrence wins)
    pub fn effective_source_order(&self) -> Vec<SourceKind> {
        let mut seen = Vec::with_capacity(self.source_order.len());
        for kind in &self.source_order {
            if !seen.contains(kind) {
                seen.push(*kind);
            }
        }
        seen
    }

    /// Cover order with duplicates removed (first occurrence wins)
    pub fn effective_cover_order(&self) -> Vec<CoverKind> {
        let mut seen = Vec::with_capacity(self.cover_order.len());
        for kind in &self.cover_order {
            if !seen.contains(kind) {
                seen.push(*kind);
            }
        }
        seen
    }

    /// Parse a comma-separated source list (`"sudoc,bnf"`)
    pub fn parse_source_list(list: &str) -> Result<Vec<SourceKind>> {
        let kinds = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(SourceKind::from_str)
            .collect::<Result<Vec<_>>>()?;
        if kinds.is_empty() {
            return Err(Error::InvalidInput("Empty source list".to_string()));
        }
        Ok(kinds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Top-level TOML file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub lookup: LookupConfig,
}

/// Platform config file location (`~/.config/leafy/leafy-records.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("leafy").join("leafy-records.toml"))
}

/// Where [`load_config_file`] took its settings from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// Path had no file; defaults used
    Missing(PathBuf),
    /// No path given and no platform config directory; defaults used
    NoConfigDir,
}

impl ConfigOrigin {
    /// Emit the startup notice for this origin
    ///
    /// Called by binaries once logging is up, since the file is read first.
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
            ConfigOrigin::Missing(path) => {
                warn!("Config file not found: {}, using defaults", path.display())
            }
            ConfigOrigin::NoConfigDir => {
                warn!("Could not determine config directory, using defaults")
            }
        }
    }
}

/// Read the TOML config without logging
///
/// Uses `path` when given, the platform default otherwise. A missing file
/// yields defaults; an unreadable or malformed one is an error.
pub fn load_config_file(path: Option<&Path>) -> Result<(TomlConfig, ConfigOrigin)> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => return Ok((TomlConfig::default(), ConfigOrigin::NoConfigDir)),
    };

    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigOrigin::Missing(path)));
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    Ok((config, ConfigOrigin::File(path)))
}

/// Load the TOML config and log where it came from
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let (config, origin) = load_config_file(path)?;
    origin.log();
    Ok(config)
}

/// Resolve image-search credentials
///
/// **Priority:** ENV → TOML. Both environment variables must be set for
/// the environment tier to apply.
pub fn resolve_image_search(toml_value: Option<&ImageSearchConfig>) -> Option<ImageSearchConfig> {
    let env_value = match (
        std::env::var(ENV_GOOGLE_API_KEY).ok(),
        std::env::var(ENV_GOOGLE_CSE_ID).ok(),
    ) {
        (Some(key), Some(cx)) => Some(ImageSearchConfig::new(key, cx)),
        _ => None,
    }
    .filter(ImageSearchConfig::is_usable);

    let toml_value = toml_value.filter(|c| c.is_usable()).cloned();

    if env_value.is_some() && toml_value.is_some() {
        warn!("Image search credentials found in environment and TOML. Using environment.");
    }

    if let Some(config) = env_value {
        info!("Image search credentials loaded from environment");
        return Some(config);
    }
    if let Some(config) = toml_value {
        info!("Image search credentials loaded from TOML config");
        return Some(config);
    }

    warn!(
        "Image search not configured ({} / {}); cover fallback limited to cover services",
        ENV_GOOGLE_API_KEY, ENV_GOOGLE_CSE_ID
    );
    None
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
