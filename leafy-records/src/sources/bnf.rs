//! BnF catalogue source (SRU, Dublin Core record schema)
//!
//! `GET {base}?operation=searchRetrieve&query=bib.isbn all "{isbn}"&recordSchema=dublincore`
//!
//! `numberOfRecords == 0` means not found. Namespace prefixes (`srw:`,
//! `oai_dc:`, `dc:`) are stripped before deserialising, so the structs
//! below use local names only.

use crate::http;
use crate::isbn::{normalize, Isbn13};
use crate::language;
use crate::parsing::{
    clean_creator, publisher_from_imprint, split_title_statement, strip_trailing_place,
};
use crate::types::{LookupError, PartialRecord, SourceAdapter, SourceOutcome};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::debug;

pub struct BnfSource {
    http_client: Client,
    base_url: String,
}

impl BnfSource {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, isbn: &Isbn13) -> Result<Option<PartialRecord>, LookupError> {
        let query = format!("bib.isbn all \"{}\"", isbn);
        let params = [
            ("version", "1.2"),
            ("operation", "searchRetrieve"),
            ("query", query.as_str()),
            ("recordSchema", "dublincore"),
            ("maximumRecords", "1"),
        ];

        let Some(body) = http::get_text(&self.http_client, &self.base_url, &params).await? else {
            return Ok(None);
        };
        parse_response(&body, isbn)
    }
}

#[async_trait]
impl SourceAdapter for BnfSource {
    fn name(&self) -> &'static str {
        "bnf"
    }

    async fn lookup(&self, isbn: &Isbn13) -> SourceOutcome {
        self.fetch(isbn).await.into()
    }
}

// ============================================================================
// SRU Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchRetrieveResponse {
    #[serde(rename = "numberOfRecords", default)]
    number_of_records: u32,
    records: Option<SruRecords>,
}

#[derive(Debug, Deserialize)]
struct SruRecords {
    #[serde(default)]
    record: Vec<SruRecord>,
}

#[derive(Debug, Deserialize)]
struct SruRecord {
    #[serde(rename = "recordData")]
    record_data: Option<RecordData>,
}

#[derive(Debug, Deserialize)]
struct RecordData {
    dc: Option<DublinCore>,
}

#[derive(Debug, Default, Deserialize)]
struct DublinCore {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    creator: Vec<String>,
    #[serde(default)]
    publisher: Vec<String>,
    #[serde(default)]
    date: Vec<String>,
    #[serde(default)]
    description: Vec<String>,
    #[serde(default)]
    format: Vec<String>,
    #[serde(default)]
    language: Vec<String>,
    #[serde(default)]
    identifier: Vec<String>,
}

// ---------------------------------------------------------------------------
// Namespace stripping
// ---------------------------------------------------------------------------

fn xmlns_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\s+xmlns(?::\w+)?="[^"]*""#).ok())
        .as_ref()
}

fn prefix_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(/?)\w+:").ok()).as_ref()
}

/// `<srw:record xmlns:srw="...">` → `<record>`
fn strip_namespaces(xml: &str) -> Result<String, LookupError> {
    let (Some(xmlns), Some(prefix)) = (xmlns_regex(), prefix_regex()) else {
        return Err(LookupError::Parse(
            "Namespace patterns failed to compile".to_string(),
        ));
    };
    let stripped = xmlns.replace_all(xml, "");
    Ok(prefix.replace_all(&stripped, "<$1").into_owned())
}

/// Map an SRU response; `None` when it holds no record
fn parse_response(xml: &str, isbn: &Isbn13) -> Result<Option<PartialRecord>, LookupError> {
    let response: SearchRetrieveResponse = quick_xml::de::from_str(&strip_namespaces(xml)?)
        .map_err(|e| LookupError::Parse(format!("Invalid SRU XML: {}", e)))?;

    if response.number_of_records == 0 {
        debug!(isbn = %isbn, "BnF: numberOfRecords = 0");
        return Ok(None);
    }

    let dc = response
        .records
        .into_iter()
        .flat_map(|r| r.record)
        .find_map(|r| r.record_data.and_then(|d| d.dc))
        .ok_or_else(|| LookupError::Parse("SRU response without Dublin Core record".to_string()))?;

    Ok(Some(map_dublin_core(dc, isbn)))
}

fn map_dublin_core(dc: DublinCore, isbn: &Isbn13) -> PartialRecord {
    let first = |values: &[String]| values.first().map(|v| v.trim().to_string());

    let (title, mut author) = split_title_statement(&first(&dc.title).unwrap_or_default());
    if author.is_empty() {
        author = first(&dc.creator).map(|c| clean_creator(&c)).unwrap_or_default();
    }

    let publisher = first(&dc.publisher).map(|p| {
        if p.contains(" : ") {
            publisher_from_imprint(&p)
        } else {
            strip_trailing_place(&p)
        }
    });

    let echoed_isbn = dc
        .identifier
        .iter()
        .filter_map(|id| id.trim().strip_prefix("ISBN "))
        .find_map(|digits| normalize(digits).ok());

    let record_source = dc
        .identifier
        .iter()
        .map(|id| id.trim())
        .find(|id| id.starts_with("http://") || id.starts_with("https://"))
        .map(str::to_string);

    PartialRecord {
        title,
        author,
        publisher,
        abstract_text: first(&dc.description),
        publication_date: first(&dc.date),
        format: first(&dc.format),
        language: language::derive(first(&dc.language).as_deref(), isbn),
        isbn: echoed_isbn,
        cover: None,
        record_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<srw:searchRetrieveResponse xmlns:srw="http://www.loc.gov/zing/srw/">
  <srw:version>1.2</srw:version>
  <srw:numberOfRecords>1</srw:numberOfRecords>
  <srw:records>
    <srw:record>
      <srw:recordSchema>dc</srw:recordSchema>
      <srw:recordPacking>xml</srw:recordPacking>
      <srw:recordData>
        <oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.openarchives.org/OAI/2.0/oai_dc/ http://www.openarchives.org/OAI/2.0/oai_dc.xsd">
          <dc:identifier>https://catalogue.bnf.fr/ark:/12148/cb43522316s</dc:identifier>
          <dc:title>Je t'aimerai toujours, quoi qu'il arrive</dc:title>
          <dc:creator>Gliori, Debi (1959-....). Auteur du texte</dc:creator>
          <dc:publisher>Hachette jeunesse (Paris)</dc:publisher>
          <dc:date>2013</dc:date>
          <dc:description>Petit Renard a peur.</dc:description>
          <dc:format>1 vol. (non paginé) : ill. en coul. ; 27 cm</dc:format>
          <dc:language>fre</dc:language>
          <dc:identifier>ISBN 9782013944762</dc:identifier>
        </oai_dc:dc>
      </srw:recordData>
      <srw:recordPosition>1</srw:recordPosition>
    </srw:record>
  </srw:records>
</srw:searchRetrieveResponse>"#;

    const EMPTY: &str = r#"<srw:searchRetrieveResponse xmlns:srw="http://www.loc.gov/zing/srw/">
  <srw:version>1.2</srw:version>
  <srw:numberOfRecords>0</srw:numberOfRecords>
</srw:searchRetrieveResponse>"#;

    fn isbn() -> Isbn13 {
        normalize("9782013944762").unwrap()
    }

    #[test]
    fn test_strip_namespaces() {
        assert_eq!(
            strip_namespaces(r#"<srw:a xmlns:srw="x"><b/></srw:a>"#).unwrap(),
            "<a><b/></a>"
        );
    }

    #[test]
    fn test_namespace_patterns_compile() {
        assert!(xmlns_regex().is_some());
        assert!(prefix_regex().is_some());
    }

    #[test]
    fn test_found_record() {
        let record = parse_response(FOUND, &isbn()).unwrap().unwrap();
        assert_eq!(record.title, "Je t'aimerai toujours, quoi qu'il arrive");
        assert_eq!(record.author, "Gliori, Debi");
        assert_eq!(record.publisher.as_deref(), Some("Hachette jeunesse"));
        assert_eq!(record.language.as_deref(), Some("fr"));
        assert_eq!(record.isbn, Some(isbn()));
        assert_eq!(
            record.record_source.as_deref(),
            Some("https://catalogue.bnf.fr/ark:/12148/cb43522316s")
        );
        assert_eq!(record.cover, None);
    }

    #[test]
    fn test_zero_records_is_not_found() {
        assert_eq!(parse_response(EMPTY, &isbn()).unwrap(), None);
    }

    #[test]
    fn test_malformed_is_error() {
        assert!(matches!(
            parse_response("<html>Service unavailable", &isbn()),
            Err(LookupError::Parse(_))
        ));
    }
}
