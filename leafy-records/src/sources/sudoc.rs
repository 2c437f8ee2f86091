//! Sudoc source (French academic union catalogue)
//!
//! Two steps:
//! 1. `GET {base}/services/isbn2ppn/{isbn}`: XML mapping the ISBN to a PPN
//!    (Sudoc record number). `<error>` or 404 → not found.
//! 2. `GET {base}/{ppn}.rdf`: RDF/XML record, queried for the `bibo:Book`
//!    node and its Dublin Core properties.

use crate::http;
use crate::isbn::Isbn13;
use crate::language;
use crate::parsing::{publisher_from_imprint, split_title_statement};
use crate::types::{LookupError, PartialRecord, SourceAdapter, SourceOutcome};
use async_trait::async_trait;
use oxrdf::{NamedOrBlankNode, Term};
use oxrdfio::{RdfFormat, RdfParser};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const BIBO_BOOK: &str = "http://purl.org/ontology/bibo/Book";
const DC: &str = "http://purl.org/dc/elements/1.1/";
const DCTERMS: &str = "http://purl.org/dc/terms/";

pub struct SudocSource {
    http_client: Client,
    base_url: String,
}

impl SudocSource {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, isbn: &Isbn13) -> Result<Option<PartialRecord>, LookupError> {
        let base = self.base_url.trim_end_matches('/');

        // Step 1: ISBN → PPN. A miss here is "not found", never an error.
        let url = format!("{}/services/isbn2ppn/{}", base, isbn);
        let Some(body) = http::get_text(&self.http_client, &url, &[]).await? else {
            return Ok(None);
        };
        let Some(ppn) = parse_ppn(&body)? else {
            return Ok(None);
        };
        debug!(isbn = %isbn, ppn = %ppn, "Sudoc: got PPN");

        // Step 2: PPN → RDF record
        let url = format!("{}/{}.rdf", base, ppn);
        let Some(rdf) = http::get_text(&self.http_client, &url, &[]).await? else {
            return Ok(None);
        };
        parse_record(&rdf, &url, isbn).map(Some)
    }
}

#[async_trait]
impl SourceAdapter for SudocSource {
    fn name(&self) -> &'static str {
        "sudoc"
    }

    async fn lookup(&self, isbn: &Isbn13) -> SourceOutcome {
        self.fetch(isbn).await.into()
    }
}

// ============================================================================
// isbn2ppn
// ============================================================================

#[derive(Debug, Deserialize)]
struct Isbn2PpnResponse {
    error: Option<String>,
    #[serde(default)]
    query: Vec<PpnQuery>,
}

#[derive(Debug, Deserialize)]
struct PpnQuery {
    #[serde(default, rename = "resultNoHolding")]
    result_no_holding: Vec<PpnResult>,
    #[serde(default)]
    result: Vec<PpnResult>,
}

#[derive(Debug, Deserialize)]
struct PpnResult {
    #[serde(default)]
    ppn: Vec<String>,
}

/// First PPN of the response, preferring records without holdings
fn parse_ppn(xml: &str) -> Result<Option<String>, LookupError> {
    let response: Isbn2PpnResponse = quick_xml::de::from_str(xml)
        .map_err(|e| LookupError::Parse(format!("Invalid isbn2ppn XML: {}", e)))?;

    if let Some(error) = response.error {
        debug!(error = %error.trim(), "Sudoc isbn2ppn returned an error node");
        return Ok(None);
    }

    let ppn = response.query.into_iter().find_map(|q| {
        let results = if q.result_no_holding.is_empty() {
            q.result
        } else {
            q.result_no_holding
        };
        results
            .into_iter()
            .flat_map(|r| r.ppn)
            .map(|p| p.trim().to_string())
            .find(|p| !p.is_empty())
    });
    Ok(ppn)
}

// ============================================================================
// RDF record
// ============================================================================

struct Statement {
    subject: String,
    predicate: String,
    object: Option<String>,
}

fn subject_key(subject: &NamedOrBlankNode) -> String {
    match subject {
        NamedOrBlankNode::NamedNode(n) => n.as_str().to_string(),
        NamedOrBlankNode::BlankNode(b) => format!("_:{}", b.as_str()),
        #[allow(unreachable_patterns)]
        _ => subject.to_string(),
    }
}

fn term_value(term: &Term) -> Option<String> {
    match term {
        Term::NamedNode(n) => Some(n.as_str().to_string()),
        Term::Literal(l) => Some(l.value().to_string()),
        _ => None,
    }
}

/// Map the `bibo:Book` node of an RDF/XML document
fn parse_record(rdf: &str, base_iri: &str, isbn: &Isbn13) -> Result<PartialRecord, LookupError> {
    let parser = RdfParser::from_format(RdfFormat::RdfXml)
        .with_base_iri(base_iri)
        .map_err(|e| LookupError::Parse(format!("Invalid base IRI {}: {}", base_iri, e)))?;

    let mut statements = Vec::new();
    for quad in parser.for_reader(rdf.as_bytes()) {
        let quad = quad.map_err(|e| LookupError::Parse(format!("Invalid RDF/XML: {}", e)))?;
        statements.push(Statement {
            subject: subject_key(&quad.subject),
            predicate: quad.predicate.as_str().to_string(),
            object: term_value(&quad.object),
        });
    }

    let value = |subject: &str, predicate: &str| -> Option<String> {
        statements
            .iter()
            .filter(|s| s.subject == subject && s.predicate == predicate)
            .find_map(|s| s.object.clone())
    };

    let book = statements
        .iter()
        .filter(|s| s.predicate == RDF_TYPE && s.object.as_deref() == Some(BIBO_BOOK))
        .map(|s| s.subject.as_str())
        .find(|subject| value(*subject, &format!("{}title", DC)).is_some())
        .ok_or_else(|| LookupError::Parse("No bibo:Book with a dc:title in record".to_string()))?;

    let statement = value(book, &format!("{}title", DC)).unwrap_or_default();
    let (title, author) = split_title_statement(&statement);

    let language_hint = value(book, &format!("{}language", DCTERMS))
        .or_else(|| value(book, &format!("{}language", DC)));

    Ok(PartialRecord {
        title,
        author,
        publisher: value(book, &format!("{}publisher", DC)).map(|p| publisher_from_imprint(&p)),
        abstract_text: value(book, &format!("{}abstract", DCTERMS)),
        publication_date: value(book, &format!("{}date", DC)),
        format: value(book, &format!("{}format", DC)),
        language: language::derive(language_hint.as_deref(), isbn),
        isbn: None,
        cover: None,
        record_source: (!book.starts_with("_:")).then(|| book.to_string()),
    })
}
