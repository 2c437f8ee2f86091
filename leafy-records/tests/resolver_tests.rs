//! End-to-end resolution against mocked catalogue and cover services

mod helpers;

use helpers::{fixture, mock_config, mock_config_with_search, png, LogCapture, EN_ISBN, FR_ISBN};
use leafy_common::config::SourceKind;
use leafy_records::{OutcomeKind, ResolveError, Resolver, SourceAttempt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

fn body(name: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(fixture(name))
}

#[tokio::test]
async fn cascade_falls_through_to_sudoc_and_fills_cover_from_search() {
    let server = MockServer::start().await;
    mount(&server, "/books/v1/volumes", body("google_books_empty.json"), 1).await;
    mount(
        &server,
        &format!("/services/isbn2ppn/{}", FR_ISBN),
        body("sudoc_isbn2ppn.xml"),
        1,
    )
    .await;
    mount(&server, "/169476979.rdf", body("sudoc_record.rdf"), 1).await;
    // Later sources are never consulted
    mount(&server, "/api/SRU", body("bnf_sru_record.xml"), 0).await;
    mount(&server, "/api/books", body("open_library_book.json"), 0).await;
    // Cover probe answers with the stock 92x138 graphic
    mount(
        &server,
        &format!("/b/isbn/{}-L.jpg", FR_ISBN),
        ResponseTemplate::new(200).set_body_bytes(png(92, 138)),
        1,
    )
    .await;
    mount(&server, "/customsearch/v1", body("custom_search.json"), 1).await;

    let resolver = Resolver::from_config(&mock_config_with_search(&server)).unwrap();
    let resolution = resolver.resolve_detailed(FR_ISBN).await.unwrap();

    let record = &resolution.record;
    assert_eq!(record.title, "Je t'aimerai toujours, quoi qu'il arrive");
    assert_eq!(record.author, "Debi Gliori");
    assert_eq!(record.publisher.as_deref(), Some("Hachette jeunesse"));
    assert_eq!(record.language.as_deref(), Some("fr"));
    assert_eq!(record.cover.as_deref(), Some("https://example.com/cover.jpg"));
    assert_eq!(record.isbn.map(|i| i.value()), Some(9782013944762));

    assert_eq!(resolution.source, "sudoc");
    assert_eq!(resolution.cover_source, Some("image_search"));
    assert_eq!(
        resolution.attempts,
        vec![
            SourceAttempt {
                source: "google_books",
                outcome: OutcomeKind::NotFound
            },
            SourceAttempt {
                source: "sudoc",
                outcome: OutcomeKind::Found
            },
        ]
    );
}

#[tokio::test]
async fn source_cover_skips_cover_services() {
    let server = MockServer::start().await;
    mount(&server, "/books/v1/volumes", body("google_books_volume.json"), 1).await;
    mount(
        &server,
        &format!("/b/isbn/{}-L.jpg", FR_ISBN),
        ResponseTemplate::new(200).set_body_bytes(png(180, 270)),
        0,
    )
    .await;

    let resolver = Resolver::from_config(&mock_config(&server)).unwrap();
    let record = resolver.resolve("978-2-01-394476-2").await.unwrap();

    assert_eq!(
        record.cover.as_deref(),
        Some("https://books.google.com/books/content?id=Yq2CAQAAQBAJ&zoom=1")
    );
    assert_eq!(record.isbn.map(|i| i.value()), Some(9782013944762));
}

#[tokio::test]
async fn open_library_winner_skips_cover_probe() {
    let server = MockServer::start().await;
    let mut config = mock_config(&server);
    config.source_order = vec![SourceKind::OpenLibrary];

    let no_cover = r#"{"ISBN:9780738531366": {"title": "Fullerton", "url": "https://openlibrary.org/books/OL8966064M"}}"#;
    mount(
        &server,
        "/api/books",
        ResponseTemplate::new(200).set_body_string(no_cover),
        1,
    )
    .await;
    mount(
        &server,
        &format!("/b/isbn/{}-L.jpg", EN_ISBN),
        ResponseTemplate::new(200).set_body_bytes(png(180, 270)),
        0,
    )
    .await;

    let resolver = Resolver::from_config(&config).unwrap();
    let resolution = resolver.resolve_detailed(EN_ISBN).await.unwrap();
    assert_eq!(resolution.record.title, "Fullerton");
    assert_eq!(resolution.record.cover, None);
    assert_eq!(resolution.cover_source, None);
}

#[tokio::test]
async fn failing_sources_are_logged_and_skipped() {
    let (logs, _guard) = LogCapture::install();

    let server = MockServer::start().await;
    mount(&server, "/books/v1/volumes", ResponseTemplate::new(500), 1).await;
    mount(
        &server,
        &format!("/services/isbn2ppn/{}", FR_ISBN),
        ResponseTemplate::new(200).set_body_string("<sudoc><query>"),
        1,
    )
    .await;
    mount(&server, "/api/SRU", body("bnf_sru_record.xml"), 1).await;
    mount(
        &server,
        &format!("/b/isbn/{}-L.jpg", FR_ISBN),
        ResponseTemplate::new(404),
        1,
    )
    .await;

    let resolver = Resolver::from_config(&mock_config(&server)).unwrap();
    let resolution = resolver.resolve_detailed(FR_ISBN).await.unwrap();

    assert_eq!(resolution.source, "bnf");
    assert_eq!(resolution.record.author, "Gliori, Debi");
    assert_eq!(resolution.record.cover, None);
    assert_eq!(
        resolution
            .attempts
            .iter()
            .map(|a| a.outcome)
            .collect::<Vec<_>>(),
        vec![OutcomeKind::Error, OutcomeKind::Error, OutcomeKind::Found]
    );
    assert!(logs.contains_at(Level::WARN, "Source failed"));
    logs.assert_contains("Resolved record");
}

#[tokio::test]
async fn nothing_found_anywhere() {
    let server = MockServer::start().await;
    mount(&server, "/books/v1/volumes", body("google_books_empty.json"), 1).await;
    mount(
        &server,
        &format!("/services/isbn2ppn/{}", FR_ISBN),
        body("sudoc_isbn2ppn_error.xml"),
        1,
    )
    .await;
    mount(&server, "/api/SRU", body("bnf_sru_empty.xml"), 1).await;
    mount(
        &server,
        "/api/books",
        ResponseTemplate::new(200).set_body_string("{}"),
        1,
    )
    .await;
    mount(&server, &format!("/b/isbn/{}-L.jpg", FR_ISBN), ResponseTemplate::new(404), 0).await;

    let resolver = Resolver::from_config(&mock_config(&server)).unwrap();
    assert!(matches!(
        resolver.resolve_detailed(FR_ISBN).await,
        Err(ResolveError::NoRecordFound(_))
    ));
}

#[tokio::test]
async fn invalid_input_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = Resolver::from_config(&mock_config(&server)).unwrap();
    for raw in ["", "   ", "978-201", "97820139447X2", "9782013944761"] {
        assert_eq!(resolver.resolve(raw).await, None, "input {:?}", raw);
    }
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/v1/volumes"))
        .respond_with(body("google_books_volume.json").set_delay(Duration::from_millis(1_500)))
        .mount(&server)
        .await;

    let resolver = Resolver::from_config(&mock_config(&server)).unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = resolver.resolve_with_cancellation(FR_ISBN, &token).await;
    assert_eq!(result, Err(ResolveError::Cancelled));
}
