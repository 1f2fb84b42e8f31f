mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{calls, operating_system_concepts, MockSource, OSC_CITATION};
use isbncite::{
    config::RelayConfig,
    lookup::CitationService,
    relay::SubmissionRelay,
    server::{router, TheStateOfAffairs},
    sources::BookSource,
};
use pretty_assertions::assert_eq;
use reqwest::Client;
use serde_json::Value;
use tower::ServiceExt;

fn app(source: impl BookSource + 'static, relay_endpoint: &str) -> Router {
    let relay = RelayConfig {
        endpoint: relay_endpoint.to_string(),
        ..RelayConfig::default()
    };
    router(Arc::new(TheStateOfAffairs {
        service: CitationService::new(Box::new(source)),
        relay:   SubmissionRelay::new(Client::new(), &relay),
    }))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn index_shows_the_form() {
    let (source, _) = MockSource::not_found();
    let (status, body) = send(app(source, "http://127.0.0.1:1"), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="isbn""#));
    assert!(body.contains(r#"action="/cite""#));
}

#[tokio::test]
async fn cite_renders_the_citation_in_italics() {
    let (source, _) = MockSource::found(operating_system_concepts());
    let (status, body) = send(
        app(source, "http://127.0.0.1:1"),
        form("/cite", "isbn=978-0136019701"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        "Silberschatz, Abraham. <i>Operating System Concepts</i>. 9th ed., Wiley, 2012."
    ));
    // the submission form carries the citation as plain text
    assert!(body.contains(&format!(
        r#"name="citation" value="{}""#,
        OSC_CITATION.replace('*', "")
    )));
}

#[tokio::test]
async fn cite_shows_validation_inline() {
    let (source, counter) = MockSource::found(operating_system_concepts());
    let (status, body) = send(app(source, "http://127.0.0.1:1"), form("/cite", "isbn=12345")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#"id="isbn-error">ISBN must be at least 10 characters long."#));
    assert_eq!(calls(&counter), 0);
}

#[tokio::test]
async fn cite_not_found() {
    let (source, _) = MockSource::not_found();
    let (status, body) = send(
        app(source, "http://127.0.0.1:1"),
        form("/cite", "isbn=9780136019701"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Could not find a book with ISBN: 9780136019701."));
}

#[tokio::test]
async fn api_returns_the_record() {
    let (source, _) = MockSource::found(operating_system_concepts());
    let (status, body) = send(app(source, "http://127.0.0.1:1"), get("/api/isbn/978-0136019701")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["mlaCitation"], OSC_CITATION);
    assert_eq!(json["isbn13"], "9780136019701");
    assert_eq!(json["edition"], "9");
}

#[tokio::test]
async fn api_query_form() {
    let (source, _) = MockSource::found(operating_system_concepts());
    let (status, body) = send(
        app(source, "http://127.0.0.1:1"),
        get("/api/isbn?content=9780136019701"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("mlaCitation"));

    let (source, _) = MockSource::found(operating_system_concepts());
    let (status, _) = send(app(source, "http://127.0.0.1:1"), get("/api/isbn")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_errors() {
    let (source, _) = MockSource::failing("dns failure");
    let (status, body) = send(app(source, "http://127.0.0.1:1"), get("/api/isbn/9780136019701")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json.get("field").is_none());
    assert!(!json["error"].as_str().unwrap().contains("dns"));

    let (source, _) = MockSource::not_found();
    let (status, _) = send(app(source, "http://127.0.0.1:1"), get("/api/isbn/9780136019701")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (source, _) = MockSource::not_found();
    let (status, body) = send(app(source, "http://127.0.0.1:1"), get("/api/isbn/97801%2036019701")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["field"], "isbn");
}

#[tokio::test]
async fn submit_rejects_zero_quantity() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/formResponse")
        .expect(0)
        .create_async()
        .await;

    let (source, _) = MockSource::not_found();
    let endpoint = format!("{}/formResponse", server.url());
    let (status, body) = send(
        app(source, &endpoint),
        form("/submit", "citation=A.+*B*.+C%2C+2020.&quantity=0"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#"id="quantity-error">Quantity must be a positive whole number."#));
    mock.assert_async().await;
}

#[tokio::test]
async fn submit_relays() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/formResponse")
        .match_body(mockito::Matcher::UrlEncoded(
            "entry.1000000".into(),
            "A. *B*. C, 2020. + [3 units]".into(),
        ))
        .create_async()
        .await;

    let (source, _) = MockSource::not_found();
    let endpoint = format!("{}/formResponse", server.url());
    let (status, body) = send(
        app(source, &endpoint),
        form("/submit", "citation=A.+*B*.+C%2C+2020.&quantity=3"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Citation submitted."));
    mock.assert_async().await;
}

/// Pulls the hidden citation value out of a rendered page.
fn hidden_citation(body: &str) -> String {
    let start = body.find(r#"name="citation" value=""#).unwrap() + r#"name="citation" value=""#.len();
    let end = start + body[start..].find('"').unwrap();
    body[start..end].to_string()
}

#[tokio::test]
async fn cite_then_submit_relays_plain_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/formResponse")
        .match_body(mockito::Matcher::UrlEncoded(
            "entry.1000000".into(),
            "Silberschatz, Abraham. Operating System Concepts. 9th ed., Wiley, 2012. + [2 units]"
                .into(),
        ))
        .create_async()
        .await;
    let endpoint = format!("{}/formResponse", server.url());

    let (source, _) = MockSource::found(operating_system_concepts());
    let (status, body) = send(app(source, &endpoint), form("/cite", "isbn=978-0136019701")).await;
    assert_eq!(status, StatusCode::OK);
    let citation = hidden_citation(&body);
    assert!(!citation.contains('*'), "{citation}");

    let encoded = serde_urlencoded::to_string([("citation", citation.as_str()), ("quantity", "2")]).unwrap();
    let (source, _) = MockSource::not_found();
    let (status, _) = send(app(source, &endpoint), form("/submit", &encoded)).await;
    assert_eq!(status, StatusCode::OK);
    mock.assert_async().await;
}
