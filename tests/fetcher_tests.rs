//! Polite fetcher behavior against a mock server

mod common;

use common::test_config;
use common::wiremock_helpers::{mount_error, mount_html};
use companyenrich::fetch::{FetchError, PoliteFetcher};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> PoliteFetcher {
    let config = test_config();
    PoliteFetcher::new(&config.http, &config.politeness).unwrap()
}

#[tokio::test]
async fn get_returns_body_and_content_type() {
    let server = MockServer::start().await;
    mount_html(&server, "/page", "<html><body>hello</body></html>").await;

    let fetched = fetcher().get(&format!("{}/page", server.uri())).await.unwrap();
    assert!(fetched.text().contains("hello"));
    assert!(fetched.content_type.contains("text/html"));
    assert!(!fetched.is_pdf());
}

#[tokio::test]
async fn get_maps_server_error_to_status_error() {
    let server = MockServer::start().await;
    mount_error(&server, 500).await;

    let result = fetcher().get(&format!("{}/anything", server.uri())).await;
    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn probe_accepts_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let status = fetcher().probe(&server.uri()).await.unwrap();
    assert_eq!(status.as_u16(), 200);
}

#[tokio::test]
async fn probe_rejects_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fetcher().probe(&server.uri()).await;
    assert!(matches!(result, Err(FetchError::Status { .. })));
}
