use esg_ingest::{EsgError, HttpFetcher, PayloadFetcher, SourceTag, WebhookNotification};
use httpmock::{Method::GET, MockServer};

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    HttpFetcher::builder()
        .endpoint("upload", format!("{}/files/{{resource_id}}", server.base_url()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn non_success_status_is_reported_with_url() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/files/f1");
        then.status(503).body("busy");
    });

    let err = fetcher_for(&server)
        .fetch(&WebhookNotification::new("upload", "file.added", "f1"))
        .await
        .unwrap_err();

    mock.assert();
    match err {
        EsgError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/files/f1"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_body_is_a_data_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/files/f2");
        then.status(200)
            .header("content-type", "application/json")
            .body("<html>not json</html>");
    });

    let err = fetcher_for(&server)
        .fetch(&WebhookNotification::new("upload", "file.added", "f2"))
        .await
        .unwrap_err();

    match err {
        EsgError::Data(msg) => assert!(msg.starts_with("upload payload json parse")),
        other => panic!("expected data error, got {other:?}"),
    }
}

#[tokio::test]
async fn unconfigured_source_is_unsupported() {
    let server = MockServer::start();
    let err = fetcher_for(&server)
        .fetch(&WebhookNotification::new("spreadsheet", "sheet.updated", "s"))
        .await
        .unwrap_err();
    assert!(matches!(err, EsgError::UnsupportedSource(ref s) if s == "spreadsheet"));
}

#[tokio::test]
async fn empty_resource_id_is_rejected() {
    let server = MockServer::start();
    let err = fetcher_for(&server)
        .fetch(&WebhookNotification::new("upload", "file.added", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EsgError::InvalidParams(_)));
}

#[test]
fn template_without_placeholder_fails_to_build() {
    let err = HttpFetcher::builder()
        .endpoint(SourceTag::Spreadsheet, "https://sheets.test/fixed")
        .build()
        .unwrap_err();
    assert!(matches!(err, EsgError::InvalidParams(ref m) if m.contains("{resource_id}")));
}

#[test]
fn token_without_endpoint_fails_to_build() {
    let err = HttpFetcher::builder()
        .bearer_token("quickbooks", "t")
        .build()
        .unwrap_err();
    assert!(matches!(err, EsgError::InvalidParams(ref m) if m.contains("accounting-platform")));
}

#[test]
fn unparseable_template_fails_to_build() {
    let err = HttpFetcher::builder()
        .endpoint("upload", "not a url/{resource_id}")
        .build()
        .unwrap_err();
    assert!(matches!(err, EsgError::Url(_)));
}
