//! HttpRefsFetcher against a real socket.

use vanity_gateway::config::UpstreamConfig;
use vanity_gateway::resolve::{FetchError, HttpRefsFetcher, RefsFetcher};

mod common;

fn plain_http() -> UpstreamConfig {
    UpstreamConfig {
        scheme: "http".into(),
        timeout_secs: Some(5),
        use_system_proxy: false,
        ..UpstreamConfig::default()
    }
}

#[tokio::test]
async fn test_fetch_returns_body_verbatim() {
    let body = common::sample_advertisement();
    let (addr, log) = common::start_mock_upstream(200, body.clone()).await;

    let fetcher = HttpRefsFetcher::new(&plain_http()).unwrap();
    let fetched = fetcher
        .fetch_refs(&format!("{addr}/rsenk330/gogetver"))
        .await
        .unwrap();

    assert_eq!(fetched, body);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["GET /rsenk330/gogetver.git/info/refs?service=git-upload-pack HTTP/1.1"]
    );
}

#[tokio::test]
async fn test_missing_repository() {
    let (addr, _) = common::start_mock_upstream(404, b"Repository not found".to_vec()).await;

    let fetcher = HttpRefsFetcher::new(&plain_http()).unwrap();
    let err = fetcher
        .fetch_refs(&format!("{addr}/u/missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status(404)));
}

#[tokio::test]
async fn test_not_modified_is_success() {
    let (addr, log) = common::start_mock_upstream(304, Vec::new()).await;

    let fetcher = HttpRefsFetcher::new(&plain_http()).unwrap();
    let fetched = fetcher.fetch_refs(&format!("{addr}/u/r")).await.unwrap();

    assert!(fetched.is_empty());
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (addr, log) = common::start_mock_upstream(500, Vec::new()).await;

    let fetcher = HttpRefsFetcher::new(&plain_http()).unwrap();
    let err = fetcher.fetch_refs(&format!("{addr}/u/r")).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(500)));
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let fetcher = HttpRefsFetcher::new(&plain_http()).unwrap();
    let err = fetcher.fetch_refs(&format!("{addr}/u/r")).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}
