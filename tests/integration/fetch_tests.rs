use crate::common::{capture_logs, fast_limits};
use std::time::{Duration, Instant};
use tululu_fetch::catalog::{build_http_client, fetch, FetchError, TransientError};
use tululu_fetch::config::FetchLimits;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url_for(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to build URL")
}

#[tokio::test]
async fn test_always_failing_makes_exactly_max_attempts() {
    for max_attempts in [1u32, 2, 4] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/b1/"))
            .respond_with(ResponseTemplate::new(500))
            .expect(max_attempts as u64)
            .mount(&mock_server)
            .await;

        let client = build_http_client().expect("Failed to build client");
        let result = fetch(&client, &url_for(&mock_server, "/b1/"), &fast_limits(max_attempts)).await;

        match result {
            Err(FetchError::ExhaustedRetries {
                attempts,
                last_error,
                ..
            }) => {
                assert_eq!(attempts, max_attempts);
                assert_eq!(last_error, TransientError::Status(500));
            }
            other => panic!("Expected ExhaustedRetries, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_each_failed_attempt_logs_one_warning() {
    let (logs, _guard) = capture_logs();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = url_for(&mock_server, "/b1/");
    let client = build_http_client().expect("Failed to build client");
    let result = fetch(&client, &url, &fast_limits(3)).await;
    assert!(matches!(result, Err(FetchError::ExhaustedRetries { .. })));

    let attempts = logs.matching("Attempt ");
    assert_eq!(attempts.len(), 3, "Unexpected log lines: {:?}", logs.lines());
    for (index, line) in attempts.iter().enumerate() {
        assert!(line.contains("WARN"), "Not a warning: {}", line);
        let expected = format!(
            "Attempt {} of 3 to retrieve data from {} failed: HTTP status 500",
            index + 1,
            url
        );
        assert!(line.ends_with(&expected), "{:?} does not end with {:?}", line, expected);
    }
}

#[tokio::test]
async fn test_client_error_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/b2/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let result = fetch(&client, &url_for(&mock_server, "/b2/"), &fast_limits(3)).await;

    assert!(matches!(
        result,
        Err(FetchError::ExhaustedRetries {
            attempts: 3,
            last_error: TransientError::Status(404),
            ..
        })
    ));
}

#[tokio::test]
async fn test_redirect_is_not_found_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/b6/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landing</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let url = url_for(&mock_server, "/b6/");
    let result = fetch(&client, &url, &fast_limits(5)).await;

    match result {
        Err(FetchError::NotFound { url: reported }) => assert_eq!(reported, url),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_success_returns_body_unmodified() {
    let mock_server = MockServer::start().await;
    let body: Vec<u8> = vec![0xd0, 0x94, 0xd1, 0x8e, 0x00, 0xff, b'\n', b'x'];

    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let page = fetch(&client, &url_for(&mock_server, "/txt.php?id=1"), &fast_limits(3))
        .await
        .expect("Fetch failed");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, body);
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/b3/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("third time lucky"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let page = fetch(&client, &url_for(&mock_server, "/b3/"), &fast_limits(5))
        .await
        .expect("Fetch should succeed on the third attempt");

    assert_eq!(page.text(), "third time lucky");
}

#[tokio::test]
async fn test_timeout_is_transient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let limits = FetchLimits::new(Duration::from_millis(50), Duration::from_millis(100), 2);
    let client = build_http_client().expect("Failed to build client");
    let result = fetch(&client, &url_for(&mock_server, "/slow/"), &limits).await;

    assert!(matches!(
        result,
        Err(FetchError::ExhaustedRetries {
            attempts: 2,
            last_error: TransientError::Timeout,
            ..
        })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Nothing listens on port 1 on a test machine
    let closed_uri = "http://127.0.0.1:1";

    let client = build_http_client().expect("Failed to build client");
    let url = Url::parse(&format!("{}/b1/", closed_uri)).unwrap();
    let result = fetch(&client, &url, &fast_limits(2)).await;

    assert!(matches!(
        result,
        Err(FetchError::ExhaustedRetries { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_backoff_sleeps_between_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    // Sleeps 100ms after attempt 1 and min(200ms, 150ms) after attempt 2
    let limits = FetchLimits::new(Duration::from_millis(100), Duration::from_millis(150), 3);
    let client = build_http_client().expect("Failed to build client");

    let start = Instant::now();
    let result = fetch(&client, &url_for(&mock_server, "/b4/"), &limits).await;

    assert!(result.is_err());
    assert!(
        start.elapsed() >= Duration::from_millis(250),
        "Expected at least 250ms of backoff, got {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_redirect_loop_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/a/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let result = fetch(&client, &url_for(&mock_server, "/a/"), &fast_limits(5)).await;

    assert!(matches!(result, Err(FetchError::Redirect { .. })));
}

#[tokio::test]
async fn test_redirect_to_error_page_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/b9/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/gone/"))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = build_http_client().expect("Failed to build client");
    let result = fetch(&client, &url_for(&mock_server, "/b9/"), &fast_limits(2)).await;

    assert!(matches!(
        result,
        Err(FetchError::ExhaustedRetries {
            last_error: TransientError::Status(502),
            ..
        })
    ));
}
