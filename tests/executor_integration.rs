mod common;

use std::time::Duration;

use axum::http::StatusCode;
use resilient_get::{ExecutorOptions, FetchError, FetchOutcome, RequestDescriptor, RequestExecutor};
use serde_json::json;

use common::{refused_url, spawn_server, MockResponse};

fn fast_options(max_attempts: usize) -> ExecutorOptions {
    ExecutorOptions {
        timeout_ms: 1_000,
        max_attempts,
        retry_delay_ms: 1,
    }
}

#[tokio::test]
async fn success_on_first_attempt() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({"id": 1}))]).await;
    let executor = RequestExecutor::new().with_options(fast_options(3));

    let outcome = executor.get(&server.url("/ok")).await;

    match outcome {
        FetchOutcome::Success { data, attempts } => {
            assert_eq!(data, json!({"id": 1}));
            assert_eq!(attempts, 1);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn server_error_on_every_call_exhausts_attempts() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})),
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})),
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})),
    ])
    .await;
    let executor = RequestExecutor::new().with_options(fast_options(3));

    let outcome = executor.get(&server.url("/flaky")).await;

    assert_eq!(outcome.attempts(), 3);
    match outcome.into_result() {
        Err(FetchError::Http { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected http error, got {other:?}"),
    }
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn retries_until_success() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::SERVICE_UNAVAILABLE, json!({})),
        MockResponse::json(StatusCode::BAD_GATEWAY, json!({})),
        MockResponse::json(StatusCode::OK, json!([{"id": 1}, {"id": 2}])),
    ])
    .await;
    let executor = RequestExecutor::new().with_options(fast_options(5));

    let outcome = executor.get(&server.url("/posts")).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(outcome.data(), Some(&json!([{"id": 1}, {"id": 2}])));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn not_found_keeps_status_code() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::NOT_FOUND, json!({})),
        MockResponse::json(StatusCode::NOT_FOUND, json!({})),
    ])
    .await;
    let executor = RequestExecutor::new().with_options(fast_options(2));

    let outcome = executor.get(&server.url("/posts/99999")).await;

    assert_eq!(outcome.error().and_then(FetchError::status), Some(404));
    assert_eq!(
        outcome.to_json(),
        json!({"success": false, "error": "HTTP Error: 404"})
    );
}

#[tokio::test]
async fn slow_response_is_classified_as_timeout() {
    let server = spawn_server(vec![MockResponse::json(StatusCode::OK, json!({"id": 1}))
        .with_delay(Duration::from_millis(300))])
    .await;
    let executor = RequestExecutor::new();
    let descriptor = RequestDescriptor::new(server.url("/slow"))
        .with_timeout(Duration::from_millis(30))
        .with_max_attempts(1);

    let outcome = executor.execute(&descriptor).await;

    let error = outcome.error().expect("request must time out");
    assert!(error.is_timeout(), "expected timeout, got {error:?}");
    assert!(!error.is_connection());
}

#[tokio::test]
async fn refused_connection_is_classified_as_connection_failure() {
    let executor = RequestExecutor::new();
    let descriptor = RequestDescriptor::new(refused_url().await)
        .with_max_attempts(2)
        .with_retry_delay(Duration::ZERO);

    let outcome = executor.execute(&descriptor).await;

    assert_eq!(outcome.attempts(), 2);
    assert!(matches!(outcome.error(), Some(FetchError::Connection(_))));
}

#[tokio::test]
async fn malformed_json_is_not_retried() {
    let server = spawn_server(vec![
        MockResponse::raw(StatusCode::OK, "<html>not json</html>"),
        MockResponse::json(StatusCode::OK, json!({"id": 1})),
    ])
    .await;
    let executor = RequestExecutor::new().with_options(fast_options(3));

    let outcome = executor.get(&server.url("/broken")).await;

    assert!(matches!(outcome.error(), Some(FetchError::Decode(_))));
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = spawn_server(vec![MockResponse::raw(StatusCode::OK, "")]).await;
    let executor = RequestExecutor::new().with_options(fast_options(3));

    let outcome = executor.get(&server.url("/empty")).await;

    assert_eq!(outcome.data(), Some(&serde_json::Value::Null));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn invalid_url_is_a_transport_failure() {
    let executor = RequestExecutor::new();
    let descriptor = RequestDescriptor::new("not a url")
        .with_max_attempts(2)
        .with_retry_delay(Duration::ZERO);

    let outcome = executor.execute(&descriptor).await;

    assert!(matches!(outcome.error(), Some(FetchError::Transport(_))));
    assert_eq!(outcome.attempts(), 2);
}
