use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use futures::future::join_all;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;
use webhook_relay::core::Destination;
use webhook_relay::{create_router, AppState, ForwarderConfig, HttpForwarder, Relay};

fn relay_app(destination_urls: &[String], timeout: Duration) -> Router {
    create_router(relay_state(destination_urls, timeout))
}

fn relay_state(destination_urls: &[String], timeout: Duration) -> AppState {
    let forwarder = HttpForwarder::new(ForwarderConfig {
        timeout,
        user_agent: "webhook-relay-test".to_string(),
    })
    .expect("failed to build forwarder");

    let destinations = destination_urls
        .iter()
        .map(|url| Destination::parse(url).expect("invalid destination"))
        .collect();

    AppState::new(Relay::new(Arc::new(forwarder), destinations))
}

fn webhook_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response should be JSON")
}

fn closed_port_url(path: &str) -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{}{}", port, path)
}

#[tokio::test]
async fn test_payload_is_forwarded_to_every_destination() -> anyhow::Result<()> {
    let server_a = MockServer::start_async().await;
    let server_b = MockServer::start_async().await;
    let payload = json!({"event": "msg", "id": 42});

    let mock_a = server_a
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .json_body(payload.clone());
            then.status(200);
        })
        .await;
    let mock_b = server_b
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .json_body(payload.clone());
            then.status(204);
        })
        .await;

    let app = relay_app(
        &[server_a.url("/hook"), server_b.url("/hook")],
        Duration::from_secs(5),
    );

    let response = app
        .oneshot(webhook_request(r#"{"event":"msg","id":42}"#))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"status": "received and forwarded"}));
    mock_a.assert_async().await;
    mock_b.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_inbound_content_type_is_not_required() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook").json_body(json!([1, "two", null]));
            then.status(200);
        })
        .await;

    let app = relay_app(&[server.url("/hook")], Duration::from_secs(5));
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .body(Body::from(r#"[1,"two",null]"#))
        .unwrap();

    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_rejected_without_outbound_calls() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let app = relay_app(&[server.url("/hook")], Duration::from_secs(5));
    let response = app.oneshot(webhook_request("not-json")).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "MALFORMED_PAYLOAD");
    mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_empty_body_is_rejected_without_outbound_calls() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let app = relay_app(&[server.url("/hook")], Duration::from_secs(5));
    let response = app.oneshot(webhook_request(Body::empty())).await?;

    assert!(response.status().is_client_error());
    mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_unreachable_destination_does_not_block_others() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook").json_body(json!({"id": 1}));
            then.status(200);
        })
        .await;

    let app = relay_app(
        &[closed_port_url("/hook"), server.url("/hook")],
        Duration::from_secs(5),
    );
    let response = app.oneshot(webhook_request(r#"{"id":1}"#)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_error_status_from_destination_is_swallowed() -> anyhow::Result<()> {
    let failing = MockServer::start_async().await;
    let healthy = MockServer::start_async().await;
    let failing_mock = failing
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(503);
        })
        .await;
    let healthy_mock = healthy
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let app = relay_app(
        &[failing.url("/hook"), healthy.url("/hook")],
        Duration::from_secs(5),
    );
    let response = app.oneshot(webhook_request(r#"{"id":2}"#)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    failing_mock.assert_async().await;
    healthy_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_slow_destination_is_bounded_by_timeout() -> anyhow::Result<()> {
    let slow = MockServer::start_async().await;
    let fast = MockServer::start_async().await;
    slow.mock_async(|when, then| {
        when.method(POST).path("/hook");
        then.status(200).delay(Duration::from_secs(5));
    })
    .await;
    let fast_mock = fast
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let app = relay_app(
        &[slow.url("/hook"), fast.url("/hook")],
        Duration::from_millis(500),
    );

    let started = Instant::now();
    let response = app.oneshot(webhook_request(r#"{"id":3}"#)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        started.elapsed() < Duration::from_secs(4),
        "handler waited for the slow destination: {:?}",
        started.elapsed()
    );
    fast_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_resending_same_payload_delivers_twice() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook").json_body(json!({"id": 9}));
            then.status(200);
        })
        .await;

    let app = relay_app(&[server.url("/hook")], Duration::from_secs(5));
    for _ in 0..2 {
        let response = app.clone().oneshot(webhook_request(r#"{"id":9}"#)).await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    mock.assert_hits_async(2).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_mix_payloads() -> anyhow::Result<()> {
    const REQUESTS: usize = 100;

    let server_a = MockServer::start_async().await;
    let server_b = MockServer::start_async().await;

    let mut mocks = Vec::with_capacity(REQUESTS * 2);
    for i in 0..REQUESTS {
        for server in [&server_a, &server_b] {
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/hook")
                        .json_body(json!({"request": i, "tag": format!("payload-{}", i)}));
                    then.status(200);
                })
                .await;
            mocks.push(mock);
        }
    }

    let app = relay_app(
        &[server_a.url("/hook"), server_b.url("/hook")],
        Duration::from_secs(10),
    );

    let responses = join_all((0..REQUESTS).map(|i| {
        let app = app.clone();
        let body = json!({"request": i, "tag": format!("payload-{}", i)}).to_string();
        async move { app.oneshot(webhook_request(body)).await }
    }))
    .await;

    for response in responses {
        assert_eq!(response?.status(), StatusCode::OK);
    }
    for mock in &mocks {
        mock.assert_hits_async(1).await;
    }
    Ok(())
}

fn blob_payload(len: usize) -> String {
    format!(r#"{{"blob":"{}"}}"#, "x".repeat(len))
}

#[tokio::test]
async fn test_body_above_axum_default_limit_is_forwarded() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let body = blob_payload(3 * 1024 * 1024);
    let app = relay_app(&[server.url("/hook")], Duration::from_secs(10));
    let response = app.oneshot(webhook_request(body)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({"status": "received and forwarded"}));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_body_above_configured_limit_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200);
        })
        .await;

    let state = relay_state(&[server.url("/hook")], Duration::from_secs(5))
        .with_max_body_bytes(4096);
    let app = create_router(state);

    let response = app.clone().oneshot(webhook_request(blob_payload(8192))).await?;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    mock.assert_hits_async(0).await;

    let response = app.oneshot(webhook_request(blob_payload(1024))).await?;
    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_hits_async(1).await;
    Ok(())
}
