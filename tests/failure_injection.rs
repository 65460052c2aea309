//! Failure injection and edge-route tests for the forwarder.

use std::time::Duration;

use axum::http::{header::LOCATION, StatusCode};
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

mod common;

use common::{client, config_for, spawn_backend_with, spawn_echo_backend, spawn_proxy, unused_addr};

#[tokio::test]
async fn test_connection_refused_maps_to_502() {
    let dead = unused_addr().await;
    let (proxy, shutdown) = spawn_proxy(config_for(dead)).await;

    let res = client()
        .get(format!("http://{}/api/users/42", proxy))
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(res.headers()["content-type"].to_str().unwrap().starts_with("application/json"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Backend Connection Error");
    let details = body["details"].as_str().expect("details present");
    assert!(!details.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_hung_backend_maps_to_504() {
    let backend = spawn_backend_with(|_| {
        Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                "too late"
            }),
        )
    })
    .await;
    let mut config = config_for(backend);
    config.timeouts.upstream_secs = 1;
    let (proxy, shutdown) = spawn_proxy(config).await;

    let res = client()
        .get(format!("http://{}/api/slow", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Backend Timeout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_metadata_failure_maps_to_500() {
    let dead = unused_addr().await;
    let (proxy, shutdown) = spawn_proxy(config_for(dead)).await;

    let res = client()
        .get(format!("http://{}/openapi.json", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch OpenAPI spec");
    assert!(body["details"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_paths_return_json_404() {
    let backend = spawn_echo_backend().await;
    let (proxy, shutdown) = spawn_proxy(config_for(backend)).await;

    for path in ["/unknown", "/apix", "/other/api/x"] {
        let res = client()
            .get(format!("http://{}{}", proxy, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {}", path);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "Not Found"}));
    }

    let res = client()
        .post(format!("http://{}/", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client()
        .delete(format!("http://{}/openapi.json", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn test_root_redirects() {
    let backend = spawn_echo_backend().await;
    let mut config = config_for(backend);
    config.routes.root_redirect = "https://docs.example.com/start".to_string();
    let (proxy, shutdown) = spawn_proxy(config).await;

    let res = client()
        .get(format!("http://{}/", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://docs.example.com/start");

    shutdown.trigger();
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let dead = unused_addr().await;
    let (proxy, shutdown) = spawn_proxy(config_for(dead)).await;

    for path in ["/unknown", "/api/x"] {
        let res = client()
            .get(format!("http://{}{}", proxy, path))
            .header("origin", "https://app.example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(res.headers()["access-control-allow-origin"], "*", "path {}", path);
    }

    let res = client()
        .request(reqwest::Method::OPTIONS, format!("http://{}/api/x", proxy))
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_assigned_and_echoed() {
    let backend = spawn_echo_backend().await;
    let (proxy, shutdown) = spawn_proxy(config_for(backend)).await;

    let res = client()
        .get(format!("http://{}/api/x", proxy))
        .send()
        .await
        .unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    let echoed: Value = res.json().await.unwrap();
    assert_eq!(echoed["headers"]["x-request-id"][0], id.as_str());

    let res = client()
        .get(format!("http://{}/api/x", proxy))
        .header("x-request-id", "client-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-chosen");

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let backend = spawn_echo_backend().await;
    let mut config = config_for(backend);
    config.limits.max_body_bytes = 16;
    let (proxy, shutdown) = spawn_proxy(config).await;

    let res = client()
        .post(format!("http://{}/api/upload", proxy))
        .header("origin", "https://app.example.com")
        .body(vec![b'x'; 1024])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_chunked_body_rejected() {
    let backend = spawn_echo_backend().await;
    let mut config = config_for(backend);
    config.limits.max_body_bytes = 16;
    let (proxy, shutdown) = spawn_proxy(config).await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    let mut request = format!(
        "POST /api/upload HTTP/1.1\r\nHost: {}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n400\r\n",
        proxy
    )
    .into_bytes();
    request.extend_from_slice(&[b'x'; 1024]);
    request.extend_from_slice(b"\r\n0\r\n\r\n");
    stream.write_all(&request).await.unwrap();

    let mut raw = Vec::new();
    let read = async {
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => raw.extend_from_slice(&buf[..n]),
            }
            if String::from_utf8_lossy(&raw).contains("Payload Too Large") {
                break;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), read)
        .await
        .expect("Proxy did not answer");
    let raw = String::from_utf8_lossy(&raw);
    assert!(raw.starts_with("HTTP/1.1 413"), "unexpected response: {}", raw);
    assert!(raw.contains("Payload Too Large"));

    shutdown.trigger();
}
