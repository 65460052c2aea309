//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, Uri},
    Json, Router,
};
use edge_forwarder::{ForwarderConfig, HttpServer, Shutdown};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Echo the received request back as JSON: method, uri, headers, body.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let mut header_map = Map::new();
    for name in headers.keys() {
        let values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(v.to_str().unwrap_or_default().to_string()))
            .collect();
        header_map.insert(name.as_str().to_string(), Value::Array(values));
    }

    Json(json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "headers": header_map,
        "body": String::from_utf8_lossy(&body),
    }))
}

/// A backend that echoes every request.
pub fn echo_router() -> Router {
    Router::new().fallback(echo)
}

/// Start a backend built from its own bound address.
pub async fn spawn_backend_with<F>(build: F) -> SocketAddr
where
    F: FnOnce(SocketAddr) -> Router,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build(addr);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub async fn spawn_echo_backend() -> SocketAddr {
    spawn_backend_with(|_| echo_router()).await
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Default configuration pointed at `backend`.
pub fn config_for(backend: SocketAddr) -> ForwarderConfig {
    let mut config = ForwarderConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{}", backend);
    config
}

/// Start the forwarder; the returned `Shutdown` stops it.
pub async fn spawn_proxy(config: ForwarderConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never follows redirects and never uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Header values the echo backend saw for `name`.
pub fn seen_header<'a>(echoed: &'a Value, name: &str) -> Option<&'a str> {
    echoed["headers"][name][0].as_str()
}
