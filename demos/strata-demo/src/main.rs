//! Strata walkthrough
//!
//! Boots a local echo server, points a client at it, and walks the request
//! surface: query folding, content-type-driven bodies, label fragments, and
//! timeout classification.
//!
//! Usage:
//!   cargo run --package strata-demo

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata_core::RequestConfig;
use strata_http::{ClientConfig, StrataClient};

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "contentType": headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or(""),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(tokio::time::Duration::from_secs(10)).await;
    Json(json!({"ok": true}))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strata_demo=info,strata_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Local echo server on an ephemeral port
    let app = Router::new().route("/api/slow", get(slow)).fallback(echo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tracing::info!("echo server listening on http://{}", addr);

    let client = StrataClient::new(ClientConfig {
        host: format!("http://{}", addr),
        api_path: "/api".to_string(),
        default_config: RequestConfig::new().header("Authorization", "Bearer demo"),
        request_interceptor: Some(Arc::new(|config| {
            strata_http::logging::request(&config);
            config
        })),
        ..ClientConfig::default()
    });

    // GET folds data into the query string
    let res = client
        .get("/users", Some(json!({"page": 2, "q": "ada"}).into()), vec![])
        .await;
    println!("GET /users:\n{}\n", serde_json::to_string_pretty(&res).unwrap());

    // A JSON content type switches the body to serialized JSON
    let res = client
        .post(
            "/users",
            Some(json!({"name": "ada"}).into()),
            vec![RequestConfig::new()
                .header("Content-Type", "application/json")
                .into()],
        )
        .await;
    println!("POST /users:\n{}\n", serde_json::to_string_pretty(&res).unwrap());

    // No content type: the payload goes out as a multipart form
    let res = client
        .post("/files", Some(json!({"kind": "report"}).into()), vec![])
        .await;
    println!("POST /files:\n{}\n", serde_json::to_string_pretty(&res).unwrap());

    // A label fragment plus a short timeout against a slow route
    let res = client
        .get(
            "/slow",
            None,
            vec!["slow-call".into(), RequestConfig::new().timeout(100).into()],
        )
        .await;
    println!("GET /slow:\n{}", serde_json::to_string_pretty(&res).unwrap());
}
