//! End-to-end tests for the results daemon
//!
//! Requests go through the full axum application backed by an in-memory
//! result store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::CONTENT_TYPE,
        Method,
        Request,
        StatusCode,
    },
    Router,
};
use clap::Parser;
use tower::ServiceExt;
use wasi_results_core::{
    MemoryStore,
    Report,
    ResultsError,
    Runtime,
    Status,
    TestResult,
};
use wasi_resultsd::{
    app,
    AppState,
    Args,
};

struct TestResponse {
    status:       StatusCode,
    content_type: String,
    body:         String,
}

async fn request(app: Router, method: Method, uri: &str) -> TestResponse {
    let response = app
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

async fn get(app: Router, uri: &str) -> TestResponse {
    request(app, Method::GET, uri).await
}

fn report(name: &str, version: &str, total: usize, passed: usize) -> Report {
    let results = (0..total)
        .map(|i| {
            if i < passed {
                TestResult::new(format!("tests/rust/{:02}.wasm", i), Status::Pass, "")
            } else {
                TestResult::new(
                    format!("tests/rust/{:02}.wasm", i),
                    Status::Fail,
                    "assertion `left == right` failed",
                )
            }
        })
        .collect();
    Report {
        runtime: Runtime {
            name:    name.to_string(),
            version: version.to_string(),
        },
        results,
    }
}

fn scenario_store() -> MemoryStore {
    MemoryStore::new()
        .with_branch("main", "abc123")
        .with_commit_links("https://github.com/WebAssembly/wasi-testsuite/commit")
        .with_report("abc123/wasmtime/0.9.json", &report("wasmtime", "0.9", 10, 5))
        .with_report("abc123/wasmtime/1.0.json", &report("wasmtime", "1.0", 10, 9))
        .with_report("abc123/wasmer/4.2.json", &report("wasmer", "4.2", 10, 7))
        .with_report(
            "abc123/detail/1.0.json",
            &Report {
                runtime: Runtime {
                    name:    "wasmtime".to_string(),
                    version: "1.0".to_string(),
                },
                results: vec![
                    TestResult::new("a", Status::Pass, ""),
                    TestResult::new("b", Status::Fail, "<boom>"),
                ],
            },
        )
}

fn test_app(store: MemoryStore) -> Router {
    app(AppState::new(Arc::new(store), "main"))
}

#[tokio::test]
async fn test_index_lists_latest_report_per_runtime() {
    let response = get(test_app(scenario_store()), "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/html"));

    let body = &response.body;
    // Listing is sorted by path: detail, wasmer, wasmtime
    let wasmer = body.find("href=\"/abc123/wasmer/4.2\"").unwrap();
    let wasmtime = body.find("href=\"/abc123/wasmtime/1.0\"").unwrap();
    assert!(wasmer < wasmtime);
    assert!(!body.contains("/abc123/wasmtime/0.9"));

    assert!(body.contains("<progress value=\"7\" max=\"10\">"));
    assert!(body.contains("<progress value=\"9\" max=\"10\">"));
    assert!(body.find("value=\"7\"").unwrap() < body.find("value=\"9\"").unwrap());
}

#[tokio::test]
async fn test_index_ignores_query_string() {
    let response = get(test_app(scenario_store()), "/?ref=main&token=secret").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("href=\"/abc123/wasmer/4.2\""));
}

#[tokio::test]
async fn test_index_for_commit_without_results_is_empty() {
    let store = MemoryStore::new().with_branch("main", "fff000");
    let response = get(test_app(store), "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No results have been published yet."));
}

#[tokio::test]
async fn test_detail_page() {
    let response = get(test_app(scenario_store()), "/abc123/detail/1.0").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/html"));

    let body = &response.body;
    assert_eq!(body.matches("<tr><td class=\"path\">").count(), 2);
    assert!(body.contains("&lt;boom&gt;"));
    assert!(!body.contains("<boom>"));
    assert!(body.contains("1/2 passed"));
    assert!(body.contains("wasmtime <small>1.0</small>"));
    assert!(body.contains("https://github.com/WebAssembly/wasi-testsuite/commit/abc123"));
}

#[tokio::test]
async fn test_unknown_key_is_404() {
    let response = get(test_app(scenario_store()), "/abc123/unknown/1.0").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.content_type.starts_with("text/html"));
    assert!(response.body.contains("404 Not Found"));
    assert!(!response.body.contains("abc123/unknown"));
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    for uri in ["/../etc/passwd", "/abc123/../wasmtime", "/abc123/%2e%2e/x", "/raw/../x.json"] {
        let response = get(test_app(scenario_store()), uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_raw_route_forwards_blob() {
    let store = scenario_store().with_blob("abc123/odd/1.0.json", "{\"custom\":true}");
    let response = get(test_app(store), "/raw/abc123/odd/1.0.json").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(response.body, "{\"custom\":true}");

    let response = get(test_app(scenario_store()), "/raw/abc123/none/1.0.json").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["message"], "Not Found");
}

#[tokio::test]
async fn test_store_failures_are_502_without_detail() {
    let response = get(test_app(scenario_store().unavailable()), "/").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("502 Bad Gateway"));
    assert!(!response.body.contains("store unreachable"));

    let store = scenario_store().with_blob("abc123/zzz/1.0.json", "{\"runtime\": 3}");
    let response = get(test_app(store.clone()), "/abc123/zzz/1.0").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(!response.body.contains("invalid type"));

    // One malformed report fails the whole index
    let response = get(test_app(store), "/").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_unknown_suite_branch_is_502() {
    let app = app(AppState::new(Arc::new(scenario_store()), "missing-branch"));
    let response = get(app, "/").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.body.contains("502 Bad Gateway"));
}

#[tokio::test]
async fn test_unusable_listed_file_is_skipped() {
    let store = MemoryStore::new()
        .with_branch("main", "abc123")
        .with_report("abc123/wasmer/4.2 beta.json", &report("wasmer", "4.2 beta", 10, 7))
        .with_report("abc123/wasmtime/1.0.json", &report("wasmtime", "1.0", 10, 9));
    let response = get(test_app(store), "/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("href=\"/abc123/wasmtime/1.0\""));
    assert!(!response.body.contains("wasmer"));
}

#[tokio::test]
async fn test_only_get_and_head_are_served() {
    let response = request(test_app(scenario_store()), Method::POST, "/").await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);

    let response = request(test_app(scenario_store()), Method::HEAD, "/healthz").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let response = get(test_app(MemoryStore::new().unavailable()), "/healthz").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[test]
fn test_missing_credential_prevents_startup() {
    let mut args = Args::try_parse_from(["wasi-resultsd"]).unwrap();
    args.token = None;
    match args.store_config() {
        Err(ResultsError::Config(message)) => assert!(message.contains("credential")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}
