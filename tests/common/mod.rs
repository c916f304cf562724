//! Shared helpers for driving the assembled router against a temp root.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use itinerary_devserver::config::{Config, COUNTRIES_DIR};
use itinerary_devserver::server;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn app(root: &Path) -> Router {
    server::app(Config::new(root))
}

pub async fn send(root: &Path, method: Method, uri: &str, body: impl Into<Body>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app(root).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse { status, headers, body }
}

pub async fn post_json(root: &Path, uri: &str, body: Value) -> TestResponse {
    send(root, Method::POST, uri, body.to_string()).await
}

/// Create `countries/{folder}` under a fresh temp root.
pub fn root_with_country(folder: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(COUNTRIES_DIR).join(folder);
    fs::create_dir_all(&dir).unwrap();
    (tmp, dir)
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Backup files sitting next to `path`.
pub fn backups_of(path: &Path) -> Vec<PathBuf> {
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    let prefix = format!("{name}.backup_");
    let mut found: Vec<PathBuf> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().starts_with(&prefix))
        .collect();
    found.sort();
    found
}
