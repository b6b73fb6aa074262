//! Shared fixtures: a fresh database per test, for either backend
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use catalog_server::db::{create_pool, create_pool_with_options, schema};
use catalog_server::{build_router, build_store, AppState, ProductStore, Settings, StoreKind};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

/// Run each listed `async fn name(kind: StoreKind)` once per backend.
///
/// With a leading `multi_thread:` the tests run on a multi-threaded runtime,
/// for cases that need real parallelism against the database.
macro_rules! backend_tests {
    (multi_thread: $($name:ident),* $(,)?) => {
        mod orm_parallel {
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $name() {
                    super::$name(catalog_server::StoreKind::Orm).await;
                }
            )*
        }

        mod template_parallel {
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $name() {
                    super::$name(catalog_server::StoreKind::Template).await;
                }
            )*
        }
    };
    ($($name:ident),* $(,)?) => {
        mod orm {
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(catalog_server::StoreKind::Orm).await;
                }
            )*
        }

        mod template {
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(catalog_server::StoreKind::Template).await;
                }
            )*
        }
    };
}

/// Route store logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store over a private in-memory database with the schema in place.
pub async fn memory_store(kind: StoreKind) -> Arc<dyn ProductStore> {
    init_tracing();
    let pool = create_pool("sqlite::memory:").await.expect("pool creation failed");
    schema::init(&pool).await.expect("schema init failed");
    build_store(kind, pool)
}

/// Store over a temporary database file with a multi-connection pool.
///
/// Keep the returned directory alive for as long as the store is used.
pub async fn file_store(kind: StoreKind) -> (TempDir, Arc<dyn ProductStore>) {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir creation failed");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
    let pool = create_pool_with_options(&url, 5)
        .await
        .expect("pool creation failed");
    schema::init(&pool).await.expect("schema init failed");
    (dir, build_store(kind, pool))
}

/// Full router over a fresh database.
pub async fn app(kind: StoreKind) -> Router {
    let settings = Settings {
        store_kind: kind,
        ..Settings::default()
    };
    build_router(AppState::new(memory_store(kind).await, settings))
}

/// Send a request with an optional JSON body and decode the JSON reply.
///
/// Empty or non-JSON replies decode to `Value::Null`.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body.map(|v| v.to_string());
    send_raw(app, method, uri, body.as_deref()).await
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(raw.to_owned())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).expect("request build failed"))
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
