//! Shared helpers for router-level integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use persistence_service::config::Config;
use persistence_service::storage::Persistence;
use persistence_service::{api, AppState};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tower::ServiceExt;

/// Build the full router over fresh in-memory stores.
pub fn build_test_app() -> Router {
    let config = Config {
        use_mock_db: true,
        ..Default::default()
    };
    build_app_with(config, Persistence::mock())
}

/// Build the full router over a PostgreSQL pool that is already closed, so
/// every repository call fails with a storage error.
pub async fn build_failing_app() -> Router {
    let pool = PgPoolOptions::new().connect_lazy_with(PgConnectOptions::new().host("localhost"));
    pool.close().await;
    build_app_with(Config::default(), Persistence::postgres(pool))
}

fn build_app_with(config: Config, persistence: Persistence) -> Router {
    api::create_router(Arc::new(AppState {
        config,
        persistence,
        database: None,
    }))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
