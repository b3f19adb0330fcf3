use std::any::Any;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::response::ErrorBody;
use crate::storage::models::{Photo, Video};
use crate::storage::Entity;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new().route("/health", get(handlers::health));
    let router = resource_routes::<Photo>(router);
    let router = resource_routes::<Video>(router);

    router
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CRUD routes for one entity type under `/{collection}`.
fn resource_routes<E: Entity>(router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    let collection = format!("/{}", E::COLLECTION);
    let member = format!("/{}/:id", E::COLLECTION);

    router
        .route(
            &collection,
            get(handlers::list::<E>).post(handlers::create::<E>),
        )
        .route(
            &member,
            get(handlers::get_one::<E>)
                .put(handlers::update::<E>)
                .delete(handlers::remove::<E>),
        )
}

/// Converts a panicking handler into a generic 500.
pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::testutil::test_state;

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(catch_panic_layer());

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn router_serves_health() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
