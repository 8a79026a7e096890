use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod artists;
pub mod favorites;
pub mod paintings;
pub mod recommendations;
pub mod state;
pub mod tags;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/paintings", get(paintings::list))
        .route("/paintings/:id", get(paintings::detail))
        .route("/paintings/:id/similar", get(paintings::similar))
        .route(
            "/paintings/:id/favorite",
            post(favorites::mark).delete(favorites::unmark),
        )
        .route("/favorites", get(favorites::list))
        .route("/recommendations", get(recommendations::recommend))
        .route("/artists", get(artists::list))
        .route("/artists/:id", get(artists::detail))
        .route("/tags", get(tags::list))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::store::MemoryCatalogStore;

    fn router() -> Router {
        let state = AppState::new(Arc::new(MemoryCatalogStore::new()));
        create_router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_propagated() {
        let request_id = "6f1c7c4e-2a8b-4d0e-9a59-3c1f5b0e7d21";
        let response = router()
            .oneshot(
                Request::get("/api/v1/paintings")
                    .header("x-request-id", request_id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], request_id);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(Request::get("/api/v1/sitemap.xml").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
