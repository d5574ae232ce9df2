//! REST API layer built on Axum.
//!
//! Provides the gateway's HTTP handlers plus middleware for CORS, request
//! tracing, and request ID tracking. Unmatched paths fall through to the
//! static frontend directory.

/// API error types mapped to HTTP status codes.
pub mod errors;
/// HTTP request handlers and application state.
pub mod handlers;
/// Request and response data transfer objects.
pub mod models;

use axum::routing::{get, post};
use axum::{middleware, Router};
use handlers::AppState;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %request_id);
    async move {
        let mut response = next.run(req).await;
        if let Ok(value) = axum::http::HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(axum::http::HeaderName::from_static("x-request-id"), value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Builds the Axum router with all routes and middleware layers.
///
/// API routes are matched first; everything else is served from
/// `static_dir` as a static site (index.html on directory requests).
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/schema", get(handlers::get_schema))
        .route("/collection/:name", get(handlers::collection_info))
        .route("/class/:name", post(handlers::search_semantic))
        .route("/class/:name/bm25", post(handlers::search_bm25))
        .route("/class/:name/hybrid", post(handlers::search_hybrid))
        .route("/class/:name/generate", post(handlers::generative_search))
        .route(
            "/class/:name/aggregate",
            post(handlers::aggregate_collection),
        )
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
