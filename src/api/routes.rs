use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:session_id", delete(handlers::delete_session))
        .route("/sessions/:session_id/sign-in", post(handlers::sign_in))
        .route("/sessions/:session_id/sign-out", post(handlers::sign_out))
        // Books and votes
        .route("/sessions/:session_id/books/:name", get(handlers::get_book))
        .route("/sessions/:session_id/votes", post(handlers::cast_vote))
        // Recommendations and preferences
        .route(
            "/sessions/:session_id/recommendations",
            get(handlers::get_recommendations),
        )
        .route("/sessions/:session_id/preferences", get(handlers::get_preferences))
}
