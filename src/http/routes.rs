use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session pipeline
        .route(
            "/api/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route(
            "/api/sessions/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/sessions/:session_id/resummarize",
            post(handlers::resummarize_session),
        )
        // The pipeline enforces its own upload ceiling; axum's 2MB default
        // would reject valid recordings first.
        .layer(DefaultBodyLimit::disable())
        // Allow the dev UI origin to call the API
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
