//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Conflict checking and scheduling, per course
        .route(
            "/courses/{course_id}/conflict-check",
            get(handlers::check_conflicts),
        )
        .route(
            "/courses/{course_id}/auto-schedule",
            post(handlers::propose_schedule),
        )
        .route(
            "/courses/{course_id}/auto-schedule/confirm",
            put(handlers::confirm_schedule),
        )
        .route(
            "/courses/{course_id}/lectures",
            get(handlers::list_lectures),
        )
        // Lecture CRUD
        .route("/lectures", post(handlers::create_lecture))
        .route("/lectures/{lecture_id}", get(handlers::get_lecture))
        .route("/lectures/{lecture_id}", put(handlers::update_lecture))
        .route("/lectures/{lecture_id}", delete(handlers::cancel_lecture));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
