//! API route definitions

use crate::{error::ApiError, handlers, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Aggregate and ingestion routes
pub fn feedback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feedbacks", post(handlers::feedback::create_feedback))
        .route("/feedbacks/average", get(handlers::analytics::get_average))
        .route("/feedbacks/keywords", get(handlers::analytics::get_keywords))
        .route("/feedbacks/ratings", get(handlers::analytics::get_ratings))
}

/// Build health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(feedback_routes())
        .merge(health_routes())
        // Fallback handler for unknown routes
        .fallback(not_found_handler)
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> ApiError {
    ApiError::not_found("The requested endpoint does not exist")
}
