//! Feedback analytics API server library

#![forbid(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{Router, http::HeaderValue};
use feedback_core::config::ApiConfig;
use feedback_core::{Config, context_error, context_error::Result};
use feedback_database::FeedbackStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
};

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a CORS origin is not
/// a valid header value.
pub fn build_router(config: Config, store: Arc<dyn FeedbackStore>) -> Result<Router> {
    let state = Arc::new(AppState::new(config, store));

    // Validate the application state
    state.validate()?;

    let api = &state.config.api;
    let mut app = routes::build_router()
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(api.request_timeout)));

    if api.enable_cors {
        app = app.layer(cors_layer(api)?);
    }

    Ok(app.with_state(state))
}

/// CORS policy from the configured origin list; `*` allows any origin
fn cors_layer(api: &ApiConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if api.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = api
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| context_error!("Invalid CORS origin '{}': {}", origin, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
