//! Health check endpoints for monitoring and diagnostics

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Store connectivity status
    pub store: StoreHealth,
    /// Process uptime in seconds
    pub uptime_seconds: u64,
}

/// Store health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreHealth {
    /// Store implementation name
    pub backend: String,
    /// Whether the store answered
    pub connected: bool,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Readiness check response (simpler than health)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service readiness status
    pub ready: bool,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Basic health check endpoint for monitoring systems
///
/// Returns HTTP 200 with health details when the store answers, or HTTP 503
/// with the same body shape and `status: "unhealthy"` when it does not.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2024-03-15T14:25:30Z",
///   "store": { "backend": "postgres", "connected": true, "response_time_ms": 3 },
///   "uptime_seconds": 3600
/// }
/// ```
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let start_time = std::time::Instant::now();
    let connected = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            error!(store = state.store.name(), "Store health check failed: {}", e);
            false
        }
    };
    let response_time_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (status, label) = if connected {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let health_response = HealthResponse {
        status: label.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        store: StoreHealth {
            backend: state.store.name().to_string(),
            connected,
            response_time_ms,
        },
        uptime_seconds: state.uptime_seconds(),
    };

    info!("Health check completed in {}ms", response_time_ms);
    (status, Json(health_response))
}

/// Readiness check endpoint for Kubernetes-style health checks
///
/// Returns 200 OK if the service is ready to accept traffic
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.store.health_check().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            ready: true,
            timestamp: chrono::Utc::now(),
        })),
        Err(e) => {
            error!("Readiness check failed - store not accessible: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
