//! Feedback ingestion

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use feedback_core::{FeedbackRecord, NewFeedback};
use std::sync::Arc;
use tracing::{info, warn};

/// Store a new feedback record
///
/// Responds `201 Created` with the stored record. The text must be non-blank
/// and at most 5000 characters; the rating must lie in the configured range.
pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewFeedback>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FeedbackRecord>)> {
    let Json(new_feedback) = body.map_err(ApiError::from)?;

    if let Err(e) = new_feedback.check(&state.config.analytics) {
        warn!(owner = %new_feedback.owner_id, error = %e, "Rejected feedback");
        return Err(e.into());
    }

    let record = state.store.insert(new_feedback.into_record()).await?;

    info!(
        id = %record.id,
        owner = %record.owner_id,
        rating = record.rating,
        "Stored feedback"
    );
    Ok((StatusCode::CREATED, Json(record)))
}
