//! Aggregate endpoints consumed by the dashboard

use crate::{
    error::{ApiError, ApiResult},
    extractors::OwnerScope,
    state::AppState,
};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use feedback_core::{AverageStats, FeedbackRecord, PopularWords, RatingsSummary, TimeGranularity};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Query parameters for the keyword endpoint
#[derive(Debug, Default, Deserialize, Validate)]
pub struct KeywordsQuery {
    /// Maximum number of keywords to return
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// Query parameters for the ratings endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RatingsQuery {
    /// Time series bucket: `entry`, `day` or `month`
    pub interval: Option<String>,
}

impl RatingsQuery {
    /// Parsed granularity, `entry` when absent
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown interval.
    pub fn granularity(&self) -> feedback_core::Result<TimeGranularity> {
        self.interval
            .as_deref()
            .map_or(Ok(TimeGranularity::default()), str::parse)
    }
}

async fn load_records(state: &AppState, owner: &OwnerScope) -> ApiResult<Vec<FeedbackRecord>> {
    let records = state.store.feedbacks(owner.as_deref()).await?;
    debug!(
        store = state.store.name(),
        owner = ?owner.as_deref(),
        records = records.len(),
        "Loaded feedback for aggregation"
    );
    Ok(records)
}

/// Average rating, feedback count and average word count
pub async fn get_average(
    State(state): State<Arc<AppState>>,
    owner: OwnerScope,
) -> ApiResult<Json<AverageStats>> {
    let records = load_records(&state, &owner).await?;
    let stats = state.aggregator.average_stats(&records);

    info!(
        owner = ?owner.as_deref(),
        feedbacks = stats.number_feedbacks,
        "Computed average stats"
    );
    Ok(Json(stats))
}

/// Most frequent words across feedback text
pub async fn get_keywords(
    State(state): State<Arc<AppState>>,
    owner: OwnerScope,
    query: Result<Query<KeywordsQuery>, QueryRejection>,
) -> ApiResult<Json<PopularWords>> {
    let Query(query) = query.map_err(ApiError::from)?;
    query.validate()?;

    let records = load_records(&state, &owner).await?;
    let words = state.aggregator.popular_words(&records, query.limit);

    info!(
        owner = ?owner.as_deref(),
        keywords = words.popular_words.len(),
        "Computed popular words"
    );
    Ok(Json(words))
}

/// Running average time series and rating histogram
pub async fn get_ratings(
    State(state): State<Arc<AppState>>,
    owner: OwnerScope,
    query: Result<Query<RatingsQuery>, QueryRejection>,
) -> ApiResult<Json<RatingsSummary>> {
    let Query(query) = query.map_err(ApiError::from)?;
    let granularity = query.granularity()?;

    let records = load_records(&state, &owner).await?;
    let summary = state.aggregator.ratings_summary(&records, granularity);

    info!(
        owner = ?owner.as_deref(),
        %granularity,
        points = summary.time_data.len(),
        "Computed ratings summary"
    );
    Ok(Json(summary))
}
