//! Database models for feedback analytics

use chrono::{DateTime, Utc};
use feedback_core::FeedbackRecord;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `feedbacks` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackDb {
    /// Unique identifier
    pub id: Uuid,

    /// Owner the feedback was submitted to
    pub owner_id: String,

    /// Feedback text
    pub text: String,

    /// Rating as stored
    pub rating: i16,

    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackDb> for FeedbackRecord {
    fn from(row: FeedbackDb) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            text: row.text,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}
