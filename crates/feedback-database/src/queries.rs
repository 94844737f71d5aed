//! Database query operations for feedback analytics

use crate::models::FeedbackDb;
use feedback_core::{Error, FeedbackRecord, Result};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Feedback table operations
#[derive(Debug)]
pub struct FeedbackQueries;

impl FeedbackQueries {
    /// Insert a feedback record
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn insert(pool: &PgPool, record: &FeedbackRecord) -> Result<Uuid> {
        let query = r"
            INSERT INTO feedbacks (id, owner_id, text, rating, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        ";

        let row = sqlx::query(query)
            .bind(record.id)
            .bind(&record.owner_id)
            .bind(&record.text)
            .bind(record.rating)
            .bind(record.created_at)
            .fetch_one(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.get("id"))
    }

    /// All feedback for one owner, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<FeedbackDb>> {
        let query = r"
            SELECT * FROM feedbacks
            WHERE owner_id = $1
            ORDER BY created_at ASC
        ";

        sqlx::query_as::<_, FeedbackDb>(query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// All feedback, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<FeedbackDb>> {
        sqlx::query_as::<_, FeedbackDb>("SELECT * FROM feedbacks ORDER BY created_at ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}

/// Fetch feedback records, scoped to an owner when given
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_feedback(pool: &PgPool, owner_id: Option<&str>) -> Result<Vec<FeedbackRecord>> {
    let rows = match owner_id {
        Some(owner) => FeedbackQueries::find_by_owner(pool, owner).await?,
        None => FeedbackQueries::find_all(pool).await?,
    };

    tracing::debug!(rows = rows.len(), owner = ?owner_id, "Loaded feedback rows");
    Ok(rows.into_iter().map(FeedbackRecord::from).collect())
}

/// Insert a feedback record (wrapper)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn insert_feedback(pool: &PgPool, record: &FeedbackRecord) -> Result<Uuid> {
    FeedbackQueries::insert(pool, record).await
}
