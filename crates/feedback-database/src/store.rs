//! Storage seam used by the API layer

use async_trait::async_trait;
use feedback_core::{FeedbackRecord, Result};

use crate::{Database, queries};

/// Source of feedback records for aggregation
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// All feedback, scoped to `owner` when given, oldest first
    async fn feedbacks(&self, owner: Option<&str>) -> Result<Vec<FeedbackRecord>>;

    /// Persist a new feedback record
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord>;

    /// Check the backing store is reachable
    async fn health_check(&self) -> Result<()>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgFeedbackStore {
    database: Database,
}

impl PgFeedbackStore {
    /// Wrap a connected database
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn feedbacks(&self, owner: Option<&str>) -> Result<Vec<FeedbackRecord>> {
        queries::list_feedback(self.database.pool(), owner).await
    }

    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord> {
        queries::insert_feedback(self.database.pool(), &record).await?;
        Ok(record)
    }

    async fn health_check(&self) -> Result<()> {
        self.database.health_check().await
    }

    fn name(&self) -> &str {
        "postgres"
    }
}
