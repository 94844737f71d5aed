//! In-memory feedback store for tests and local runs

use async_trait::async_trait;
use feedback_core::{FeedbackRecord, Result};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::store::FeedbackStore;

/// Feedback store kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedbackStore {
    records: Arc<RwLock<Vec<FeedbackRecord>>>,
}

impl InMemoryFeedbackStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = FeedbackRecord>) -> Self {
        let mut records: Vec<_> = records.into_iter().collect();
        records.sort_by_key(|r| r.created_at);
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn feedbacks(&self, owner: Option<&str>) -> Result<Vec<FeedbackRecord>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| owner.is_none_or(|o| r.owner_id == o))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord> {
        let mut records = self.records.write();
        // keep ascending created_at order
        let pos = records.partition_point(|r| r.created_at <= record.created_at);
        records.insert(pos, record.clone());
        Ok(record)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn record(owner: &str, rating: i16, minutes: i64) -> FeedbackRecord {
        FeedbackRecord {
            id: Uuid::new_v4(),
            owner_id: owner.to_string(),
            text: format!("rating {rating}"),
            rating,
            created_at: Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryFeedbackStore::new();
        assert!(store.is_empty());
        assert!(store.feedbacks(None).await.unwrap().is_empty());
        assert!(store.health_check().await.is_ok());
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_insert_keeps_chronological_order() {
        let store = InMemoryFeedbackStore::new();
        store.insert(record("a", 3, 20)).await.unwrap();
        store.insert(record("a", 1, 0)).await.unwrap();
        store.insert(record("a", 5, 10)).await.unwrap();

        let ratings: Vec<i16> = store
            .feedbacks(None)
            .await
            .unwrap()
            .iter()
            .map(|r| r.rating)
            .collect();
        assert_eq!(ratings, vec![1, 5, 3]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_owner_scope() {
        let store =
            InMemoryFeedbackStore::with_records([record("a", 4, 0), record("b", 2, 1), record("a", 5, 2)]);

        let scoped = store.feedbacks(Some("a")).await.unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|r| r.owner_id == "a"));

        assert!(store.feedbacks(Some("missing")).await.unwrap().is_empty());
        assert_eq!(store.feedbacks(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = InMemoryFeedbackStore::new();
        let handle = store.clone();
        handle.insert(record("a", 4, 0)).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
