//! Core types shared by the service, the store and the dashboard client

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::AnalyticsConfig;

/// Identifier of the company/account that receives feedback
pub type OwnerId = String;

/// A stored unit of user-submitted feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Owner the feedback was submitted to
    pub owner_id: OwnerId,

    /// Free-form feedback text
    pub text: String,

    /// Numeric rating
    pub rating: i16,

    /// When the feedback was submitted
    pub created_at: DateTime<Utc>,
}

/// Request body for submitting feedback
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    /// Owner the feedback is submitted to
    #[validate(length(min = 1, max = 128))]
    pub owner_id: OwnerId,

    /// Feedback text
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub text: String,

    /// Numeric rating, checked against the configured range
    pub rating: i16,

    /// Submission time; defaults to now when omitted
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl NewFeedback {
    /// Validate field constraints and the rating range
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn check(&self, analytics: &AnalyticsConfig) -> crate::Result<()> {
        self.validate()?;

        if !analytics.accepts_rating(self.rating) {
            return Err(crate::Error::validation(
                "rating",
                format!(
                    "must be between {} and {}",
                    analytics.rating_min, analytics.rating_max
                ),
            ));
        }

        Ok(())
    }

    /// Turn the submission into a record with a fresh identifier
    #[must_use]
    pub fn into_record(self) -> FeedbackRecord {
        FeedbackRecord {
            id: Uuid::new_v4(),
            owner_id: self.owner_id,
            text: self.text,
            rating: self.rating,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Descriptive statistics over a set of feedback
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageStats {
    /// Mean rating, two decimals
    pub average_rating: f64,

    /// Number of feedback records
    pub number_feedbacks: u64,

    /// Mean words per feedback, two decimals
    pub average_word_number: f64,
}

/// Most frequent words across all feedback text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularWords {
    /// Word to occurrence count, most frequent first
    pub popular_words: IndexMap<String, u64>,
}

/// Rating trend and distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsSummary {
    /// Timestamp label to running mean rating, oldest first
    pub time_data: IndexMap<String, f64>,

    /// Rating label to number of records with that rating
    pub histogram: IndexMap<String, u64>,
}

/// Bucket width for the rating time series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    /// One point per feedback record
    #[default]
    Entry,
    /// One point per calendar day (UTC)
    Day,
    /// One point per calendar month (UTC)
    Month,
}

impl TimeGranularity {
    /// Label of the bucket that `timestamp` falls into
    #[must_use]
    pub fn bucket_label(self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Entry => timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Day => timestamp.format("%Y-%m-%d").to_string(),
            Self::Month => timestamp.format("%Y-%m").to_string(),
        }
    }
}

impl std::fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for TimeGranularity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "entry" => Ok(Self::Entry),
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            other => Err(crate::Error::validation(
                "interval",
                format!("unknown granularity '{other}', expected entry, day or month"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn submission(text: &str, rating: i16) -> NewFeedback {
        NewFeedback {
            owner_id: "acme".to_string(),
            text: text.to_string(),
            rating,
            created_at: None,
        }
    }

    #[test]
    fn test_average_stats_wire_names() {
        let stats = AverageStats {
            average_rating: 3.5,
            number_feedbacks: 4,
            average_word_number: 12.25,
        };

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            value,
            json!({"averageRating": 3.5, "numberFeedbacks": 4, "averageWordNumber": 12.25})
        );
    }

    #[test]
    fn test_ratings_summary_preserves_key_order() {
        let mut summary = RatingsSummary::default();
        summary.time_data.insert("2023-02-17".to_string(), 3.2);
        summary.time_data.insert("2023-02-13".to_string(), 3.1);

        let json = serde_json::to_string(&summary).unwrap();
        let first = json.find("2023-02-17").unwrap();
        let second = json.find("2023-02-13").unwrap();
        assert!(first < second);
        assert!(json.contains("\"timeData\""));
        assert!(json.contains("\"histogram\""));
    }

    #[test]
    fn test_defaults_are_zero_and_empty() {
        let stats = AverageStats::default();
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.number_feedbacks, 0);
        assert_eq!(stats.average_word_number, 0.0);
        assert!(PopularWords::default().popular_words.is_empty());
        assert!(RatingsSummary::default().histogram.is_empty());
    }

    #[test]
    fn test_new_feedback_check_accepts_valid_submission() {
        let analytics = AnalyticsConfig::default();
        assert!(submission("Great service", 5).check(&analytics).is_ok());
    }

    #[test]
    fn test_new_feedback_check_rejects_out_of_range_rating() {
        let analytics = AnalyticsConfig::default();
        let err = submission("Great service", 9).check(&analytics).unwrap_err();

        match err {
            crate::Error::Validation { field, message } => {
                assert_eq!(field, "rating");
                assert!(message.contains("between 1 and 5"));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_feedback_check_rejects_blank_text() {
        let analytics = AnalyticsConfig::default();
        let err = submission("   ", 3).check(&analytics).unwrap_err();
        assert!(matches!(err, crate::Error::Validation { ref field, .. } if field == "text"));
    }

    #[test]
    fn test_new_feedback_check_rejects_empty_owner() {
        let analytics = AnalyticsConfig::default();
        let mut feedback = submission("fine", 3);
        feedback.owner_id = String::new();
        assert!(feedback.check(&analytics).is_err());
    }

    #[test]
    fn test_into_record_keeps_explicit_timestamp() {
        let at = Utc.with_ymd_and_hms(2023, 2, 13, 9, 3, 5).unwrap();
        let mut feedback = submission("Quality products", 4);
        feedback.created_at = Some(at);

        let record = feedback.into_record();
        assert_eq!(record.created_at, at);
        assert_eq!(record.owner_id, "acme");
        assert_eq!(record.rating, 4);
    }

    #[test]
    fn test_new_feedback_deserializes_camel_case() {
        let feedback: NewFeedback = serde_json::from_value(json!({
            "ownerId": "acme",
            "text": "ok",
            "rating": 3
        }))
        .unwrap();
        assert_eq!(feedback.owner_id, "acme");
        assert!(feedback.created_at.is_none());
    }

    #[test]
    fn test_bucket_labels() {
        let at = Utc.with_ymd_and_hms(2023, 2, 13, 9, 3, 5).unwrap();
        assert_eq!(TimeGranularity::Entry.bucket_label(at), "2023-02-13T09:03:05Z");
        assert_eq!(TimeGranularity::Day.bucket_label(at), "2023-02-13");
        assert_eq!(TimeGranularity::Month.bucket_label(at), "2023-02");
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("DAY".parse::<TimeGranularity>().unwrap(), TimeGranularity::Day);
        assert_eq!(
            "month".parse::<TimeGranularity>().unwrap(),
            TimeGranularity::Month
        );
        assert!("week".parse::<TimeGranularity>().is_err());
        assert_eq!(TimeGranularity::default().to_string(), "entry");
    }

    #[test]
    fn test_granularity_serde() {
        let parsed: TimeGranularity = serde_json::from_str("\"day\"").unwrap();
        assert_eq!(parsed, TimeGranularity::Day);
        assert_eq!(serde_json::to_string(&TimeGranularity::Entry).unwrap(), "\"entry\"");
    }
}
