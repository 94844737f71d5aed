//! Dashboard view state
//!
//! Holds the three aggregates the dashboard displays. Values start at zero or
//! empty and are replaced only by successful fetches; a failed fetch is
//! logged and leaves its section untouched.

use crate::client::AnalyticsClient;
use feedback_core::{AverageStats, PopularWords, RatingsSummary, TimeGranularity};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

const MONTHS_PER_YEAR: f64 = 12.0;

/// What the dashboard asks the service for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keyword limit, server default when `None`
    pub keyword_limit: Option<usize>,
    /// Time series bucket, server default when `None`
    pub interval: Option<TimeGranularity>,
}

/// Data held by the dashboard between renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Mean rating
    pub average_rating: f64,
    /// Number of feedback records
    pub number_feedbacks: u64,
    /// Mean words per feedback
    pub average_word_number: f64,
    /// Keyword frequencies, `None` until fetched
    pub keywords: Option<IndexMap<String, u64>>,
    /// Running mean rating over time, `None` until fetched
    pub time_data: Option<IndexMap<String, f64>>,
    /// Rating distribution, `None` until fetched
    pub histogram: Option<IndexMap<String, u64>>,
    /// True while requests are outstanding
    #[serde(skip)]
    pub loading: bool,
}

impl DashboardView {
    /// Empty view with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the summary numbers
    pub fn apply_average(&mut self, stats: AverageStats) {
        self.average_rating = stats.average_rating;
        self.number_feedbacks = stats.number_feedbacks;
        self.average_word_number = stats.average_word_number;
    }

    /// Replace the keyword frequencies
    pub fn apply_popular_words(&mut self, words: PopularWords) {
        self.keywords = Some(words.popular_words);
    }

    /// Replace the time series and histogram
    pub fn apply_ratings(&mut self, summary: RatingsSummary) {
        self.time_data = Some(summary.time_data);
        self.histogram = Some(summary.histogram);
    }

    /// Feedback count spread over a year
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn feedbacks_per_month(&self) -> f64 {
        self.number_feedbacks as f64 / MONTHS_PER_YEAR
    }

    /// Serializable copy including derived values
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            view: self,
            feedbacks_per_month: format!("{:.2}", self.feedbacks_per_month()),
        }
    }

    /// Plain text rendering for terminals
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Average rating:        {:.2}", self.average_rating);
        let _ = writeln!(out, "Feedbacks:             {}", self.number_feedbacks);
        let _ = writeln!(out, "Feedbacks per month:   {:.2}", self.feedbacks_per_month());
        let _ = writeln!(out, "Average word number:   {:.2}", self.average_word_number);

        out.push_str("\nPopular words\n");
        match &self.keywords {
            Some(words) if !words.is_empty() => {
                for (word, count) in words {
                    let _ = writeln!(out, "  {word:<20} {count}");
                }
            }
            _ => out.push_str("  (no data)\n"),
        }

        out.push_str("\nRating histogram\n");
        match &self.histogram {
            Some(histogram) if !histogram.is_empty() => {
                for (rating, count) in histogram {
                    let _ = writeln!(out, "  {rating:>3} | {} {count}", bar(*count));
                }
            }
            _ => out.push_str("  (no data)\n"),
        }

        out.push_str("\nAverage rating over time\n");
        match &self.time_data {
            Some(series) if !series.is_empty() => {
                for (label, value) in series {
                    let _ = writeln!(out, "  {label:<22} {value:.2}");
                }
            }
            _ => out.push_str("  (no data)\n"),
        }

        out
    }
}

/// Shared handle to the dashboard state
///
/// Clones share one [`DashboardView`]. The lock is never held across a
/// request, so readers see `loading` and each section as it lands.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    state: Arc<RwLock<DashboardView>>,
}

impl Dashboard {
    /// Dashboard with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state
    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.state.read().clone()
    }

    /// True while a load is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Fetch all three aggregates concurrently, applying each success as it settles
    pub async fn load(&self, client: &AnalyticsClient, options: LoadOptions) {
        self.state.write().loading = true;

        let average = async {
            match client.average_stats().await {
                Ok(stats) => self.state.write().apply_average(stats),
                Err(e) => warn!(error = %e, "Failed to load average stats"),
            }
        };
        let words = async {
            match client.popular_words(options.keyword_limit).await {
                Ok(words) => self.state.write().apply_popular_words(words),
                Err(e) => warn!(error = %e, "Failed to load popular words"),
            }
        };
        let ratings = async {
            match client.ratings(options.interval).await {
                Ok(summary) => self.state.write().apply_ratings(summary),
                Err(e) => warn!(error = %e, "Failed to load ratings"),
            }
        };
        tokio::join!(average, words, ratings);

        let feedbacks = {
            let mut state = self.state.write();
            state.loading = false;
            state.number_feedbacks
        };
        info!(base_url = client.base_url(), feedbacks, "Dashboard loaded");
    }
}

/// JSON view of the dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot<'a> {
    #[serde(flatten)]
    view: &'a DashboardView,
    feedbacks_per_month: String,
}

fn bar(count: u64) -> String {
    const MAX_BAR: u64 = 40;
    "#".repeat(usize::try_from(count.min(MAX_BAR)).unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_state() {
        let view = DashboardView::new();
        assert!(!view.loading);
        assert_eq!(view.average_rating, 0.0);
        assert_eq!(view.number_feedbacks, 0);
        assert_eq!(view.average_word_number, 0.0);
        assert!(view.keywords.is_none());
        assert!(view.time_data.is_none());
        assert!(view.histogram.is_none());
    }

    #[test]
    fn test_feedbacks_per_month() {
        let mut view = DashboardView::new();
        view.number_feedbacks = 30;
        assert_eq!(view.feedbacks_per_month(), 2.5);
        assert_eq!(view.snapshot().feedbacks_per_month, "2.50");

        view.number_feedbacks = 1;
        assert_eq!(view.snapshot().feedbacks_per_month, "0.08");
    }

    #[test]
    fn test_snapshot_json() {
        let mut view = DashboardView::new();
        view.apply_average(AverageStats {
            average_rating: 4.5,
            number_feedbacks: 24,
            average_word_number: 7.25,
        });

        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "averageRating": 4.5,
                "numberFeedbacks": 24,
                "averageWordNumber": 7.25,
                "keywords": null,
                "timeData": null,
                "histogram": null,
                "feedbacksPerMonth": "2.00"
            })
        );
    }

    #[test]
    fn test_render_text() {
        let mut view = DashboardView::new();
        view.apply_popular_words(PopularWords {
            popular_words: [("great".to_string(), 3)].into_iter().collect(),
        });
        view.apply_ratings(RatingsSummary {
            time_data: [("2023-01".to_string(), 4.0)].into_iter().collect(),
            histogram: [("1".to_string(), 0), ("5".to_string(), 2)].into_iter().collect(),
        });

        let text = view.render_text();
        assert!(text.contains("Feedbacks per month:   0.00"));
        assert!(text.contains("great"));
        assert!(text.contains("  5 | ## 2"));
        assert!(text.contains("2023-01"));
        assert!(!text.contains("(no data)"));

        assert_eq!(DashboardView::new().render_text().matches("(no data)").count(), 3);
    }
}
