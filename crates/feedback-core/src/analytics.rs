//! Aggregations behind the analytics endpoints
//!
//! Every function here is pure: it takes a slice of [`FeedbackRecord`]s that
//! the caller already fetched from a store and folds it into one of the three
//! wire payloads.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use indexmap::IndexMap;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::AnalyticsConfig;
use crate::types::{AverageStats, FeedbackRecord, PopularWords, RatingsSummary, TimeGranularity};

/// Upper bound accepted for a caller-supplied keyword limit
pub const MAX_KEYWORD_LIMIT: usize = 100;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "can't", "could", "did", "didn't", "do", "does",
        "doesn't", "doing", "don't", "down", "during", "each", "even", "ever", "every", "few",
        "for", "from", "further", "get", "got", "had", "has", "have", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "i'm", "i've", "if",
        "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "let", "like",
        "me", "more", "most", "much", "my", "myself", "no", "nor", "not", "now", "of", "off",
        "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
        "own", "really", "same", "she", "should", "so", "some", "still", "such", "than",
        "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
        "there's", "these", "they", "they're", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "wasn't", "we", "we're", "were", "what", "when",
        "where", "which", "while", "who", "whom", "why", "will", "with", "won't", "would",
        "you", "you're", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Whether `word` (already lowercased) is on the built-in stopword list
#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Number of Unicode words in `text`
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// Lowercased Unicode words of `text`, in order of appearance
///
/// Typographic apostrophes are folded to `'` so contractions match the
/// stopword list.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words()
        .map(|word| word.to_lowercase().replace('\u{2019}', "'"))
}

/// Whether `token` is a number, including `4.5` and `1,000` style separators
#[must_use]
pub fn is_numeric_token(token: &str) -> bool {
    token.chars().any(char::is_numeric)
        && token
            .chars()
            .all(|c| c.is_numeric() || c == '.' || c == ',')
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Folds feedback records into the analytics payloads
#[derive(Debug, Clone)]
pub struct Aggregator {
    settings: AnalyticsConfig,
    extra_stopwords: HashSet<String>,
}

impl Aggregator {
    /// Build an aggregator from the analytics configuration
    #[must_use]
    pub fn new(settings: AnalyticsConfig) -> Self {
        let extra_stopwords = settings
            .extra_stopwords
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        Self {
            settings,
            extra_stopwords,
        }
    }

    /// The settings this aggregator was built from
    #[must_use]
    pub const fn settings(&self) -> &AnalyticsConfig {
        &self.settings
    }

    /// Mean rating, record count and mean word count
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_stats(&self, records: &[FeedbackRecord]) -> AverageStats {
        let rating_sum: i64 = records.iter().map(|r| i64::from(r.rating)).sum();
        let word_sum: usize = records.iter().map(|r| word_count(&r.text)).sum();

        AverageStats {
            average_rating: round2(mean(rating_sum as f64, records.len())),
            number_feedbacks: records.len() as u64,
            average_word_number: round2(mean(word_sum as f64, records.len())),
        }
    }

    /// Whether `token` should be counted as a keyword
    fn is_keyword(&self, token: &str) -> bool {
        token.chars().count() >= self.settings.min_word_length
            && !is_numeric_token(token)
            && !is_stopword(token)
            && !self.extra_stopwords.contains(token)
    }

    /// Top `limit` keywords by frequency; ties are ordered alphabetically
    ///
    /// `None` falls back to the configured default. The limit is clamped to
    /// `1..=MAX_KEYWORD_LIMIT`.
    #[must_use]
    pub fn popular_words(&self, records: &[FeedbackRecord], limit: Option<usize>) -> PopularWords {
        let limit = limit
            .unwrap_or(self.settings.keyword_limit)
            .clamp(1, MAX_KEYWORD_LIMIT);

        let mut counts: HashMap<String, u64> = HashMap::new();
        for record in records {
            for token in tokenize(&record.text) {
                if self.is_keyword(&token) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);

        PopularWords {
            popular_words: ranked.into_iter().collect(),
        }
    }

    /// Running mean rating over time, oldest first
    ///
    /// Each point holds the mean of every rating up to and including its
    /// bucket. Within a bucket the last record wins, so day and month points
    /// carry the running mean at the end of the bucket.
    #[must_use]
    pub fn time_series(
        &self,
        records: &[FeedbackRecord],
        granularity: TimeGranularity,
    ) -> IndexMap<String, f64> {
        let mut ordered: Vec<&FeedbackRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.created_at);

        let mut series = IndexMap::new();
        let mut sum = 0_i64;
        for (index, record) in ordered.into_iter().enumerate() {
            sum += i64::from(record.rating);
            #[allow(clippy::cast_precision_loss)]
            let running = mean(sum as f64, index + 1);
            series.insert(granularity.bucket_label(record.created_at), running);
        }
        series
    }

    /// Count of records per rating value across the configured range
    ///
    /// Every rating in range has an entry, even when its count is zero.
    #[must_use]
    pub fn histogram(&self, records: &[FeedbackRecord]) -> IndexMap<String, u64> {
        let mut histogram: IndexMap<String, u64> = (self.settings.rating_min
            ..=self.settings.rating_max)
            .map(|rating| (rating.to_string(), 0))
            .collect();

        let mut skipped = 0_usize;
        for record in records {
            match histogram.get_mut(&record.rating.to_string()) {
                Some(count) => *count += 1,
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "Ignored ratings outside the configured range");
        }
        histogram
    }

    /// Time series and histogram together
    #[must_use]
    pub fn ratings_summary(
        &self,
        records: &[FeedbackRecord],
        granularity: TimeGranularity,
    ) -> RatingsSummary {
        RatingsSummary {
            time_data: self.time_series(records, granularity),
            histogram: self.histogram(records),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}
