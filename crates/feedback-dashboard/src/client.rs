//! HTTP client for the feedback analytics API

use feedback_core::{AverageStats, Error, PopularWords, RatingsSummary, Result, TimeGranularity};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header scoping aggregates to one owner
pub const OWNER_HEADER: &str = "X-Owner-Id";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API client for the three aggregate endpoints
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    client: Client,
    base_url: String,
    owner: Option<String>,
}

impl AnalyticsClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            owner: None,
        })
    }

    /// Scope every request to `owner`
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Average rating, feedback count and average word count
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn average_stats(&self) -> Result<AverageStats> {
        self.get_json("/feedbacks/average", &[]).await
    }

    /// Most frequent words, server default limit when `limit` is `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn popular_words(&self, limit: Option<usize>) -> Result<PopularWords> {
        let query: Vec<(&str, String)> = limit
            .map(|limit| vec![("limit", limit.to_string())])
            .unwrap_or_default();
        self.get_json("/feedbacks/keywords", &query).await
    }

    /// Rating time series and histogram
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn ratings(&self, interval: Option<TimeGranularity>) -> Result<RatingsSummary> {
        let query: Vec<(&str, String)> = interval
            .map(|interval| vec![("interval", interval.to_string())])
            .unwrap_or_default();
        self.get_json("/feedbacks/ratings", &query).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);

        if let Some(ref owner) = self.owner {
            request = request.header(OWNER_HEADER, owner);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to fetch {path}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "API returned error for {path}: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Http(format!("Failed to parse {path} response: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_trailing_slash() {
        let client = AnalyticsClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_average_stats_with_owner_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feedbacks/average"))
            .and(header(OWNER_HEADER, "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "averageRating": 4.25,
                "numberFeedbacks": 8,
                "averageWordNumber": 6.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalyticsClient::new(server.uri()).unwrap().with_owner("acme");
        let stats = client.average_stats().await.unwrap();
        assert_eq!(stats.number_feedbacks, 8);
        assert!((stats.average_rating - 4.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feedbacks/keywords"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"popularWords": {"great": 3}})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feedbacks/ratings"))
            .and(query_param("interval", "month"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"timeData": {"2023-01": 4.0}, "histogram": {"4": 1}}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalyticsClient::new(server.uri()).unwrap();
        let words = client.popular_words(Some(5)).await.unwrap();
        assert_eq!(words.popular_words.get("great"), Some(&3));

        let ratings = client.ratings(Some(TimeGranularity::Month)).await.unwrap();
        assert_eq!(ratings.histogram.get("4"), Some(&1));
    }

    #[tokio::test]
    async fn test_error_status_and_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(path("/feedbacks/average"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(path("/feedbacks/keywords"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AnalyticsClient::new(server.uri()).unwrap();

        match client.average_stats().await {
            Err(Error::Http(msg)) => assert!(msg.contains("500")),
            other => panic!("Expected HTTP error, got {other:?}"),
        }
        assert!(matches!(client.popular_words(None).await, Err(Error::Http(_))));
    }
}
