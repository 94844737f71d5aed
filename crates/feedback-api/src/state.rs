//! Application state management

use feedback_core::{Config, analytics::Aggregator, context_error, context_error::Result};
use feedback_database::FeedbackStore;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Feedback record store
    pub store: Arc<dyn FeedbackStore>,
    /// Aggregation engine configured from `config.analytics`
    pub aggregator: Arc<Aggregator>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn FeedbackStore>) -> Self {
        let aggregator = Arc::new(Aggregator::new(config.analytics.clone()));

        Self {
            config,
            store,
            aggregator,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Check if the application is properly configured
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| context_error!("Invalid configuration: {}", e))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
