//! Configuration management for feedback analytics

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Aggregation tuning
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Tuning knobs for the aggregation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Number of keywords returned when the caller does not ask for a limit
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,

    /// Tokens shorter than this (in characters) are never counted as keywords
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Additional stopwords on top of the built-in English list
    #[serde(default)]
    pub extra_stopwords: Vec<String>,

    /// Lowest accepted rating
    #[serde(default = "default_rating_min")]
    pub rating_min: i16,

    /// Highest accepted rating
    #[serde(default = "default_rating_max")]
    pub rating_max: i16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    std::env::var("FEEDBACK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "postgresql://localhost/feedback".to_string())
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

const fn default_enable_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_keyword_limit() -> usize {
    10
}

const fn default_min_word_length() -> usize {
    3
}

const fn default_rating_min() -> i16 {
    1
}

const fn default_rating_max() -> i16 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: default_enable_cors(),
            cors_origins: default_cors_origins(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            keyword_limit: default_keyword_limit(),
            min_word_length: default_min_word_length(),
            extra_stopwords: Vec::new(),
            rating_min: default_rating_min(),
            rating_max: default_rating_max(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AnalyticsConfig {
    /// Whether `rating` lies inside the configured inclusive range
    #[must_use]
    pub const fn accepts_rating(&self, rating: i16) -> bool {
        rating >= self.rating_min && rating <= self.rating_max
    }
}

impl Config {
    /// Load configuration from an optional `config` file and `FEEDBACK_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `FEEDBACK_SERVER__PORT=9000`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FEEDBACK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.cors_origins")
                    .with_list_parse_key("analytics.extra_stopwords")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde defaults cannot express
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first violated invariant.
    pub fn validate(&self) -> crate::Result<()> {
        if self.analytics.rating_min > self.analytics.rating_max {
            return Err(crate::Error::Configuration {
                message: format!(
                    "analytics.rating_min ({}) exceeds analytics.rating_max ({})",
                    self.analytics.rating_min, self.analytics.rating_max
                ),
            });
        }

        if self.analytics.keyword_limit == 0 {
            return Err(crate::Error::Configuration {
                message: "analytics.keyword_limit must be at least 1".to_string(),
            });
        }

        if self.api.request_timeout == 0 {
            return Err(crate::Error::Configuration {
                message: "api.request_timeout must be at least 1 second".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(crate::Error::Configuration {
                message: format!(
                    "database.min_connections ({}) exceeds database.max_connections ({})",
                    self.database.min_connections, self.database.max_connections
                ),
            });
        }

        Ok(())
    }
}
