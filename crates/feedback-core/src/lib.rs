//! Core types, configuration and aggregation logic for feedback analytics

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod analytics;
pub mod config;
pub mod error;
pub mod types;

/// Simple error context handling for binaries
pub mod context_error {
    use std::{error::Error as StdError, fmt};

    /// A simple error type that can wrap any error with context
    #[derive(Debug)]
    pub struct ContextError {
        source: Option<Box<dyn StdError + Send + Sync>>,
        message: String,
    }

    impl ContextError {
        /// Create a new context error from a message
        pub fn new<S: Into<String>>(message: S) -> Self {
            Self {
                source: None,
                message: message.into(),
            }
        }

        /// Create a new context error from an existing error with context
        pub fn with_context<E, S>(error: E, message: S) -> Self
        where
            E: StdError + Send + Sync + 'static,
            S: Into<String>,
        {
            Self {
                source: Some(Box::new(error)),
                message: message.into(),
            }
        }
    }

    impl fmt::Display for ContextError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match &self.source {
                Some(source) => write!(f, "{}: {source}", self.message),
                None => write!(f, "{}", self.message),
            }
        }
    }

    impl StdError for ContextError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static))
        }
    }

    /// Result type alias for context errors
    pub type Result<T> = std::result::Result<T, ContextError>;

    /// Create a context error from a literal or a format string
    #[macro_export]
    macro_rules! context_error {
        ($msg:literal) => {
            $crate::context_error::ContextError::new($msg)
        };
        ($fmt:expr, $($arg:tt)*) => {
            $crate::context_error::ContextError::new(format!($fmt, $($arg)*))
        };
    }

    impl From<std::io::Error> for ContextError {
        fn from(err: std::io::Error) -> Self {
            Self::with_context(err, "I/O operation failed")
        }
    }

    impl From<crate::Error> for ContextError {
        fn from(err: crate::Error) -> Self {
            Self::new(err.to_string())
        }
    }
}

pub use config::Config;
pub use error::{Error, Result};
pub use types::{
    AverageStats, FeedbackRecord, NewFeedback, OwnerId, PopularWords, RatingsSummary,
    TimeGranularity,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level. The output format is
/// JSON unless the configuration asks for `text`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(logging: &config::LoggingConfig) -> context_error::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.format.eq_ignore_ascii_case("text") {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    };

    result.map_err(|e| crate::context_error!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::context_error::ContextError;
    use std::error::Error as StdError;

    #[test]
    fn test_context_error_display_includes_source() {
        let io = std::io::Error::other("disk gone");
        let err = ContextError::with_context(io, "Failed to read config");
        assert_eq!(err.to_string(), "Failed to read config: disk gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_context_error_macro() {
        let err = crate::context_error!("port {} is taken", 8080);
        assert_eq!(err.to_string(), "port 8080 is taken");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_core_error_converts() {
        let err: ContextError = crate::Error::Other("bad".to_string()).into();
        assert_eq!(err.to_string(), "bad");
    }
}
