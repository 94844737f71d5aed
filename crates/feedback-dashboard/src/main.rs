//! Command line dashboard for the feedback analytics API

use clap::{Parser, ValueEnum};
use feedback_core::TimeGranularity;
use feedback_dashboard::{AnalyticsClient, Dashboard, LoadOptions};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable sections
    Text,
    /// Single JSON document
    Json,
}

/// Command line interface for the feedback dashboard
#[derive(Debug, Parser)]
#[command(
    name = "feedback-dashboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Show feedback analytics fetched from the API server"
)]
struct Cli {
    /// API server base URL
    #[arg(long, env = "FEEDBACK_API_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Only show feedback submitted to this owner
    #[arg(long, env = "FEEDBACK_OWNER_ID")]
    owner: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of keywords to request (1-100)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=100))]
    keywords: Option<u16>,

    /// Time series bucket: entry, day or month
    #[arg(long, value_parser = TimeGranularity::from_str)]
    interval: Option<TimeGranularity>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv {
        debug!(".env file not loaded: {}", e);
    }

    let client = match AnalyticsClient::new(&cli.base_url) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = match cli.owner {
        Some(ref owner) => client.with_owner(owner),
        None => client,
    };

    let options = LoadOptions {
        keyword_limit: cli.keywords.map(usize::from),
        interval: cli.interval,
    };

    let dashboard = Dashboard::new();
    dashboard.load(&client, options).await;
    let view = dashboard.view();

    match cli.format {
        OutputFormat::Text => print!("{}", view.render_text()),
        OutputFormat::Json => match serde_json::to_string_pretty(&view.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize dashboard: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "feedback-dashboard",
            "--base-url",
            "http://api:9000",
            "--owner",
            "acme",
            "--format",
            "json",
            "--interval",
            "day",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "http://api:9000");
        assert_eq!(cli.owner.as_deref(), Some("acme"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.interval, Some(TimeGranularity::Day));

        assert!(Cli::try_parse_from(["feedback-dashboard", "--keywords", "0"]).is_err());
        assert!(Cli::try_parse_from(["feedback-dashboard", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["feedback-dashboard", "--interval", "week"]).is_err());
    }
}
