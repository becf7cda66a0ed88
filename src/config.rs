//! Register configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use jiff::tz::TimeZone;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// EPOS register configuration
#[derive(Debug, Parser)]
#[command(name = "epos", about = "Point-of-sale register", long_about = None)]
pub struct Config {
    /// Catalog fixture file (products and customers)
    #[arg(
        short,
        long,
        env = "EPOS_CATALOG",
        default_value = "fixtures/catalog/default.yml"
    )]
    pub catalog: PathBuf,

    /// IANA time zone sales are bucketed in; the system zone when unset
    #[arg(short, long, env = "EPOS_TIME_ZONE")]
    pub time_zone: Option<String>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not in the time zone database.
    pub fn time_zone(&self) -> Result<TimeZone, jiff::Error> {
        match &self.time_zone {
            Some(name) => TimeZone::get(name),
            None => Ok(TimeZone::system()),
        }
    }
}
