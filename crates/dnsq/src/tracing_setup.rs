//! Tracing and logging setup.
//!
//! Log lines go to stderr so they never mix with lookup results on stdout.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level.
    pub level: Level,

    /// Log format ("text" or "json").
    pub format: LogFormat,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format.
    Text,

    /// JSON format.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Builds a log configuration from the config file section, with an
    /// optional level override and the verbose flag applied on top.
    pub fn from_settings(
        logging: &dnsq_config::LoggingConfig,
        cli_level: Option<&str>,
        verbose: bool,
    ) -> Self {
        let level = match cli_level {
            Some(lvl) => parse_log_level(lvl),
            None if verbose => Level::DEBUG,
            None => parse_log_level(&logging.level),
        };

        let format = if logging.is_json() {
            LogFormat::Json
        } else {
            LogFormat::Text
        };

        Self { level, format }
    }
}

/// Parse log level from string
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }
}
