//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; applications call [`init`] (or
//! [`init_from_settings`]) once to print them. `RUST_LOG` takes precedence
//! over the configured level.
//!
//! # Example
//! ```no_run
//! use daq_thermocouple::logging::{self, LogFormat, LoggingSettings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! logging::init(&LoggingSettings {
//!     level: "debug".to_string(),
//!     format: LogFormat::Compact,
//!     ..Default::default()
//! })?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{Result, ThermoError};
use crate::settings::AcquisitionSettings;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored (development)
    #[default]
    Pretty,
    /// Single-line, no colors
    Compact,
    /// JSON objects for log aggregation
    Json,
}

/// Logging section of the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level: trace, debug, info, warn or error
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include file and line numbers
    pub with_file_and_line: bool,
    /// Include thread names
    pub with_thread_names: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_file_and_line: false,
            with_thread_names: false,
        }
    }
}

impl LoggingSettings {
    /// Check the level string.
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.level).map(|_| ())
    }
}

/// Initialize tracing from loaded acquisition settings.
pub fn init_from_settings(settings: &AcquisitionSettings) -> Result<()> {
    init(&settings.logging)
}

/// Initialize tracing.
///
/// Idempotent: if a global subscriber is already installed this returns
/// `Ok(())`, which keeps it safe to call from tests and libraries.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let level = parse_log_level(&settings.level)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let layer = match settings.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(settings.with_file_and_line)
            .with_line_number(settings.with_file_and_line)
            .with_thread_names(settings.with_thread_names)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(false)
            .with_file(settings.with_file_and_line)
            .with_line_number(settings.with_file_and_line)
            .with_thread_names(settings.with_thread_names)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_file(settings.with_file_and_line)
            .with_line_number(settings.with_file_and_line)
            .with_thread_names(settings.with_thread_names)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .or_else(|e| {
            // Already initialized is expected in tests and embedded use
            let message = e.to_string();
            if message.contains("has already been set") || message.contains("already initialized") {
                Ok(())
            } else {
                Err(ThermoError::Logging { message })
            }
        })
}

/// Parse a log level string.
fn parse_log_level(level: &str) -> Result<Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(ThermoError::invalid_config(format!(
            "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
            level
        ))),
    }
}
