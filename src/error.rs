//! Error types for thermocouple acquisition.
//!
//! Every fallible operation in this crate, including the configuration guard,
//! returns [`Result`] with a [`ThermoError`]. Registries and sessions also keep
//! the rendered message of their most recent failure as "last error" text.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigId;

/// Result type alias for thermocouple operations.
pub type Result<T> = std::result::Result<T, ThermoError>;

/// Errors that can occur while configuring or acquiring from a channel.
#[derive(Error, Debug)]
pub enum ThermoError {
    /// The configuration is already bound to a sample buffer.
    #[error("Configuration {id} is already registered")]
    AlreadyRegistered {
        /// Identity of the configuration.
        id: ConfigId,
    },

    /// A setter was called on a configuration that is registered.
    #[error("Cannot set {field}: configuration {id} is in use")]
    ConfigLocked {
        /// Identity of the configuration.
        id: ConfigId,
        /// Name of the field the caller tried to change.
        field: &'static str,
    },

    /// A read was attempted before registration.
    #[error("Configuration {id} is not registered")]
    NotRegistered {
        /// Identity of the configuration.
        id: ConfigId,
    },

    /// The vendor driver returned a non-zero status.
    #[error("Driver call {call} failed with error code {code}: {message}")]
    Driver {
        /// Entry point that failed.
        call: DriverCall,
        /// Status code returned by the driver.
        code: i32,
        /// Driver text for `code`.
        message: String,
    },

    /// The driver did not answer within the configured timeout.
    #[error("Temperature read on board {board} channel {channel} timed out after {timeout:?}")]
    Timeout {
        /// Board number of the input.
        board: i32,
        /// Channel number of the input.
        channel: i32,
        /// Configured limit that was exceeded.
        timeout: Duration,
    },

    /// A configuration value was rejected.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the value.
        message: String,
    },

    /// Storage for the sample buffer could not be allocated.
    #[error("Cannot allocate a sample buffer for {capacity} samples")]
    BufferAllocation {
        /// Requested number of samples.
        capacity: usize,
    },

    /// Settings could not be loaded or extracted.
    #[error("Settings error: {0}")]
    Settings(#[from] figment::Error),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Reason reported by the subscriber.
        message: String,
    },

    /// A blocking driver task panicked or was cancelled.
    #[error("Driver task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// The external driver entry point that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    /// `cbDeclareRevision`
    DeclareRevision,
    /// `cbErrHandling`
    ErrorHandling,
    /// `cbTIn`
    ReadTemperature,
}

impl fmt::Display for DriverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclareRevision => write!(f, "cbDeclareRevision"),
            Self::ErrorHandling => write!(f, "cbErrHandling"),
            Self::ReadTemperature => write!(f, "cbTIn"),
        }
    }
}

impl ThermoError {
    /// Build an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Numeric driver code, if this error came from the driver.
    pub fn driver_code(&self) -> Option<i32> {
        match self {
            Self::Driver { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this error is a lock violation.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::ConfigLocked { .. })
    }

    /// Check if this error is a duplicate registration.
    pub fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }

    /// Check if this error is a read against an unknown configuration.
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::NotRegistered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display_embeds_code() {
        let err = ThermoError::Driver {
            call: DriverCall::ReadTemperature,
            code: 42,
            message: "Open thermocouple".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("cbTIn"));
        assert!(text.contains("42"));
        assert!(text.contains("Open thermocouple"));
        assert_eq!(err.driver_code(), Some(42));
    }

    #[test]
    fn test_driver_call_display() {
        assert_eq!(DriverCall::DeclareRevision.to_string(), "cbDeclareRevision");
        assert_eq!(DriverCall::ErrorHandling.to_string(), "cbErrHandling");
    }

    #[test]
    fn test_predicates() {
        let id = ConfigId::next();
        assert!(ThermoError::ConfigLocked { id, field: "board" }.is_locked());
        assert!(ThermoError::AlreadyRegistered { id }.is_already_registered());
        assert!(ThermoError::NotRegistered { id }.is_not_registered());
        assert_eq!(ThermoError::NotRegistered { id }.driver_code(), None);
    }
}
