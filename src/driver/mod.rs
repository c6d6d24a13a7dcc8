//! Driver seam.
//!
//! The vendor library is reached through three calls: declare the header
//! revision, configure error handling, and read one temperature sample. The
//! [`ThermocoupleDriver`] trait captures exactly that contract so the registry
//! and sessions can run against the real library ([`UniversalLibrary`]) or a
//! scripted stand-in ([`MockDriver`]).

pub mod mock;
pub mod ul;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DriverCall, Result, ThermoError};
use crate::thermocouple::{TemperatureScale, ThermocoupleType};

pub use mock::MockDriver;
pub use ul::UniversalLibrary;

/// Non-zero status returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(
    /// Raw status value.
    pub i32,
);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the driver reports errors on its own (console/message boxes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReporting {
    /// Report nothing; errors only come back as status codes.
    #[default]
    DontPrint,
    /// Print warnings only.
    PrintWarnings,
    /// Print fatal errors only.
    PrintFatal,
    /// Print every error.
    PrintAll,
}

impl ErrorReporting {
    /// Driver code for this mode.
    pub fn code(self) -> i32 {
        match self {
            Self::DontPrint => mcc_ul_sys::DONTPRINT as i32,
            Self::PrintWarnings => mcc_ul_sys::PRINTWARNINGS as i32,
            Self::PrintFatal => mcc_ul_sys::PRINTFATAL as i32,
            Self::PrintAll => mcc_ul_sys::PRINTALL as i32,
        }
    }
}

/// Whether the driver halts the process on errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Never stop; the caller handles every status code.
    #[default]
    DontStop,
    /// Exit the process on fatal errors.
    StopFatal,
    /// Exit the process on any error.
    StopAll,
}

impl ErrorHandling {
    /// Driver code for this mode.
    pub fn code(self) -> i32 {
        match self {
            Self::DontStop => mcc_ul_sys::DONTSTOP as i32,
            Self::StopFatal => mcc_ul_sys::STOPFATAL as i32,
            Self::StopAll => mcc_ul_sys::STOPALL as i32,
        }
    }
}

/// The three-call contract of the vendor library.
///
/// Implementations must be callable from any thread; the real library is
/// serialized internally.
pub trait ThermocoupleDriver: Send + Sync {
    /// Declare the header revision. Returns the revision the driver accepted.
    fn declare_revision(&self, revision: f32) -> std::result::Result<f32, ErrorCode>;

    /// Select driver-side error reporting and handling.
    fn configure_error_handling(
        &self,
        reporting: ErrorReporting,
        handling: ErrorHandling,
    ) -> std::result::Result<(), ErrorCode>;

    /// Read one temperature sample.
    fn read_temperature(
        &self,
        board: i32,
        channel: i32,
        scale: TemperatureScale,
        thermocouple_type: ThermocoupleType,
    ) -> std::result::Result<f32, ErrorCode>;

    /// Human-readable text for a driver error code.
    fn error_message(&self, code: ErrorCode) -> String {
        format!("driver error {}", code)
    }
}

/// One-time driver setup performed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSetup {
    /// Header revision declared to the driver.
    pub revision: f32,
    /// Driver-side error reporting.
    pub reporting: ErrorReporting,
    /// Driver-side error handling.
    pub handling: ErrorHandling,
}

impl Default for DriverSetup {
    fn default() -> Self {
        Self {
            revision: mcc_ul_sys::CURRENTREVNUM as f32,
            reporting: ErrorReporting::DontPrint,
            handling: ErrorHandling::DontStop,
        }
    }
}

impl DriverSetup {
    /// Declare the revision and configure error handling.
    pub fn apply(&self, driver: &dyn ThermocoupleDriver) -> Result<()> {
        let accepted = driver
            .declare_revision(self.revision)
            .map_err(|code| driver_error(driver, DriverCall::DeclareRevision, code))?;
        debug!(requested = self.revision, accepted, "Declared library revision");

        driver
            .configure_error_handling(self.reporting, self.handling)
            .map_err(|code| driver_error(driver, DriverCall::ErrorHandling, code))?;
        debug!(reporting = ?self.reporting, handling = ?self.handling, "Configured driver error handling");

        Ok(())
    }
}

/// Read one Celsius sample for the given input.
pub(crate) fn read_celsius(
    driver: &dyn ThermocoupleDriver,
    board: i32,
    channel: i32,
    thermocouple_type: ThermocoupleType,
) -> Result<f64> {
    driver
        .read_temperature(board, channel, TemperatureScale::Celsius, thermocouple_type)
        .map(f64::from)
        .map_err(|code| driver_error(driver, DriverCall::ReadTemperature, code))
}

fn driver_error(driver: &dyn ThermocoupleDriver, call: DriverCall, code: ErrorCode) -> ThermoError {
    let message = driver.error_message(code);
    warn!(%call, code = code.0, %message, "Driver call failed");
    ThermoError::Driver {
        call,
        code: code.0,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_setup_never_prints_or_stops() {
        let setup = DriverSetup::default();
        assert_eq!(setup.reporting.code(), 0);
        assert_eq!(setup.handling.code(), 0);
        assert!(setup.revision > 0.0);
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        let driver = MockDriver::new();
        driver.fail_next_declare_revision(ErrorCode(7));

        let err = DriverSetup::default().apply(&driver).unwrap_err();
        match err {
            ThermoError::Driver { call, code, .. } => {
                assert_eq!(call, DriverCall::DeclareRevision);
                assert_eq!(code, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(driver.error_handling_calls(), 0);
    }

    #[test]
    fn test_read_celsius_requests_celsius() {
        let driver = MockDriver::with_readings([21.5]);
        let value = read_celsius(&driver, 0, 3, ThermocoupleType::K).unwrap();
        assert_eq!(value, 21.5);
        assert_eq!(driver.last_read_request(), Some((0, 3, TemperatureScale::Celsius, ThermocoupleType::K)));
    }
}
