//! Scripted driver for running without hardware.
//!
//! Reads are answered from a queue of scripted outcomes (readings or error
//! codes). Once the script runs dry every read returns the ambient value.
//! Setup calls succeed unless a failure was armed for them.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::{ErrorCode, ErrorHandling, ErrorReporting, ThermocoupleDriver};
use crate::thermocouple::{TemperatureScale, ThermocoupleType};

/// Ambient temperature returned once the script is exhausted.
pub const DEFAULT_AMBIENT_C: f32 = 21.5;

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Result<f32, ErrorCode>>,
    ambient: Option<f32>,
    read_delay: Option<Duration>,
    revision_failure: Option<ErrorCode>,
    error_handling_failure: Option<ErrorCode>,
    declare_revision_calls: usize,
    error_handling_calls: usize,
    read_calls: usize,
    last_read: Option<(i32, i32, TemperatureScale, ThermocoupleType)>,
    last_error_handling: Option<(ErrorReporting, ErrorHandling)>,
}

/// In-memory [`ThermocoupleDriver`] with scripted behavior and call counters.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that returns `readings` in order.
    pub fn with_readings(readings: impl IntoIterator<Item = f32>) -> Self {
        let driver = Self::new();
        for reading in readings {
            driver.push_reading(reading);
        }
        driver
    }

    /// Queue a successful reading.
    pub fn push_reading(&self, value: f32) {
        self.state.lock().script.push_back(Ok(value));
    }

    /// Queue a failed read after the already scripted outcomes.
    pub fn push_read_failure(&self, code: ErrorCode) {
        self.state.lock().script.push_back(Err(code));
    }

    /// Make the very next read fail, ahead of the script.
    pub fn fail_next_read(&self, code: ErrorCode) {
        self.state.lock().script.push_front(Err(code));
    }

    /// Make the next revision declaration fail.
    pub fn fail_next_declare_revision(&self, code: ErrorCode) {
        self.state.lock().revision_failure = Some(code);
    }

    /// Make the next error-handling configuration fail.
    pub fn fail_next_error_handling(&self, code: ErrorCode) {
        self.state.lock().error_handling_failure = Some(code);
    }

    /// Value returned once the script is exhausted.
    pub fn set_ambient(&self, value: f32) {
        self.state.lock().ambient = Some(value);
    }

    /// Block every read for `delay` before answering.
    pub fn set_read_delay(&self, delay: Duration) {
        self.state.lock().read_delay = Some(delay);
    }

    /// Number of read calls made.
    pub fn read_calls(&self) -> usize {
        self.state.lock().read_calls
    }

    /// Number of revision declarations made.
    pub fn declare_revision_calls(&self) -> usize {
        self.state.lock().declare_revision_calls
    }

    /// Number of error-handling configurations made.
    pub fn error_handling_calls(&self) -> usize {
        self.state.lock().error_handling_calls
    }

    /// Arguments of the most recent read.
    pub fn last_read_request(&self) -> Option<(i32, i32, TemperatureScale, ThermocoupleType)> {
        self.state.lock().last_read
    }

    /// Arguments of the most recent error-handling configuration.
    pub fn last_error_handling(&self) -> Option<(ErrorReporting, ErrorHandling)> {
        self.state.lock().last_error_handling
    }
}

impl ThermocoupleDriver for MockDriver {
    fn declare_revision(&self, revision: f32) -> Result<f32, ErrorCode> {
        let mut state = self.state.lock();
        state.declare_revision_calls += 1;
        match state.revision_failure.take() {
            Some(code) => Err(code),
            None => Ok(revision),
        }
    }

    fn configure_error_handling(
        &self,
        reporting: ErrorReporting,
        handling: ErrorHandling,
    ) -> Result<(), ErrorCode> {
        let mut state = self.state.lock();
        state.error_handling_calls += 1;
        state.last_error_handling = Some((reporting, handling));
        match state.error_handling_failure.take() {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    fn read_temperature(
        &self,
        board: i32,
        channel: i32,
        scale: TemperatureScale,
        thermocouple_type: ThermocoupleType,
    ) -> Result<f32, ErrorCode> {
        let (outcome, delay) = {
            let mut state = self.state.lock();
            state.read_calls += 1;
            state.last_read = Some((board, channel, scale, thermocouple_type));
            let ambient = state.ambient.unwrap_or(DEFAULT_AMBIENT_C);
            let outcome = state.script.pop_front().unwrap_or(Ok(ambient));
            (outcome, state.read_delay)
        };

        // Sleep outside the lock so counters stay observable
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        debug!(board, channel, ?outcome, "Mock temperature read");
        outcome
    }

    fn error_message(&self, code: ErrorCode) -> String {
        format!("Mock driver error {}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_ambient() {
        let driver = MockDriver::with_readings([1.0, 2.0]);
        let read = || driver.read_temperature(0, 0, TemperatureScale::Celsius, ThermocoupleType::J);
        assert_eq!(read(), Ok(1.0));
        assert_eq!(read(), Ok(2.0));
        assert_eq!(read(), Ok(DEFAULT_AMBIENT_C));
        driver.set_ambient(30.0);
        assert_eq!(read(), Ok(30.0));
        assert_eq!(driver.read_calls(), 4);
    }

    #[test]
    fn test_fail_next_read_jumps_the_queue() {
        let driver = MockDriver::with_readings([5.0]);
        driver.fail_next_read(ErrorCode(11));
        let read = || driver.read_temperature(1, 2, TemperatureScale::Celsius, ThermocoupleType::T);
        assert_eq!(read(), Err(ErrorCode(11)));
        assert_eq!(read(), Ok(5.0));
    }

    #[test]
    fn test_setup_failures_are_one_shot() {
        let driver = MockDriver::new();
        driver.fail_next_error_handling(ErrorCode(3));
        assert_eq!(
            driver.configure_error_handling(ErrorReporting::DontPrint, ErrorHandling::DontStop),
            Err(ErrorCode(3))
        );
        assert_eq!(
            driver.configure_error_handling(ErrorReporting::PrintAll, ErrorHandling::StopAll),
            Ok(())
        );
        assert_eq!(
            driver.last_error_handling(),
            Some((ErrorReporting::PrintAll, ErrorHandling::StopAll))
        );
        assert_eq!(driver.error_handling_calls(), 2);
    }
}
