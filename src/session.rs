//! Single-channel acquisition session.
//!
//! An [`AcquisitionSession`] owns its configuration, its sample buffer and its
//! own last error, so nothing is looked up in shared state and errors can
//! always be attributed to the channel that produced them. It is the
//! preferred entry point when one owner drives one channel; use
//! [`Registry`](crate::Registry) when many configurations are managed by
//! identity.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use daq_thermocouple::{AcquisitionSession, ChannelConfig, ThermocoupleType, UniversalLibrary};
//!
//! # fn example() -> daq_thermocouple::Result<()> {
//! let config = ChannelConfig::new()
//!     .with_board(0)?
//!     .with_channel(2)?
//!     .with_thermocouple_type(ThermocoupleType::K)?
//!     .with_buffer_capacity(600)?;
//!
//! let mut session = AcquisitionSession::open(config, Arc::new(UniversalLibrary::new()))?;
//! let celsius = session.read()?;
//! println!("{:.2} °C, {} samples kept", celsius, session.fill_count());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::buffer::SampleBuffer;
use crate::config::ChannelConfig;
use crate::driver::{self, DriverSetup, ThermocoupleDriver};
use crate::error::{Result, ThermoError};

/// Acquisition state for one registered channel.
pub struct AcquisitionSession {
    config: ChannelConfig,
    driver: Arc<dyn ThermocoupleDriver>,
    buffer: SampleBuffer,
    last_error: Option<String>,
}

impl AcquisitionSession {
    /// Set up the driver with default settings and start a session.
    pub fn open(config: ChannelConfig, driver: Arc<dyn ThermocoupleDriver>) -> Result<Self> {
        Self::open_with_setup(config, driver, &DriverSetup::default())
    }

    /// Set up the driver with `setup` and start a session.
    ///
    /// `config` must not be registered elsewhere. On success it is locked and
    /// owned by the session; on failure it is dropped.
    pub fn open_with_setup(
        mut config: ChannelConfig,
        driver: Arc<dyn ThermocoupleDriver>,
        setup: &DriverSetup,
    ) -> Result<Self> {
        if config.is_locked() {
            return Err(ThermoError::AlreadyRegistered { id: config.id() });
        }

        let buffer = SampleBuffer::new(config.buffer_capacity())?;
        setup.apply(driver.as_ref())?;
        config.lock();

        info!(
            id = %config.id(),
            board = config.board(),
            channel = config.channel(),
            thermocouple = %config.thermocouple_type(),
            capacity = config.buffer_capacity(),
            "Opened acquisition session"
        );

        Ok(Self {
            buffer,
            config,
            driver,
            last_error: None,
        })
    }

    /// Read one sample and append it to the buffer.
    ///
    /// Runs on the calling thread and is not bounded by the timeout.
    pub fn read(&mut self) -> Result<f64> {
        let result = driver::read_celsius(
            self.driver.as_ref(),
            self.config.board(),
            self.config.channel(),
            self.config.thermocouple_type(),
        );
        self.record(result)
    }

    /// Read one sample, giving up after the configured timeout.
    ///
    /// The driver call runs on the blocking pool. If it does not finish in
    /// time the call is left to complete in the background, its sample is
    /// discarded, and [`ThermoError::Timeout`] is returned.
    ///
    /// Must be awaited inside a Tokio runtime.
    pub async fn read_with_timeout(&mut self) -> Result<f64> {
        let handle = Arc::clone(&self.driver);
        let board = self.config.board();
        let channel = self.config.channel();
        let thermocouple_type = self.config.thermocouple_type();
        let timeout = self.config.timeout();

        let task = tokio::task::spawn_blocking(move || {
            driver::read_celsius(handle.as_ref(), board, channel, thermocouple_type)
        });

        let result = match tokio::time::timeout(timeout, task).await {
            Ok(joined) => joined.map_err(ThermoError::from).and_then(|r| r),
            Err(_) => Err(ThermoError::Timeout {
                board,
                channel,
                timeout,
            }),
        };
        self.record(result)
    }

    /// Valid samples, oldest first.
    pub fn samples(&self) -> &[f64] {
        self.buffer.samples()
    }

    /// Full backing storage, including the unfilled tail.
    pub fn backing_storage(&self) -> &[f64] {
        self.buffer.backing_storage()
    }

    /// Number of valid samples.
    pub fn fill_count(&self) -> usize {
        self.buffer.len()
    }

    /// Maximum number of samples kept.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.buffer.latest()
    }

    /// The sample buffer.
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Text of this session's most recent failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The locked configuration.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// End the session, returning the (still locked) configuration.
    pub fn into_config(self) -> ChannelConfig {
        self.config
    }

    fn record(&mut self, result: Result<f64>) -> Result<f64> {
        match result {
            Ok(value) => {
                self.buffer.push(value);
                debug!(id = %self.config.id(), value, fill = self.buffer.len(), "Stored temperature sample");
                Ok(value)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for AcquisitionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcquisitionSession")
            .field("config", &self.config)
            .field("fill", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .field("last_error", &self.last_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{ErrorCode, MockDriver};
    use std::time::Duration;

    #[test]
    fn test_open_locks_config() {
        let driver = Arc::new(MockDriver::new());
        let session = AcquisitionSession::open(ChannelConfig::new(), driver.clone()).unwrap();
        assert!(session.config().is_locked());
        assert_eq!(session.fill_count(), 0);
        assert_eq!(session.capacity(), 1000);
        assert_eq!(driver.declare_revision_calls(), 1);
    }

    #[test]
    fn test_open_rejects_locked_config() {
        let driver = Arc::new(MockDriver::new());
        let session = AcquisitionSession::open(ChannelConfig::new(), driver.clone()).unwrap();
        let config = session.into_config();
        let err = AcquisitionSession::open(config, driver).unwrap_err();
        assert!(err.is_already_registered());
    }

    #[test]
    fn test_read_failure_is_recorded_per_session() {
        let driver = Arc::new(MockDriver::with_readings([20.0]));
        let mut a = AcquisitionSession::open(ChannelConfig::new(), driver.clone()).unwrap();
        let b = AcquisitionSession::open(ChannelConfig::new(), driver.clone()).unwrap();

        driver.fail_next_read(ErrorCode(30));
        assert!(a.read().is_err());
        assert!(a.last_error().unwrap_or_default().contains("30"));
        assert_eq!(b.last_error(), None);

        assert_eq!(a.read().unwrap(), 20.0);
        assert_eq!(a.samples(), &[20.0]);
        assert!(a.last_error().is_some());
    }

    #[tokio::test]
    async fn test_read_with_timeout_success() {
        let driver = Arc::new(MockDriver::with_readings([18.5, 19.0]));
        let mut session = AcquisitionSession::open(ChannelConfig::new(), driver).unwrap();
        assert_eq!(session.read_with_timeout().await.unwrap(), 18.5);
        assert_eq!(session.read_with_timeout().await.unwrap(), 19.0);
        assert_eq!(session.samples(), &[18.5, 19.0]);
    }

    #[tokio::test]
    async fn test_read_with_timeout_expires() {
        let driver = Arc::new(MockDriver::with_readings([18.5]));
        driver.set_read_delay(Duration::from_millis(500));
        let config = ChannelConfig::new()
            .with_timeout(Duration::from_millis(20))
            .unwrap();
        let mut session = AcquisitionSession::open(config, driver).unwrap();

        let err = session.read_with_timeout().await.unwrap_err();
        assert!(matches!(err, ThermoError::Timeout { .. }));
        assert_eq!(session.fill_count(), 0);
        assert!(session.last_error().unwrap_or_default().contains("timed out"));
    }
}
