//! Identity-keyed sample buffer registry.
//!
//! A [`Registry`] binds [`ChannelConfig`]s to [`SampleBuffer`]s. Registration
//! allocates the buffer, performs driver setup and locks the configuration;
//! each read appends one sample to that configuration's buffer. Failures are
//! returned as errors and their text is kept as the registry's last error,
//! which later successes do not clear.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::buffer::SampleBuffer;
use crate::config::{ChannelConfig, ConfigId};
use crate::driver::{self, DriverSetup, ThermocoupleDriver};
use crate::error::{Result, ThermoError};

/// Sample buffers for registered configurations, plus the last error.
pub struct Registry {
    driver: Arc<dyn ThermocoupleDriver>,
    setup: DriverSetup,
    buffers: HashMap<ConfigId, SampleBuffer>,
    last_error: Option<String>,
}

impl Registry {
    /// Create an empty registry using the default driver setup.
    pub fn new(driver: Arc<dyn ThermocoupleDriver>) -> Self {
        Self::with_setup(driver, DriverSetup::default())
    }

    /// Create an empty registry with an explicit driver setup.
    pub fn with_setup(driver: Arc<dyn ThermocoupleDriver>, setup: DriverSetup) -> Self {
        Self {
            driver,
            setup,
            buffers: HashMap::new(),
            last_error: None,
        }
    }

    /// Bind `config` to a new buffer, set up the driver and lock `config`.
    ///
    /// Fails if this configuration is already registered; the existing buffer
    /// is left as it was. If driver setup fails the buffer is released again
    /// and `config` stays unlocked.
    pub fn register(&mut self, config: &mut ChannelConfig) -> Result<()> {
        let id = config.id();
        if self.buffers.contains_key(&id) {
            return self.fail(ThermoError::AlreadyRegistered { id });
        }

        let buffer = match SampleBuffer::new(config.buffer_capacity()) {
            Ok(buffer) => buffer,
            Err(err) => return self.fail(err),
        };
        self.buffers.insert(id, buffer);

        if let Err(err) = self.setup.apply(self.driver.as_ref()) {
            self.buffers.remove(&id);
            return self.fail(err);
        }

        config.lock();
        info!(
            %id,
            board = config.board(),
            channel = config.channel(),
            thermocouple = %config.thermocouple_type(),
            capacity = config.buffer_capacity(),
            "Registered thermocouple channel"
        );
        Ok(())
    }

    /// Read one sample for `config` and append it to its buffer.
    ///
    /// The configured timeout is not applied here; use
    /// [`AcquisitionSession::read_with_timeout`](crate::AcquisitionSession::read_with_timeout)
    /// when the read must be bounded.
    pub fn read(&mut self, config: &ChannelConfig) -> Result<f64> {
        let id = config.id();
        if !self.buffers.contains_key(&id) {
            return self.fail(ThermoError::NotRegistered { id });
        }

        let value = match driver::read_celsius(
            self.driver.as_ref(),
            config.board(),
            config.channel(),
            config.thermocouple_type(),
        ) {
            Ok(value) => value,
            Err(err) => return self.fail(err),
        };

        if let Some(buffer) = self.buffers.get_mut(&id) {
            buffer.push(value);
            debug!(%id, value, fill = buffer.len(), "Stored temperature sample");
        }
        Ok(value)
    }

    /// Valid samples for `config`, oldest first. Empty if not registered.
    pub fn samples(&self, config: &ChannelConfig) -> &[f64] {
        self.buffers
            .get(&config.id())
            .map(SampleBuffer::samples)
            .unwrap_or(&[])
    }

    /// Full backing storage for `config`, including the unfilled tail.
    /// Empty if not registered.
    pub fn backing_storage(&self, config: &ChannelConfig) -> &[f64] {
        self.buffers
            .get(&config.id())
            .map(SampleBuffer::backing_storage)
            .unwrap_or(&[])
    }

    /// Number of valid samples for `config`. Zero if not registered.
    pub fn fill_count(&self, config: &ChannelConfig) -> usize {
        self.buffers
            .get(&config.id())
            .map(SampleBuffer::len)
            .unwrap_or(0)
    }

    /// Buffer bound to `config`, if registered.
    pub fn buffer(&self, config: &ChannelConfig) -> Option<&SampleBuffer> {
        self.buffers.get(&config.id())
    }

    /// Whether `config` is registered here.
    pub fn is_registered(&self, config: &ChannelConfig) -> bool {
        self.buffers.contains_key(&config.id())
    }

    /// Drop the buffer bound to `config`. The configuration stays locked.
    ///
    /// Returns whether an entry existed.
    pub fn release(&mut self, config: &ChannelConfig) -> bool {
        let removed = self.buffers.remove(&config.id()).is_some();
        if removed {
            debug!(id = %config.id(), "Released thermocouple channel");
        }
        removed
    }

    /// Number of registered configurations.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Text of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Driver setup applied at registration.
    pub fn setup(&self) -> &DriverSetup {
        &self.setup
    }

    /// Replace the driver used for subsequent calls.
    pub fn set_driver(&mut self, driver: Arc<dyn ThermocoupleDriver>) {
        self.driver = driver;
    }

    fn fail<T>(&mut self, err: ThermoError) -> Result<T> {
        self.last_error = Some(err.to_string());
        Err(err)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.buffers.len())
            .field("setup", &self.setup)
            .field("last_error", &self.last_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{ErrorCode, MockDriver};

    fn registry_with(driver: &Arc<MockDriver>) -> Registry {
        Registry::new(driver.clone())
    }

    #[test]
    fn test_register_allocates_and_locks() {
        let driver = Arc::new(MockDriver::new());
        let mut registry = registry_with(&driver);
        let mut config = ChannelConfig::new().with_buffer_capacity(4).unwrap();

        registry.register(&mut config).unwrap();

        assert!(config.is_locked());
        assert!(registry.is_registered(&config));
        assert_eq!(registry.fill_count(&config), 0);
        assert_eq!(registry.backing_storage(&config), &[0.0; 4]);
        assert!(registry.samples(&config).is_empty());
        assert_eq!(driver.declare_revision_calls(), 1);
        assert_eq!(driver.error_handling_calls(), 1);
    }

    #[test]
    fn test_release_drops_entry() {
        let driver = Arc::new(MockDriver::with_readings([1.0]));
        let mut registry = registry_with(&driver);
        let mut config = ChannelConfig::new();
        registry.register(&mut config).unwrap();
        registry.read(&config).unwrap();

        assert!(registry.release(&config));
        assert!(!registry.release(&config));
        assert!(registry.is_empty());
        assert_eq!(registry.fill_count(&config), 0);
        assert!(config.is_locked());
    }

    #[test]
    fn test_last_error_survives_success() {
        let driver = Arc::new(MockDriver::with_readings([1.0]));
        let mut registry = registry_with(&driver);
        let unregistered = ChannelConfig::new();
        let mut config = ChannelConfig::new();

        assert!(registry.read(&unregistered).is_err());
        let first = registry.last_error().map(str::to_owned);
        assert!(first.is_some());

        registry.register(&mut config).unwrap();
        registry.read(&config).unwrap();
        assert_eq!(registry.last_error().map(str::to_owned), first);
    }

    #[test]
    fn test_error_handling_failure_rolls_back() {
        let driver = Arc::new(MockDriver::new());
        driver.fail_next_error_handling(ErrorCode(5));
        let mut registry = registry_with(&driver);
        let mut config = ChannelConfig::new();

        let err = registry.register(&mut config).unwrap_err();
        assert_eq!(err.driver_code(), Some(5));
        assert!(!config.is_locked());
        assert!(!registry.is_registered(&config));
        assert!(registry.last_error().unwrap_or_default().contains("cbErrHandling"));
    }
}
