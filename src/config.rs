//! Channel configuration with a registration lock.
//!
//! A [`ChannelConfig`] describes one temperature input: which board and
//! channel to read, what sensor is attached, how many samples to keep and how
//! long a read may take. Once the configuration is registered it is locked and
//! every setter fails with [`ThermoError::ConfigLocked`], leaving the stored
//! value untouched.
//!
//! Configurations are keyed by identity, not by value. Each one gets a fresh
//! [`ConfigId`] on construction, so two configurations with identical fields
//! register independently.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{Result, ThermoError};
use crate::thermocouple::ThermocoupleType;

/// Default number of samples kept per channel.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;

/// Largest accepted buffer capacity (128 MiB of samples).
pub const MAX_BUFFER_CAPACITY: usize = 1 << 24;

/// Default driver timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

static NEXT_CONFIG_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`ChannelConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId(u64);

impl ConfigId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONFIG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameter set for one thermocouple channel.
///
/// Not `Clone`: a copy would either share the identity of the original or
/// silently become a different registry key.
#[derive(Debug)]
pub struct ChannelConfig {
    id: ConfigId,
    board: i32,
    channel: i32,
    thermocouple_type: ThermocoupleType,
    buffer_capacity: usize,
    timeout: Duration,
    locked: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelConfig {
    /// Create a configuration with default values and a fresh identity.
    pub fn new() -> Self {
        Self {
            id: ConfigId::next(),
            board: 0,
            channel: 0,
            thermocouple_type: ThermocoupleType::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            locked: false,
        }
    }

    /// Identity used as the registry key.
    pub fn id(&self) -> ConfigId {
        self.id
    }

    /// Board number as known to the driver.
    pub fn board(&self) -> i32 {
        self.board
    }

    /// Channel number on the board.
    pub fn channel(&self) -> i32 {
        self.channel
    }

    /// Attached sensor type.
    pub fn thermocouple_type(&self) -> ThermocoupleType {
        self.thermocouple_type
    }

    /// Number of samples kept before the oldest is evicted.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Maximum time a single read may take.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the configuration has been registered.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Set the board number. Not range-checked.
    pub fn set_board(&mut self, board: i32) -> Result<()> {
        self.ensure_unlocked("board")?;
        self.board = board;
        Ok(())
    }

    /// Set the channel number. Not range-checked.
    pub fn set_channel(&mut self, channel: i32) -> Result<()> {
        self.ensure_unlocked("channel")?;
        self.channel = channel;
        Ok(())
    }

    /// Set the sensor type.
    pub fn set_thermocouple_type(&mut self, thermocouple_type: ThermocoupleType) -> Result<()> {
        self.ensure_unlocked("thermocouple_type")?;
        self.thermocouple_type = thermocouple_type;
        Ok(())
    }

    /// Set the number of samples kept. Must be between one and
    /// [`MAX_BUFFER_CAPACITY`].
    pub fn set_buffer_capacity(&mut self, capacity: usize) -> Result<()> {
        self.ensure_unlocked("buffer_capacity")?;
        if capacity == 0 {
            return Err(ThermoError::invalid_config(
                "buffer_capacity must be at least 1",
            ));
        }
        if capacity > MAX_BUFFER_CAPACITY {
            return Err(ThermoError::invalid_config(format!(
                "buffer_capacity must be at most {}",
                MAX_BUFFER_CAPACITY
            )));
        }
        self.buffer_capacity = capacity;
        Ok(())
    }

    /// Set the read timeout. Must be non-zero.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.ensure_unlocked("timeout")?;
        if timeout.is_zero() {
            return Err(ThermoError::invalid_config("timeout must be positive"));
        }
        self.timeout = timeout;
        Ok(())
    }

    /// Set the read timeout in seconds. Must be finite and positive.
    pub fn set_timeout_secs(&mut self, seconds: f64) -> Result<()> {
        self.ensure_unlocked("timeout")?;
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(ThermoError::invalid_config(format!(
                "timeout must be a positive number of seconds, got {}",
                seconds
            )));
        }
        let timeout = Duration::try_from_secs_f64(seconds)
            .map_err(|e| ThermoError::invalid_config(format!("timeout {}: {}", seconds, e)))?;
        self.timeout = timeout;
        Ok(())
    }

    /// Builder-style board setter for unregistered configurations.
    pub fn with_board(mut self, board: i32) -> Result<Self> {
        self.set_board(board)?;
        Ok(self)
    }

    /// Builder-style channel setter for unregistered configurations.
    pub fn with_channel(mut self, channel: i32) -> Result<Self> {
        self.set_channel(channel)?;
        Ok(self)
    }

    /// Builder-style sensor type setter for unregistered configurations.
    pub fn with_thermocouple_type(mut self, thermocouple_type: ThermocoupleType) -> Result<Self> {
        self.set_thermocouple_type(thermocouple_type)?;
        Ok(self)
    }

    /// Builder-style capacity setter for unregistered configurations.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Result<Self> {
        self.set_buffer_capacity(capacity)?;
        Ok(self)
    }

    /// Builder-style timeout setter for unregistered configurations.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.set_timeout(timeout)?;
        Ok(self)
    }

    /// Lock the configuration. Locking is one-way.
    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    fn ensure_unlocked(&self, field: &'static str) -> Result<()> {
        if self.locked {
            return Err(ThermoError::ConfigLocked { id: self.id, field });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChannelConfig::new();
        assert_eq!(config.board(), 0);
        assert_eq!(config.channel(), 0);
        assert_eq!(config.thermocouple_type(), ThermocoupleType::J);
        assert_eq!(config.buffer_capacity(), 1000);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.is_locked());
    }

    #[test]
    fn test_identities_are_unique() {
        let a = ChannelConfig::new();
        let b = ChannelConfig::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_negative_board_and_channel_accepted() {
        let mut config = ChannelConfig::new();
        config.set_board(-1).unwrap();
        config.set_channel(-7).unwrap();
        assert_eq!(config.board(), -1);
        assert_eq!(config.channel(), -7);
    }

    #[test]
    fn test_setters_fail_after_lock() {
        let mut config = ChannelConfig::new()
            .with_board(2)
            .and_then(|c| c.with_channel(3))
            .and_then(|c| c.with_thermocouple_type(ThermocoupleType::K))
            .and_then(|c| c.with_buffer_capacity(5))
            .and_then(|c| c.with_timeout(Duration::from_secs(2)))
            .unwrap();
        config.lock();

        assert!(config.set_board(9).unwrap_err().is_locked());
        assert!(config.set_channel(9).unwrap_err().is_locked());
        assert!(config
            .set_thermocouple_type(ThermocoupleType::T)
            .unwrap_err()
            .is_locked());
        assert!(config.set_buffer_capacity(9).unwrap_err().is_locked());
        assert!(config.set_timeout(Duration::from_secs(9)).unwrap_err().is_locked());
        assert!(config.set_timeout_secs(9.0).unwrap_err().is_locked());

        assert_eq!(config.board(), 2);
        assert_eq!(config.channel(), 3);
        assert_eq!(config.thermocouple_type(), ThermocoupleType::K);
        assert_eq!(config.buffer_capacity(), 5);
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_locked_error_names_field() {
        let mut config = ChannelConfig::new();
        config.lock();
        let err = config.set_channel(1).unwrap_err();
        assert!(err.to_string().contains("channel"));
        assert!(err.to_string().contains("in use"));
    }

    #[test]
    fn test_capacity_and_timeout_validation() {
        let mut config = ChannelConfig::new();
        assert!(config.set_buffer_capacity(0).is_err());
        assert!(config.set_buffer_capacity(MAX_BUFFER_CAPACITY + 1).is_err());
        assert!(config.set_buffer_capacity(usize::MAX).is_err());
        assert!(config.set_timeout(Duration::ZERO).is_err());
        assert!(config.set_timeout_secs(-1.0).is_err());
        assert!(config.set_timeout_secs(f64::NAN).is_err());
        assert!(config.set_timeout_secs(f64::INFINITY).is_err());
        assert_eq!(config.buffer_capacity(), DEFAULT_BUFFER_CAPACITY);

        config.set_timeout_secs(0.25).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }
}
