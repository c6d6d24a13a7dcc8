//! Acquisition settings loaded with Figment.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables prefixed with `THERMO_DAQ_` (nested keys separated by `__`).
//!
//! # Example
//!
//! ```toml
//! [driver]
//! revision = 6.73
//! reporting = "dont_print"
//! handling = "dont_stop"
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//!
//! [[channels]]
//! board = 0
//! channel = 0
//! thermocouple_type = "K"
//! buffer_capacity = 600
//! timeout_secs = 2.5
//! ```
//!
//! ```no_run
//! use daq_thermocouple::settings::AcquisitionSettings;
//!
//! let settings = AcquisitionSettings::load_from("config/thermocouple.toml")?;
//! settings.validate()?;
//! let configs = settings.channel_configs()?;
//! # Ok::<(), daq_thermocouple::ThermoError>(())
//! ```

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::config::{
    ChannelConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_TIMEOUT_SECS, MAX_BUFFER_CAPACITY,
};
use crate::driver::DriverSetup;
use crate::error::{Result, ThermoError};
use crate::logging::LoggingSettings;
use crate::thermocouple::ThermocoupleType;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "THERMO_DAQ_";

/// Default settings file location.
pub const DEFAULT_SETTINGS_PATH: &str = "config/thermocouple.toml";

/// Top-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionSettings {
    /// Driver setup performed at registration
    pub driver: DriverSetup,
    /// Tracing subscriber settings
    pub logging: LoggingSettings,
    /// Channels to acquire from
    pub channels: Vec<ChannelSettings>,
}

/// Settings for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Board number
    #[serde(default)]
    pub board: i32,
    /// Channel number
    #[serde(default)]
    pub channel: i32,
    /// Attached sensor
    #[serde(default)]
    pub thermocouple_type: ThermocoupleType,
    /// Samples kept before eviction
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Read timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_timeout_secs() -> f64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            board: 0,
            channel: 0,
            thermocouple_type: ThermocoupleType::default(),
            buffer_capacity: default_buffer_capacity(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ChannelSettings {
    /// Build an unlocked configuration from these settings.
    pub fn to_config(&self) -> Result<ChannelConfig> {
        let mut config = ChannelConfig::new()
            .with_board(self.board)?
            .with_channel(self.channel)?
            .with_thermocouple_type(self.thermocouple_type)?
            .with_buffer_capacity(self.buffer_capacity)?;
        config.set_timeout_secs(self.timeout_secs)?;
        Ok(config)
    }
}

impl AcquisitionSettings {
    /// Load from [`DEFAULT_SETTINGS_PATH`] and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_SETTINGS_PATH)
    }

    /// Load from a specific file and the environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Self::figment(Toml::file(path.as_ref())).extract()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string, then apply the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Self::figment(Toml::string(toml)).extract()?;
        Ok(settings)
    }

    fn figment(source: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(source)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;

        if !(self.driver.revision.is_finite() && self.driver.revision > 0.0) {
            return Err(ThermoError::invalid_config(format!(
                "driver.revision must be positive, got {}",
                self.driver.revision
            )));
        }

        for (index, channel) in self.channels.iter().enumerate() {
            if channel.buffer_capacity == 0 || channel.buffer_capacity > MAX_BUFFER_CAPACITY {
                return Err(ThermoError::invalid_config(format!(
                    "channels[{}].buffer_capacity must be between 1 and {}, got {}",
                    index, MAX_BUFFER_CAPACITY, channel.buffer_capacity
                )));
            }
            if !(channel.timeout_secs.is_finite() && channel.timeout_secs > 0.0) {
                return Err(ThermoError::invalid_config(format!(
                    "channels[{}].timeout_secs must be positive, got {}",
                    index, channel.timeout_secs
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for channel in &self.channels {
            if !seen.insert((channel.board, channel.channel)) {
                return Err(ThermoError::invalid_config(format!(
                    "Duplicate channel: board {} channel {}",
                    channel.board, channel.channel
                )));
            }
        }

        Ok(())
    }

    /// Build one unlocked configuration per configured channel.
    pub fn channel_configs(&self) -> Result<Vec<ChannelConfig>> {
        self.channels.iter().map(ChannelSettings::to_config).collect()
    }
}
