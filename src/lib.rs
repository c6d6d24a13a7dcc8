//! Buffered thermocouple acquisition over the Measurement Computing
//! Universal Library.
//!
//! This crate wraps the three vendor calls needed to read temperatures
//! (revision declaration, error-handling setup and single-sample read) from
//! the low-level `mcc-ul-sys` bindings, and keeps a bounded history of
//! readings per channel.
//!
//! # Architecture
//!
//! ## Configuration
//! - [`ChannelConfig`] - Board, channel, sensor type, buffer capacity and
//!   timeout; locked once registered
//! - [`settings::AcquisitionSettings`] - Figment-loaded TOML/env settings
//!
//! ## Acquisition
//! - [`Registry`] - Identity-keyed buffers for many configurations, with a
//!   shared last error
//! - [`AcquisitionSession`] - One channel, owned buffer and last error,
//!   optional timeout enforcement
//! - [`global`] - Process-wide registry backed by the Universal Library
//! - [`SampleBuffer`] - Fixed-capacity history with FIFO eviction
//!
//! ## Drivers
//! - [`ThermocoupleDriver`] - The vendor call contract
//! - [`UniversalLibrary`] - Real library via FFI
//! - [`MockDriver`] - Scripted stand-in for tests and dry runs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use daq_thermocouple::{ChannelConfig, Registry, ThermocoupleType, UniversalLibrary};
//!
//! # fn example() -> daq_thermocouple::Result<()> {
//! let mut registry = Registry::new(Arc::new(UniversalLibrary::new()));
//!
//! let mut config = ChannelConfig::new();
//! config.set_channel(3)?;
//! config.set_thermocouple_type(ThermocoupleType::K)?;
//! config.set_buffer_capacity(100)?;
//!
//! registry.register(&mut config)?;
//! for _ in 0..10 {
//!     registry.read(&config)?;
//! }
//! println!("{:?}", registry.samples(&config));
//!
//! // Registered configurations are locked
//! assert!(config.set_channel(4).is_err());
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod config;
pub mod driver;
pub mod error;
pub mod global;
pub mod logging;
pub mod registry;
pub mod session;
pub mod settings;
pub mod thermocouple;

pub use buffer::SampleBuffer;
pub use config::{
    ChannelConfig, ConfigId, DEFAULT_BUFFER_CAPACITY, DEFAULT_TIMEOUT_SECS, MAX_BUFFER_CAPACITY,
};
pub use driver::{
    DriverSetup, ErrorCode, ErrorHandling, ErrorReporting, MockDriver, ThermocoupleDriver,
    UniversalLibrary,
};
pub use error::{DriverCall, Result, ThermoError};
pub use registry::Registry;
pub use session::AcquisitionSession;
pub use thermocouple::{TemperatureScale, ThermocoupleType};
