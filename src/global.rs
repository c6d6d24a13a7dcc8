//! Process-wide registry.
//!
//! A single [`Registry`] shared by the whole process, created on first use
//! with the [`UniversalLibrary`] driver. Access is serialized by a mutex, and
//! inspection functions return owned copies because the data cannot be
//! borrowed past the lock. The last error is shared by every caller.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config::ChannelConfig;
use crate::driver::{ThermocoupleDriver, UniversalLibrary};
use crate::error::Result;
use crate::registry::Registry;

static REGISTRY: Lazy<Mutex<Registry>> =
    Lazy::new(|| Mutex::new(Registry::new(Arc::new(UniversalLibrary::new()))));

/// Replace the driver behind the process-wide registry.
///
/// Existing registrations and buffers are kept.
pub fn install_driver(driver: Arc<dyn ThermocoupleDriver>) {
    REGISTRY.lock().set_driver(driver);
}

/// Register `config` with the process-wide registry.
pub fn register(config: &mut ChannelConfig) -> Result<()> {
    REGISTRY.lock().register(config)
}

/// Read one sample for `config` into the process-wide registry.
pub fn read(config: &ChannelConfig) -> Result<f64> {
    REGISTRY.lock().read(config)
}

/// Copy of the valid samples for `config`. Empty if not registered.
pub fn samples(config: &ChannelConfig) -> Vec<f64> {
    REGISTRY.lock().samples(config).to_vec()
}

/// Copy of the full backing storage for `config`. Empty if not registered.
pub fn backing_storage(config: &ChannelConfig) -> Vec<f64> {
    REGISTRY.lock().backing_storage(config).to_vec()
}

/// Number of valid samples for `config`. Zero if not registered.
pub fn fill_count(config: &ChannelConfig) -> usize {
    REGISTRY.lock().fill_count(config)
}

/// Whether `config` is registered process-wide.
pub fn is_registered(config: &ChannelConfig) -> bool {
    REGISTRY.lock().is_registered(config)
}

/// Drop the buffer bound to `config`. Returns whether an entry existed.
pub fn release(config: &ChannelConfig) -> bool {
    REGISTRY.lock().release(config)
}

/// Text of the most recent failure of any caller.
pub fn last_error() -> Option<String> {
    REGISTRY.lock().last_error().map(str::to_owned)
}
