//! Buffered thermocouple reading example.
//!
//! Loads channel settings, registers every channel and takes a few readings
//! from each. Without the `hardware` feature the scripted mock driver is
//! used, so the example runs anywhere.
//!
//! # Usage
//!
//! ```bash
//! # Dry run with the mock driver
//! cargo run --example single_read -- config/thermocouple.toml
//!
//! # Against a real board
//! cargo run --features hardware --example single_read -- config/thermocouple.toml
//! ```

use std::env;
use std::sync::Arc;

use daq_thermocouple::settings::{AcquisitionSettings, DEFAULT_SETTINGS_PATH};
use daq_thermocouple::{logging, ChannelConfig, Registry, TemperatureScale, ThermocoupleDriver};

#[cfg(feature = "hardware")]
fn driver() -> Arc<dyn ThermocoupleDriver> {
    Arc::new(daq_thermocouple::UniversalLibrary::new())
}

#[cfg(not(feature = "hardware"))]
fn driver() -> Arc<dyn ThermocoupleDriver> {
    let mock = daq_thermocouple::MockDriver::with_readings([21.0, 21.4, 21.9, 22.3]);
    mock.set_ambient(22.5);
    Arc::new(mock)
}

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());

    let settings = AcquisitionSettings::load_from(&path)?;
    settings.validate()?;
    logging::init_from_settings(&settings)?;

    let mut configs = settings.channel_configs()?;
    if configs.is_empty() {
        println!("No channels in {}, using board 0 channel 0", path);
        configs.push(ChannelConfig::new().with_buffer_capacity(5)?);
    }

    let unit = TemperatureScale::Celsius.unit();
    let mut registry = Registry::with_setup(driver(), settings.driver);
    for config in configs.iter_mut() {
        registry.register(config)?;
    }

    for config in &configs {
        for _ in 0..6 {
            if let Err(e) = registry.read(config) {
                println!("  read failed: {}", e);
            }
        }
        println!(
            "Board {} CH{} ({}): {} of {} samples",
            config.board(),
            config.channel(),
            config.thermocouple_type(),
            registry.fill_count(config),
            config.buffer_capacity()
        );
        for (i, celsius) in registry.samples(config).iter().enumerate() {
            println!("  [{}] {:+.2} {}", i, celsius, unit);
        }
    }

    if let Some(err) = registry.last_error() {
        println!("\nLast error: {}", err);
    }

    Ok(())
}
