//! Universal Library Hardware Smoke Test
//!
//! Reads from a real board through the vendor library.
//!
//! # Environment Variables
//!
//! Required:
//! - `MCCUL_SMOKE_TEST=1` - Enable the test suite
//!
//! Optional:
//! - `MCCUL_BOARD` - Board number (default: 0)
//! - `MCCUL_CHANNEL` - Channel number (default: 0)
//! - `MCCUL_TC_TYPE` - Thermocouple type name or driver code (default: K)
//!
//! # Running
//!
//! ```bash
//! export MCCUL_SMOKE_TEST=1
//! cargo test --features hardware_tests --test hardware_smoke
//! ```

#![cfg(feature = "hardware_tests")]

use std::env;
use std::sync::Arc;

use daq_thermocouple::{
    ChannelConfig, ErrorCode, Registry, ThermocoupleDriver, ThermocoupleType, UniversalLibrary,
};

fn smoke_test_enabled() -> bool {
    env::var("MCCUL_SMOKE_TEST")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

macro_rules! skip_if_disabled {
    () => {
        if !smoke_test_enabled() {
            println!("Universal Library smoke test skipped (set MCCUL_SMOKE_TEST=1 to enable)");
            return;
        }
    };
}

#[test]
fn read_ten_samples() {
    skip_if_disabled!();

    let tc_type = env::var("MCCUL_TC_TYPE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(ThermocoupleType::K);

    let mut config = ChannelConfig::new()
        .with_board(env_i32("MCCUL_BOARD", 0))
        .and_then(|c| c.with_channel(env_i32("MCCUL_CHANNEL", 0)))
        .and_then(|c| c.with_thermocouple_type(tc_type))
        .and_then(|c| c.with_buffer_capacity(5))
        .expect("valid config");

    let mut registry = Registry::new(Arc::new(UniversalLibrary::new()));
    registry.register(&mut config).expect("driver setup");

    for _ in 0..10 {
        let celsius = registry.read(&config).expect("temperature read");
        println!("{:.2} °C", celsius);
        assert!(celsius.is_finite());
    }
    assert_eq!(registry.fill_count(&config), 5);
}

#[test]
fn error_message_lookup() {
    skip_if_disabled!();

    let ul = UniversalLibrary::new();
    // Code 1 is BADBOARD in every library revision
    let message = ul.error_message(ErrorCode(1));
    println!("Error 1: {}", message);
    assert!(!message.is_empty());
}
