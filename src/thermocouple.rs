//! Sensor and unit codes understood by the driver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThermoError;

/// Sensor type attached to a temperature input channel.
///
/// The code is passed to the driver in the options word of the read call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThermocoupleType {
    /// Type J (iron / constantan).
    #[default]
    J,
    /// Type K (chromel / alumel).
    K,
    /// Type T (copper / constantan).
    T,
    /// Type E (chromel / constantan).
    E,
    /// Type R (platinum-rhodium 13% / platinum).
    R,
    /// Type S (platinum-rhodium 10% / platinum).
    S,
    /// Type B (platinum-rhodium 30% / 6%).
    B,
    /// Type N (nicrosil / nisil).
    N,
    /// Thermistor input.
    Thermistor,
    /// Semiconductor sensor input.
    SemiCond,
}

impl ThermocoupleType {
    /// All supported sensor types, in driver code order.
    pub const ALL: [ThermocoupleType; 10] = [
        Self::J,
        Self::K,
        Self::T,
        Self::E,
        Self::R,
        Self::S,
        Self::B,
        Self::N,
        Self::Thermistor,
        Self::SemiCond,
    ];

    /// Driver code for this sensor type.
    pub fn code(self) -> i32 {
        match self {
            Self::J => 1,
            Self::K => 2,
            Self::T => 3,
            Self::E => 4,
            Self::R => 5,
            Self::S => 6,
            Self::B => 7,
            Self::N => 8,
            Self::Thermistor => 9,
            Self::SemiCond => 10,
        }
    }

    /// Convert from a raw driver code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for ThermocoupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::J => write!(f, "J"),
            Self::K => write!(f, "K"),
            Self::T => write!(f, "T"),
            Self::E => write!(f, "E"),
            Self::R => write!(f, "R"),
            Self::S => write!(f, "S"),
            Self::B => write!(f, "B"),
            Self::N => write!(f, "N"),
            Self::Thermistor => write!(f, "Thermistor"),
            Self::SemiCond => write!(f, "SemiCond"),
        }
    }
}

impl FromStr for ThermocoupleType {
    type Err = ThermoError;

    /// Accepts a type name in any case, or its numeric driver code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = match s.parse::<i32>() {
            Ok(code) => Self::from_code(code),
            Err(_) => Self::ALL
                .into_iter()
                .find(|t| t.to_string().eq_ignore_ascii_case(s)),
        };
        found.ok_or_else(|| ThermoError::invalid_config(format!("Unknown thermocouple type '{}'", s)))
    }
}

/// Unit scale requested from the driver.
///
/// Acquisition always asks for Celsius; the other scales exist so raw codes
/// can be named in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureScale {
    /// Degrees Celsius.
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
    /// Kelvin.
    Kelvin,
}

impl TemperatureScale {
    /// Driver code for this scale.
    pub fn code(self) -> i32 {
        match self {
            Self::Celsius => mcc_ul_sys::CELSIUS as i32,
            Self::Fahrenheit => mcc_ul_sys::FAHRENHEIT as i32,
            Self::Kelvin => mcc_ul_sys::KELVIN as i32,
        }
    }

    /// Unit symbol.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Kelvin => "K",
        }
    }
}
