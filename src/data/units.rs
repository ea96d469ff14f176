//! Unit conversions
//!
//! Aggregated data is always stored in Celsius and km/h; picking Fahrenheit is
//! a display-time choice.

use serde::{Deserialize, Serialize};

/// Converts metres per second to kilometres per hour
pub fn to_kph(mps: f64) -> f64 {
    mps * 3.6
}

/// Converts Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Temperature unit selected for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggle(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    /// Converts a Celsius value into this unit
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Formats a Celsius value rounded to whole degrees, e.g. `"72°F"`
    /// Halves round away from zero and a rounded `-0` prints as `0`.
    pub fn format(self, celsius: f64) -> String {
        let rounded = self.convert(celsius).round();
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        format!("{}{}", rounded, self.symbol())
    }
}
