//! Core data models for weatherdash
//!
//! This module contains the data types shared by the provider clients, the
//! forecast aggregator and the UI: raw forecast samples, the aggregated hourly
//! and daily entries, current conditions and geographic coordinates.

pub mod aggregate;
pub mod bucketing;
pub mod geocode;
pub mod icons;
pub mod location;
pub mod units;
pub mod weather;

pub use aggregate::{
    aggregate, AggregateError, AggregatedForecast, ForecastLimits, DEFAULT_DAILY_LIMIT,
    DEFAULT_HOURLY_LIMIT,
};
pub use bucketing::day_key;
pub use geocode::{GeocodingClient, GeocodingResult};
pub use icons::{icon_symbol, IconCode};
pub use location::{LocationError, Locator};
pub use units::{celsius_to_fahrenheit, to_kph, TemperatureUnit};
pub use weather::{LocationQuery, WeatherClient, WeatherError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fallback condition text when the provider omits a description
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// A geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Short label used when no place name is known, e.g. `"48.8566, 2.3522"`
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One point-in-time reading from the flat forecast feed
///
/// The timestamp is kept in provider form (unix seconds) and only resolved to
/// an instant by the aggregator, which rejects values that don't map to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp in seconds (UTC)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Human-readable condition, if the provider sent one
    pub condition_text: Option<String>,
    /// Provider icon code such as `"10d"`, if the provider sent one
    pub icon_code: Option<String>,
    /// Relative humidity percentage (0-100)
    pub humidity_pct: u8,
    /// Wind speed in metres per second
    pub wind_speed_mps: f64,
    /// Probability of precipitation (0.0-1.0)
    pub precip_probability: f64,
}

impl Sample {
    pub(crate) fn condition_or_unknown(&self) -> String {
        self.condition_text
            .clone()
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string())
    }

    pub(crate) fn icon_or_empty(&self) -> String {
        self.icon_code.clone().unwrap_or_default()
    }
}

/// Sunrise and sunset for the queried location
///
/// Sourced once per forecast from the location metadata and shared by every
/// daily entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise_utc: DateTime<Utc>,
    pub sunset_utc: DateTime<Utc>,
}

/// A single hourly forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub date_time_utc: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature_c: f64,
    pub condition_text: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    /// Wind speed in km/h
    pub wind_speed_kph: f64,
    /// Chance of rain as a percentage (0-100)
    pub chance_of_rain_pct: f64,
}

/// A single day of the daily roll-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// UTC calendar date, `YYYY-MM-DD`
    pub date_key: String,
    pub max_temperature_c: f64,
    pub min_temperature_c: f64,
    pub condition_text: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    /// Wind speed in km/h
    pub wind_speed_kph: f64,
    /// Highest chance of rain over the day as a percentage (0-100)
    pub chance_of_rain_pct: f64,
    pub sunrise_utc: DateTime<Utc>,
    pub sunset_utc: DateTime<Utc>,
}

impl DailyEntry {
    /// Parses the day key back into a calendar date
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_key, "%Y-%m-%d").ok()
    }
}

/// Current weather conditions at the queried location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature_c: f64,
    pub condition_text: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    /// Wind speed in km/h
    pub wind_speed_kph: f64,
    pub coordinates: Coordinates,
}

/// Everything the dashboard shows for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    /// City name reported by the forecast feed
    pub city_name: String,
    pub current: CurrentConditions,
    pub hourly_forecast: Vec<HourlyEntry>,
    pub daily_forecast: Vec<DailyEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(condition: Option<&str>, icon: Option<&str>) -> Sample {
        Sample {
            timestamp: 1_704_067_200,
            temperature_c: 4.0,
            condition_text: condition.map(str::to_string),
            icon_code: icon.map(str::to_string),
            humidity_pct: 80,
            wind_speed_mps: 2.0,
            precip_probability: 0.2,
        }
    }

    #[test]
    fn test_coordinates_label_uses_four_decimals() {
        let coords = Coordinates::new(48.856_613, 2.352_222);
        assert_eq!(coords.label(), "48.8566, 2.3522");
    }

    #[test]
    fn test_sample_fallbacks() {
        let bare = sample(None, None);
        assert_eq!(bare.condition_or_unknown(), "Unknown");
        assert_eq!(bare.icon_or_empty(), "");

        let full = sample(Some("light rain"), Some("10d"));
        assert_eq!(full.condition_or_unknown(), "light rain");
        assert_eq!(full.icon_or_empty(), "10d");
    }

    #[test]
    fn test_daily_entry_date_parses_key() {
        let entry = DailyEntry {
            date_key: "2024-01-02".to_string(),
            max_temperature_c: 5.0,
            min_temperature_c: 1.0,
            condition_text: "clear sky".to_string(),
            icon_code: "01d".to_string(),
            humidity_pct: 70,
            wind_speed_kph: 10.0,
            chance_of_rain_pct: 0.0,
            sunrise_utc: Utc::now(),
            sunset_utc: Utc::now(),
        };

        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }
}
