//! Runtime configuration
//!
//! API keys come from the environment, which `main` first fills from a `.env`
//! file when one exists. Everything else comes from the command line.

use std::time::Duration;

use crate::cli::StartupConfig;
use crate::data::location::DEFAULT_LOCATE_TIMEOUT;
use crate::data::{ForecastLimits, GeocodingClient, Locator, TemperatureUnit, WeatherClient};
use crate::fetch::Services;

pub const OPENWEATHER_API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const GOOGLE_MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Number of hourly entries shown in the hourly panel
pub const HOURLY_DISPLAY_COUNT: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub openweather_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub limits: ForecastLimits,
    pub unit: TemperatureUnit,
    pub initial_city: Option<String>,
    pub locate: bool,
    pub locate_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            google_maps_api_key: None,
            limits: ForecastLimits::default(),
            unit: TemperatureUnit::Celsius,
            initial_city: None,
            locate: true,
            locate_timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    }
}

impl Config {
    /// Reads API keys from the process environment and applies CLI settings
    pub fn from_env(startup: &StartupConfig) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), startup)
    }

    /// Same as [`Config::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F, startup: &StartupConfig) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            openweather_api_key: key(OPENWEATHER_API_KEY_VAR),
            google_maps_api_key: key(GOOGLE_MAPS_API_KEY_VAR),
            limits: startup.limits,
            unit: startup.unit,
            initial_city: startup.initial_city.clone(),
            locate: startup.locate,
            ..Self::default()
        };

        if config.openweather_api_key.is_none() {
            tracing::warn!("{} is not set; weather requests will fail", OPENWEATHER_API_KEY_VAR);
        }
        if config.google_maps_api_key.is_none() {
            tracing::info!("{} is not set; locations will be shown as coordinates", GOOGLE_MAPS_API_KEY_VAR);
        }

        config
    }

    /// Builds the network clients this configuration describes
    pub fn services(&self) -> Services {
        Services {
            weather: WeatherClient::new(self.openweather_api_key.clone()),
            geocoder: GeocodingClient::new(self.google_maps_api_key.clone()),
            locator: Locator::new()
                .with_timeout(self.locate_timeout)
                .enabled(self.locate),
            limits: self.limits,
        }
    }
}
