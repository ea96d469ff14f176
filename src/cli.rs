//! Command-line interface parsing for weatherdash
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`.

use clap::Parser;
use thiserror::Error;

use crate::data::{ForecastLimits, TemperatureUnit, DEFAULT_DAILY_LIMIT};

/// Largest hourly window the 5-day / 3-hour feed can fill
pub const MAX_HOURS: u8 = 40;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// The requested number of days is outside the feed's range
    #[error("Invalid days: {0}. Must be between 1 and 5")]
    InvalidDays(u8),
    /// The requested number of hourly entries is outside the feed's range
    #[error("Invalid hours: {0}. Must be between 1 and 40")]
    InvalidHours(u8),
}

/// weatherdash - Current conditions and forecasts in your terminal
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Current conditions, hourly and daily forecasts in the terminal")]
#[command(version)]
pub struct Cli {
    /// City to show on startup instead of using your location
    ///
    /// Examples:
    ///   weatherdash --city Paris
    ///   weatherdash --city "New York"
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Start with temperatures in Fahrenheit
    #[arg(long)]
    pub fahrenheit: bool,

    /// Number of days in the daily forecast (1-5)
    #[arg(long, value_name = "DAYS")]
    pub days: Option<u8>,

    /// Number of hourly entries to compute (1-40)
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<u8>,

    /// Never look up your location; "use my location" falls back to the last search
    #[arg(long)]
    pub no_locate: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupConfig {
    /// City to search first, if any
    pub initial_city: Option<String>,
    pub unit: TemperatureUnit,
    pub limits: ForecastLimits,
    /// Whether geolocation may be used
    pub locate: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a limit is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut limits = ForecastLimits::default();

        if let Some(days) = cli.days {
            if days == 0 || usize::from(days) > DEFAULT_DAILY_LIMIT {
                return Err(CliError::InvalidDays(days));
            }
            limits.daily = usize::from(days);
        }

        if let Some(hours) = cli.hours {
            if hours == 0 || hours > MAX_HOURS {
                return Err(CliError::InvalidHours(hours));
            }
            limits.hourly = usize::from(hours);
        }

        let unit = if cli.fahrenheit {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        };

        Ok(StartupConfig {
            initial_city: cli
                .city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            unit,
            limits,
            locate: !cli.no_locate,
        })
    }
}
