//! OpenWeatherMap API client
//!
//! This module fetches current conditions and the flat 5-day / 3-hour forecast
//! feed from OpenWeatherMap (metric units) and turns them into our data
//! structures. The forecast feed goes through the aggregator to build the
//! hourly and daily views.

use std::fmt;

use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::aggregate::{aggregate, hourly_projection, AggregateError, ForecastLimits};
use super::units::to_kph;
use super::{
    Coordinates, CurrentConditions, ForecastData, HourlyEntry, Sample, SunTimes,
    UNKNOWN_CONDITION,
};

/// Base URL for the OpenWeatherMap API
const OPENWEATHERMAP_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Base URL for provider icon images
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key was configured
    #[error("Weather API key is missing. Set OPENWEATHER_API_KEY in your environment or .env file.")]
    MissingApiKey,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The provider does not know the requested location
    #[error("Weather data for {0} not found")]
    NotFound(String),

    /// The provider rejected the request
    #[error("Invalid request. Please check the city name.")]
    InvalidRequest,

    /// Any other non-success status
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// Sunrise or sunset could not be resolved to an instant
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// The forecast feed could not be aggregated
    #[error("Malformed forecast feed: {0}")]
    Malformed(#[from] AggregateError),
}

/// What to look up: a city name or a coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(city) => vec![("q", city.clone())],
            LocationQuery::Coordinates(coords) => vec![
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(city) => write!(f, "\"{}\"", city),
            LocationQuery::Coordinates(coords) => write!(f, "coordinates {}", coords.label()),
        }
    }
}

/// URL of the provider's image for an icon code
pub fn icon_url(icon_code: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, icon_code)
}

/// Client for fetching weather data from the OpenWeatherMap API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl WeatherClient {
    /// Create a new WeatherClient with the given API key
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENWEATHERMAP_BASE_URL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Point the client at a different API root (used for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch current conditions for a location
    pub async fn fetch_current(
        &self,
        query: &LocationQuery,
    ) -> Result<CurrentConditions, WeatherError> {
        let response: CurrentResponse = self.get_json("weather", query).await?;
        Ok(parse_current(&response))
    }

    /// Fetch only the hourly projection of the forecast feed
    ///
    /// # Arguments
    /// * `query` - City name or coordinates
    /// * `hours` - Maximum number of entries to return
    pub async fn fetch_hourly(
        &self,
        query: &LocationQuery,
        hours: usize,
    ) -> Result<Vec<HourlyEntry>, WeatherError> {
        let response: ForecastResponse = self.get_json("forecast", query).await?;
        let samples: Vec<Sample> = response.list.iter().map(to_sample).collect();
        Ok(hourly_projection(&samples, hours)?)
    }

    /// Fetch current conditions and the aggregated forecast for a location
    ///
    /// Both provider calls run concurrently and the request only succeeds when
    /// both do; a failure of either discards the other's result.
    ///
    /// # Returns
    /// * `Ok(ForecastData)` - Current conditions plus hourly and daily views
    /// * `Err(WeatherError)` - If either request, parsing or aggregation fails
    pub async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        limits: ForecastLimits,
    ) -> Result<ForecastData, WeatherError> {
        let (current, forecast) = futures::future::try_join(
            self.get_json::<CurrentResponse>("weather", query),
            self.get_json::<ForecastResponse>("forecast", query),
        )
        .await?;

        assemble_forecast(&current, &forecast, limits)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut params = query.params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        tracing::info!(endpoint, location = %query, "requesting weather data");
        let response = self.client.get(&url).query(&params).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(WeatherError::NotFound(query.to_string())),
            StatusCode::BAD_REQUEST => return Err(WeatherError::InvalidRequest),
            status => return Err(WeatherError::HttpStatus(status.as_u16())),
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(endpoint, error = %e, "failed to parse weather payload");
            e
        })?;
        Ok(parsed)
    }
}

/// Combine both provider payloads into the dashboard's data
fn assemble_forecast(
    current: &CurrentResponse,
    forecast: &ForecastResponse,
    limits: ForecastLimits,
) -> Result<ForecastData, WeatherError> {
    let sun = parse_sun_times(&forecast.city)?;
    let samples: Vec<Sample> = forecast.list.iter().map(to_sample).collect();
    let aggregated = aggregate(&samples, &sun, limits)?;

    tracing::debug!(
        samples = samples.len(),
        hourly = aggregated.hourly_forecast.len(),
        daily = aggregated.daily_forecast.len(),
        "aggregated forecast feed"
    );

    Ok(ForecastData {
        city_name: forecast.city.name.clone(),
        current: parse_current(current),
        hourly_forecast: aggregated.hourly_forecast,
        daily_forecast: aggregated.daily_forecast,
    })
}

fn parse_current(response: &CurrentResponse) -> CurrentConditions {
    let description = response.weather.first();
    CurrentConditions {
        temperature_c: response.main.temp,
        condition_text: description
            .and_then(|d| d.description.clone())
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string()),
        icon_code: description.and_then(|d| d.icon.clone()).unwrap_or_default(),
        humidity_pct: humidity_pct(response.main.humidity),
        wind_speed_kph: to_kph(response.wind.speed),
        coordinates: Coordinates::new(response.coord.lat, response.coord.lon),
    }
}

fn parse_sun_times(city: &CityInfo) -> Result<SunTimes, WeatherError> {
    let instant = |secs: i64| {
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| WeatherError::InvalidTimeFormat(secs.to_string()))
    };
    Ok(SunTimes {
        sunrise_utc: instant(city.sunrise)?,
        sunset_utc: instant(city.sunset)?,
    })
}

fn to_sample(item: &ForecastItem) -> Sample {
    let description = item.weather.first();
    Sample {
        timestamp: item.dt,
        temperature_c: item.main.temp,
        condition_text: description.and_then(|d| d.description.clone()),
        icon_code: description.and_then(|d| d.icon.clone()),
        humidity_pct: humidity_pct(item.main.humidity),
        wind_speed_mps: item.wind.speed,
        precip_probability: item.pop.unwrap_or(0.0),
    }
}

fn humidity_pct(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// `/weather` response structure
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    coord: Coord,
    #[serde(default)]
    weather: Vec<Description>,
    main: MainReadings,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Description {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// `/forecast` response structure
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
    city: CityInfo,
}

/// One 3-hour entry of the forecast feed
#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Description>,
    wind: Wind,
    #[serde(default)]
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    name: String,
    sunrise: i64,
    sunset: i64,
}
