//! Approximate user location via IP geolocation
//!
//! A terminal has no browser geolocation prompt, so "use my location" asks an
//! IP-geolocation service instead. The lookup is bounded by a timeout and the
//! caller falls back to the last searched city when it fails.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Coordinates;

const GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Default bound on a geolocation lookup
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Location service errors
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    /// Explanation shown to the user, always ending in a full sentence
    pub fn user_message(&self) -> String {
        let prefix = "Unable to get your current location.";
        let detail = match self {
            LocationError::PermissionDenied => {
                "Location access was denied. Search for a city manually."
            }
            LocationError::ServiceUnavailable => {
                "Location information is unavailable. Please search for a city manually."
            }
            LocationError::Timeout => {
                "The location request timed out. Please try again or search for a city manually."
            }
            LocationError::Other(_) => "Please search for a city manually.",
        };
        format!("{} {}", prefix, detail)
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves the user's approximate coordinates
#[derive(Debug, Clone)]
pub struct Locator {
    client: Client,
    url: String,
    timeout: Duration,
    enabled: bool,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: GEOLOCATION_URL.to_string(),
            timeout: DEFAULT_LOCATE_TIMEOUT,
            enabled: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A disabled locator always reports `PermissionDenied`
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Look up the current position, giving up after the configured timeout
    pub async fn locate(&self) -> Result<Coordinates, LocationError> {
        if !self.enabled {
            return Err(LocationError::PermissionDenied);
        }

        match tokio::time::timeout(self.timeout, self.lookup()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "geolocation timed out");
                Err(LocationError::Timeout)
            }
        }
    }

    async fn lookup(&self) -> Result<Coordinates, LocationError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("Geolocation request failed: {}", e);
            LocationError::ServiceUnavailable
        })?;

        if !response.status().is_success() {
            tracing::debug!("Geolocation returned status {}", response.status());
            return Err(LocationError::ServiceUnavailable);
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?;

        if body.status != "success" {
            return Err(LocationError::Other(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                tracing::info!(lat, lon, "located via IP geolocation");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Other("response missing coordinates".to_string())),
        }
    }
}
