//! Geocoding: convert between place names and coordinates
//!
//! Uses the Google Geocoding API. Every failure (missing key, HTTP error,
//! non-OK status, no results) yields `None`; callers fall back to showing raw
//! coordinates.

use reqwest::Client;
use serde::Deserialize;

use super::Coordinates;

const GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const UNKNOWN_CITY: &str = "Unknown City";
const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// A resolved place
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingResult {
    pub city: String,
    pub country: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodingResult {
    /// `"City, Country"`, the form stored as the last searched city
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    #[serde(default)]
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Client for the Google Geocoding API
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GeocodingClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: GEOCODING_URL.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Point the client at a different endpoint (used for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a free-form address
    pub async fn geocode_address(&self, address: &str) -> Option<GeocodingResult> {
        let response = self.request(&[("address", address.to_string())]).await?;
        let result = response.results.into_iter().next()?;
        let location = result.geometry.location;
        Some(build_result(
            &result.address_components,
            result.formatted_address,
            location.lat,
            location.lng,
        ))
    }

    /// Reverse geocode coordinates to a place
    ///
    /// The returned result keeps the input coordinates rather than the
    /// provider's snapped location.
    pub async fn reverse_geocode(&self, coords: Coordinates) -> Option<GeocodingResult> {
        let latlng = format!("{},{}", coords.latitude, coords.longitude);
        let response = self.request(&[("latlng", latlng)]).await?;
        let result = response.results.into_iter().next()?;
        let place = build_result(
            &result.address_components,
            result.formatted_address,
            coords.latitude,
            coords.longitude,
        );
        tracing::info!(place = %place.display_name(), "reverse geocoded coordinates");
        Some(place)
    }

    async fn request(&self, params: &[(&str, String)]) -> Option<GeocodeResponse> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("Google Maps API key not configured for geocoding");
            return None;
        };

        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("key", api_key.to_string()));

        let response = match self.client.get(&self.base_url).query(&query).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Geocoding request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Geocoding API error: {}", response.status());
            return None;
        }

        let body: GeocodeResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Geocoding parse error: {}", e);
                return None;
            }
        };

        if body.status != "OK" || body.results.is_empty() {
            tracing::debug!(status = %body.status, "Geocoding returned no usable result");
            return None;
        }

        Some(body)
    }
}

/// Pull city and country out of the address components
///
/// `locality` always wins for the city; `administrative_area_level_1` only
/// fills it when no locality has been seen yet.
fn build_result(
    components: &[AddressComponent],
    formatted_address: String,
    latitude: f64,
    longitude: f64,
) -> GeocodingResult {
    let mut city: Option<&str> = None;
    let mut country: Option<&str> = None;

    for component in components {
        let has = |t: &str| component.types.iter().any(|ty| ty == t);
        if has("locality") {
            city = Some(component.long_name.as_str());
        } else if has("administrative_area_level_1") && city.is_none() {
            city = Some(component.long_name.as_str());
        } else if has("country") {
            country = Some(component.long_name.as_str());
        }
    }

    GeocodingResult {
        city: city
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITY)
            .to_string(),
        country: country
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_COUNTRY)
            .to_string(),
        formatted_address,
        latitude,
        longitude,
    }
}
