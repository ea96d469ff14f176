//! Background fetch system
//!
//! Network work runs on spawned tokio tasks. Each task reports back over an
//! mpsc channel with the sequence number it was started with, so the
//! application can drop results that a newer request has superseded.

use tokio::sync::mpsc;

use crate::data::{
    Coordinates, ForecastLimits, GeocodingClient, GeocodingResult, LocationQuery, Locator,
    WeatherClient,
};
use crate::state::Loaded;

/// Shown when a city search fails for any reason
pub const SEARCH_FAILED_MESSAGE: &str =
    "Failed to fetch weather data. Please check the city name or your network connection.";

/// Shown when a coordinate lookup fails for any reason
pub const COORDINATES_FAILED_MESSAGE: &str =
    "Failed to fetch weather data for this location. Please try another location.";

/// Messages sent from fetch tasks to the main app
#[derive(Debug, Clone)]
pub enum FetchMessage {
    Succeeded { seq: u64, loaded: Box<Loaded> },
    Failed { seq: u64, message: String },
}

impl FetchMessage {
    fn from_result(seq: u64, result: Result<Loaded, String>) -> Self {
        match result {
            Ok(loaded) => FetchMessage::Succeeded {
                seq,
                loaded: Box::new(loaded),
            },
            Err(message) => FetchMessage::Failed { seq, message },
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            FetchMessage::Succeeded { seq, .. } | FetchMessage::Failed { seq, .. } => *seq,
        }
    }
}

/// The clients a fetch needs, cheap to clone into a task
#[derive(Debug, Clone, Default)]
pub struct Services {
    pub weather: WeatherClient,
    pub geocoder: GeocodingClient,
    pub locator: Locator,
    pub limits: ForecastLimits,
}

impl Services {
    /// Fetch the forecast for a city typed by the user
    pub async fn search_city(&self, city: &str) -> Result<Loaded, String> {
        let query = LocationQuery::City(city.to_string());
        match self.weather.fetch_forecast(&query, self.limits).await {
            Ok(forecast) => {
                tracing::info!(city, "search succeeded");
                Ok(Loaded {
                    display_name: forecast.city_name.clone(),
                    forecast,
                    remember: Some(city.to_string()),
                    city_field: None,
                    notice: None,
                    show_current: false,
                })
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "search failed");
                Err(SEARCH_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Fetch the forecast for a coordinate pair, named by reverse geocoding
    pub async fn lookup_coordinates(&self, coords: Coordinates) -> Result<Loaded, String> {
        let place = self.geocoder.reverse_geocode(coords).await;
        self.forecast_at(coords, place).await
    }

    async fn forecast_at(
        &self,
        coords: Coordinates,
        place: Option<GeocodingResult>,
    ) -> Result<Loaded, String> {
        let display_name = place
            .as_ref()
            .map(GeocodingResult::display_name)
            .unwrap_or_else(|| coords.label());

        let query = LocationQuery::Coordinates(coords);
        match self.weather.fetch_forecast(&query, self.limits).await {
            Ok(forecast) => Ok(Loaded {
                display_name,
                forecast,
                remember: None,
                city_field: None,
                notice: None,
                show_current: true,
            }),
            Err(e) => {
                tracing::warn!(location = %coords.label(), error = %e, "coordinate lookup failed");
                Err(COORDINATES_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Use the device location, falling back to the last searched city
    pub async fn locate(&self, last_city: Option<String>) -> Result<Loaded, String> {
        match self.locator.locate().await {
            Ok(coords) => {
                let place = self.geocoder.reverse_geocode(coords).await;
                let name = place.as_ref().map(GeocodingResult::display_name);
                let mut loaded = self.forecast_at(coords, place).await?;
                loaded.remember = name.clone();
                loaded.city_field = name;
                Ok(loaded)
            }
            Err(e) => {
                let reason = e.user_message();
                tracing::warn!(error = %e, "geolocation failed");
                match last_city {
                    Some(city) => {
                        let mut loaded = self.search_city(&city).await?;
                        loaded.notice =
                            Some(format!("{} Showing weather for your last search instead.", reason));
                        loaded.city_field = Some(city);
                        Ok(loaded)
                    }
                    None => Err(reason),
                }
            }
        }
    }
}

/// Handle for issuing fetches and receiving their results
pub struct FetchWorker {
    services: Services,
    sender: mpsc::Sender<FetchMessage>,
    /// Channel for receiving fetch results
    pub receiver: mpsc::Receiver<FetchMessage>,
}

impl FetchWorker {
    pub fn new(services: Services) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            services,
            sender,
            receiver,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn spawn_search(&self, seq: u64, city: String) {
        let services = self.services.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = services.search_city(&city).await;
            let _ = tx.send(FetchMessage::from_result(seq, result)).await;
        });
    }

    pub fn spawn_coordinates(&self, seq: u64, coords: Coordinates) {
        let services = self.services.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = services.lookup_coordinates(coords).await;
            let _ = tx.send(FetchMessage::from_result(seq, result)).await;
        });
    }

    pub fn spawn_locate(&self, seq: u64, last_city: Option<String>) {
        let services = self.services.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let result = services.locate(last_city).await;
            let _ = tx.send(FetchMessage::from_result(seq, result)).await;
        });
    }
}

/// Checks for a finished fetch without blocking
///
/// # Returns
/// * `Some(FetchMessage)` if a result was available
/// * `None` if nothing is pending
pub fn try_recv(worker: &mut FetchWorker) -> Option<FetchMessage> {
    worker.receiver.try_recv().ok()
}
