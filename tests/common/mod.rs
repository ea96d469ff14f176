//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// `/weather` payload for Paris
pub fn current_json() -> Value {
    json!({
        "coord": { "lon": 2.3522, "lat": 48.8566 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 18.6, "humidity": 52 },
        "wind": { "speed": 3.5 },
        "name": "Paris",
        "cod": 200
    })
}

/// `/forecast` payload for Paris: 2024-06-01 21:00 UTC then every 3 hours
pub fn forecast_json(entries: usize) -> Value {
    let start = 1_717_275_600_i64; // 2024-06-01T21:00:00Z
    let list: Vec<Value> = (0..entries)
        .map(|i| {
            json!({
                "dt": start + 10_800 * i as i64,
                "main": { "temp": 15.0 + i as f64, "humidity": 60 },
                "weather": [{ "description": "broken clouds", "icon": "04d" }],
                "wind": { "speed": 2.0 },
                "pop": if i == 1 { 0.5 } else { 0.1 }
            })
        })
        .collect();

    json!({
        "cod": "200",
        "list": list,
        "city": { "name": "Paris", "country": "FR", "sunrise": 1_717_214_000_i64, "sunset": 1_717_271_000_i64 }
    })
}

/// Google Geocoding payload with a locality and a country
pub fn geocode_json(city: &str, country: &str, lat: f64, lng: f64) -> Value {
    json!({
        "status": "OK",
        "results": [{
            "formatted_address": format!("{}, {}", city, country),
            "address_components": [
                { "long_name": city, "short_name": city, "types": ["locality", "political"] },
                { "long_name": country, "short_name": country, "types": ["country", "political"] }
            ],
            "geometry": { "location": { "lat": lat, "lng": lng } }
        }]
    })
}
