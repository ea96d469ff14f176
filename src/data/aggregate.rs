//! Forecast aggregation
//!
//! Turns the provider's flat, fixed-interval forecast feed into the two views
//! the dashboard shows: an hourly slice and a daily roll-up. The input order is
//! trusted as-is; neither view re-sorts anything.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bucketing::day_key;
use super::units::to_kph;
use super::{DailyEntry, HourlyEntry, Sample, SunTimes};

/// Default number of hourly entries computed
pub const DEFAULT_HOURLY_LIMIT: usize = 24;

/// Default number of days in the daily roll-up
pub const DEFAULT_DAILY_LIMIT: usize = 5;

/// Errors that can occur while aggregating a forecast feed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// A sample's timestamp does not map to a representable instant
    #[error("Malformed timestamp {value} at sample {index}")]
    MalformedTimestamp { index: usize, value: i64 },
}

/// Caps on how much of the feed each view keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastLimits {
    /// Maximum number of hourly entries
    pub hourly: usize,
    /// Maximum number of distinct days
    pub daily: usize,
}

impl Default for ForecastLimits {
    fn default() -> Self {
        Self {
            hourly: DEFAULT_HOURLY_LIMIT,
            daily: DEFAULT_DAILY_LIMIT,
        }
    }
}

/// Output of a single aggregation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedForecast {
    pub hourly_forecast: Vec<HourlyEntry>,
    pub daily_forecast: Vec<DailyEntry>,
}

/// A sample paired with its resolved instant
struct Resolved<'a> {
    at: DateTime<Utc>,
    sample: &'a Sample,
}

/// Samples grouped by day key, remembering the order each key first appeared
#[derive(Default)]
struct DayBuckets<'a> {
    order: Vec<String>,
    buckets: HashMap<String, Vec<&'a Sample>>,
}

impl<'a> DayBuckets<'a> {
    fn push(&mut self, key: String, sample: &'a Sample) {
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.push(sample);
            return;
        }
        self.order.push(key.clone());
        self.buckets.insert(key, vec![sample]);
    }

    /// Iterates buckets in first-seen order
    fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Sample])> {
        self.order.iter().filter_map(|key| {
            self.buckets
                .get(key)
                .map(|bucket| (key.as_str(), bucket.as_slice()))
        })
    }
}

/// Aggregates a flat forecast feed into hourly and daily views
///
/// Every timestamp is resolved before any output is built, so a malformed
/// sample fails the whole call and nothing partial is returned.
pub fn aggregate(
    samples: &[Sample],
    sun: &SunTimes,
    limits: ForecastLimits,
) -> Result<AggregatedForecast, AggregateError> {
    let resolved = resolve_all(samples)?;
    warn_if_unordered(&resolved);

    let hourly_forecast = resolved
        .iter()
        .take(limits.hourly)
        .map(|r| hourly_entry(r.at, r.sample))
        .collect();

    let mut buckets = DayBuckets::default();
    for r in &resolved {
        buckets.push(day_key(&r.at), r.sample);
    }

    let daily_forecast = buckets
        .iter()
        .take(limits.daily)
        .filter_map(|(key, bucket)| daily_entry(key, bucket, sun))
        .collect();

    Ok(AggregatedForecast {
        hourly_forecast,
        daily_forecast,
    })
}

/// Maps samples 1:1 to hourly entries, keeping at most `limit` of them
pub fn hourly_projection(
    samples: &[Sample],
    limit: usize,
) -> Result<Vec<HourlyEntry>, AggregateError> {
    let resolved = resolve_all(samples)?;
    Ok(resolved
        .iter()
        .take(limit)
        .map(|r| hourly_entry(r.at, r.sample))
        .collect())
}

fn resolve_all(samples: &[Sample]) -> Result<Vec<Resolved<'_>>, AggregateError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            DateTime::from_timestamp(sample.timestamp, 0)
                .map(|at| Resolved { at, sample })
                .ok_or(AggregateError::MalformedTimestamp {
                    index,
                    value: sample.timestamp,
                })
        })
        .collect()
}

fn warn_if_unordered(resolved: &[Resolved<'_>]) {
    let out_of_order = resolved
        .windows(2)
        .filter(|pair| pair[1].at <= pair[0].at)
        .count();
    if out_of_order > 0 {
        tracing::warn!(
            out_of_order,
            total = resolved.len(),
            "forecast feed is not strictly ascending; keeping provider order"
        );
    }
}

fn hourly_entry(at: DateTime<Utc>, sample: &Sample) -> HourlyEntry {
    HourlyEntry {
        date_time_utc: at,
        temperature_c: sample.temperature_c,
        condition_text: sample.condition_or_unknown(),
        icon_code: sample.icon_or_empty(),
        humidity_pct: sample.humidity_pct,
        wind_speed_kph: to_kph(sample.wind_speed_mps),
        chance_of_rain_pct: sample.precip_probability * 100.0,
    }
}

/// Reduces one day's bucket; `None` only for an empty bucket, which
/// `DayBuckets` never produces
fn daily_entry(key: &str, bucket: &[&Sample], sun: &SunTimes) -> Option<DailyEntry> {
    let first = bucket.first()?;
    let representative = bucket[bucket.len() / 2];

    let (min, max) = bucket.iter().fold(
        (first.temperature_c, first.temperature_c),
        |(min, max), s| (min.min(s.temperature_c), max.max(s.temperature_c)),
    );
    let peak_pop = bucket
        .iter()
        .map(|s| s.precip_probability)
        .fold(0.0_f64, f64::max);

    Some(DailyEntry {
        date_key: key.to_string(),
        max_temperature_c: max,
        min_temperature_c: min,
        condition_text: representative.condition_or_unknown(),
        icon_code: representative.icon_or_empty(),
        humidity_pct: representative.humidity_pct,
        wind_speed_kph: to_kph(representative.wind_speed_mps),
        chance_of_rain_pct: peak_pop * 100.0,
        sunrise_utc: sun.sunrise_utc,
        sunset_utc: sun.sunset_utc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp()
    }

    fn sample(timestamp: i64, temp: f64, condition: &str, pop: f64) -> Sample {
        Sample {
            timestamp,
            temperature_c: temp,
            condition_text: Some(condition.to_string()),
            icon_code: Some("01d".to_string()),
            humidity_pct: 60,
            wind_speed_mps: 5.0,
            precip_probability: pop,
        }
    }

    fn sun() -> SunTimes {
        SunTimes {
            sunrise_utc: Utc.with_ymd_and_hms(2024, 1, 1, 7, 45, 0).unwrap(),
            sunset_utc: Utc.with_ymd_and_hms(2024, 1, 1, 16, 5, 0).unwrap(),
        }
    }

    /// Five days of 3-hourly samples starting at midnight UTC
    fn five_day_feed() -> Vec<Sample> {
        (0..40)
            .map(|i| {
                let t = ts(2024, 1, 1, 0) + i * 3 * 3600;
                sample(t, (i % 8) as f64, "clear sky", (i % 5) as f64 / 10.0)
            })
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_views() {
        let result = aggregate(&[], &sun(), ForecastLimits::default()).unwrap();
        assert!(result.hourly_forecast.is_empty());
        assert!(result.daily_forecast.is_empty());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let feed = five_day_feed();
        let a = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        let b = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hourly_and_daily_are_bounded() {
        let feed = five_day_feed();

        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        assert_eq!(result.hourly_forecast.len(), 24);
        assert_eq!(result.daily_forecast.len(), 5);

        let limits = ForecastLimits {
            hourly: 12,
            daily: 3,
        };
        let result = aggregate(&feed, &sun(), limits).unwrap();
        assert_eq!(result.hourly_forecast.len(), 12);
        assert_eq!(result.daily_forecast.len(), 3);
    }

    #[test]
    fn test_limits_larger_than_data_return_everything() {
        let feed: Vec<Sample> = five_day_feed().into_iter().take(5).collect();
        let limits = ForecastLimits {
            hourly: 100,
            daily: 100,
        };
        let result = aggregate(&feed, &sun(), limits).unwrap();
        assert_eq!(result.hourly_forecast.len(), 5);
        assert_eq!(result.daily_forecast.len(), 1);
    }

    #[test]
    fn test_hourly_preserves_order_and_converts_units() {
        let feed = vec![
            sample(ts(2024, 1, 1, 0), 1.0, "a", 0.25),
            sample(ts(2024, 1, 1, 3), 2.0, "b", 0.5),
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        let first = &result.hourly_forecast[0];
        assert_eq!(first.date_time_utc, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(first.condition_text, "a");
        assert!((first.wind_speed_kph - 18.0).abs() < 1e-9);
        assert!((first.chance_of_rain_pct - 25.0).abs() < 1e-9);
        assert_eq!(result.hourly_forecast[1].condition_text, "b");
    }

    #[test]
    fn test_min_max_bound_every_sample() {
        let feed = five_day_feed();
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        for day in &result.daily_forecast {
            for s in &feed {
                let at = DateTime::from_timestamp(s.timestamp, 0).unwrap();
                if day_key(&at) == day.date_key {
                    assert!(s.temperature_c <= day.max_temperature_c);
                    assert!(s.temperature_c >= day.min_temperature_c);
                }
            }
        }
    }

    #[test]
    fn test_chance_of_rain_is_max_not_mean() {
        let feed = vec![
            sample(ts(2024, 1, 1, 6), 3.0, "clear", 0.1),
            sample(ts(2024, 1, 1, 9), 4.0, "rain", 0.9),
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        assert!((result.daily_forecast[0].chance_of_rain_pct - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_representative_sample_is_middle_of_group() {
        let feed = vec![
            Sample {
                humidity_pct: 10,
                wind_speed_mps: 1.0,
                ..sample(ts(2024, 1, 1, 6), 3.0, "clear", 0.0)
            },
            Sample {
                humidity_pct: 90,
                wind_speed_mps: 10.0,
                icon_code: Some("10d".to_string()),
                ..sample(ts(2024, 1, 1, 9), 4.0, "rain", 0.0)
            },
            Sample {
                humidity_pct: 50,
                wind_speed_mps: 5.0,
                ..sample(ts(2024, 1, 1, 12), 5.0, "cloudy", 0.0)
            },
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        let day = &result.daily_forecast[0];

        assert_eq!(day.condition_text, "rain");
        assert_eq!(day.icon_code, "10d");
        assert_eq!(day.humidity_pct, 90);
        assert!((day.wind_speed_kph - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_day_has_equal_min_max() {
        let feed = vec![sample(ts(2024, 1, 1, 21), 7.5, "mist", 0.3)];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();
        let day = &result.daily_forecast[0];

        assert!((day.max_temperature_c - 7.5).abs() < 1e-9);
        assert!((day.min_temperature_c - 7.5).abs() < 1e-9);
        assert_eq!(day.condition_text, "mist");
    }

    #[test]
    fn test_midnight_boundary_splits_days() {
        let feed = vec![
            sample(ts(2024, 1, 1, 23), 1.0, "clear", 0.0),
            sample(ts(2024, 1, 2, 1), 2.0, "clear", 0.0),
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        let keys: Vec<&str> = result
            .daily_forecast
            .iter()
            .map(|d| d.date_key.as_str())
            .collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_daily_order_follows_first_appearance() {
        let feed = vec![
            sample(ts(2024, 1, 2, 6), 1.0, "b1", 0.0),
            sample(ts(2024, 1, 2, 9), 2.0, "b2", 0.0),
            sample(ts(2024, 1, 1, 6), 3.0, "a1", 0.0),
            sample(ts(2024, 1, 1, 9), 4.0, "a2", 0.0),
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        let keys: Vec<&str> = result
            .daily_forecast
            .iter()
            .map(|d| d.date_key.as_str())
            .collect();
        assert_eq!(keys, vec!["2024-01-02", "2024-01-01"]);
        // hourly keeps the feed order verbatim as well
        assert_eq!(result.hourly_forecast[0].condition_text, "b1");
    }

    /// Runs `f` with a subscriber that writes WARN and above into the returned buffer
    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let value = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (value, output)
    }

    #[test]
    fn test_unordered_feed_warns_and_keeps_order() {
        let feed = vec![
            sample(ts(2024, 1, 2, 6), 1.0, "b1", 0.0),
            sample(ts(2024, 1, 1, 6), 3.0, "a1", 0.0),
        ];
        let (result, logs) =
            capture_warnings(|| aggregate(&feed, &sun(), ForecastLimits::default()));

        let result = result.unwrap();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("not strictly ascending"));
        assert!(logs.contains("out_of_order=1"));
        assert_eq!(result.hourly_forecast[0].condition_text, "b1");
        assert_eq!(result.daily_forecast[0].date_key, "2024-01-02");
    }

    #[test]
    fn test_ordered_feed_does_not_warn() {
        let feed = five_day_feed();
        let (result, logs) =
            capture_warnings(|| aggregate(&feed, &sun(), ForecastLimits::default()));

        assert!(result.is_ok());
        assert!(logs.is_empty());
    }

    #[test]
    fn test_sun_times_shared_across_days() {
        let feed = five_day_feed();
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        for day in &result.daily_forecast {
            assert_eq!(day.sunrise_utc, sun().sunrise_utc);
            assert_eq!(day.sunset_utc, sun().sunset_utc);
        }
    }

    #[test]
    fn test_missing_text_fields_fall_back() {
        let feed = vec![Sample {
            condition_text: None,
            icon_code: None,
            ..sample(ts(2024, 1, 1, 12), 1.0, "", 0.0)
        }];
        let result = aggregate(&feed, &sun(), ForecastLimits::default()).unwrap();

        assert_eq!(result.hourly_forecast[0].condition_text, "Unknown");
        assert_eq!(result.hourly_forecast[0].icon_code, "");
        assert_eq!(result.daily_forecast[0].condition_text, "Unknown");
        assert_eq!(result.daily_forecast[0].icon_code, "");
    }

    #[test]
    fn test_malformed_timestamp_fails_whole_call() {
        let feed = vec![
            sample(ts(2024, 1, 1, 0), 1.0, "ok", 0.0),
            sample(i64::MAX, 1.0, "bad", 0.0),
        ];
        let result = aggregate(&feed, &sun(), ForecastLimits::default());

        assert_eq!(
            result,
            Err(AggregateError::MalformedTimestamp {
                index: 1,
                value: i64::MAX
            })
        );
    }

    #[test]
    fn test_hourly_projection_respects_limit() {
        let feed = five_day_feed();
        let hourly = hourly_projection(&feed, 8).unwrap();
        assert_eq!(hourly.len(), 8);
        assert_eq!(hourly[7].date_time_utc.timestamp(), feed[7].timestamp);
    }
}
