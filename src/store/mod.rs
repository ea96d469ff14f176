//! Preference store for values that survive restarts
//!
//! The dashboard persists exactly one value, the last searched city. It is
//! stored as a JSON string on disk and re-read whenever it is needed; there
//! is no in-memory copy, no expiry and no schema version.

mod manager;

pub use manager::{PreferenceStore, LAST_SEARCHED_CITY_KEY};
