//! Dashboard UI state and its transitions
//!
//! `DashboardState` is a plain snapshot. Every change goes through
//! [`DashboardState::apply`], which consumes the old snapshot and returns the
//! new one without touching the network or the disk. Request results carry the
//! sequence number they were issued with; anything but the latest is dropped.

use crate::data::{Coordinates, ForecastData, TemperatureUnit};

/// The four dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Current,
    Hourly,
    Daily,
    Map,
}

impl View {
    pub const ALL: [View; 4] = [View::Current, View::Hourly, View::Daily, View::Map];

    pub fn title(self) -> &'static str {
        match self {
            View::Current => "Current",
            View::Hourly => "Hourly",
            View::Daily => "Daily",
            View::Map => "Map",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Current => 0,
            View::Hourly => 1,
            View::Daily => 2,
            View::Map => 3,
        }
    }

    pub fn next(self) -> Self {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(self) -> Self {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// A completed lookup, ready to be shown
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Name shown in the header, e.g. `"Paris, France"` or `"48.8566, 2.3522"`
    pub display_name: String,
    pub forecast: ForecastData,
    /// City to persist as the last search once this result is applied
    pub remember: Option<String>,
    /// Text to put in the search field
    pub city_field: Option<String>,
    /// Gentle message to show alongside the data (e.g. a location fallback)
    pub notice: Option<String>,
    /// Jump back to the Current tab when applied
    pub show_current: bool,
}

/// Everything a state change can be triggered by
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleUnit,
    SelectView(View),
    NextView,
    PreviousView,
    StartEditing,
    InputChar(char),
    InputBackspace,
    FinishEditing,
    CancelEditing,
    ToggleHelp,
    /// Move the map cursor by the given number of degrees
    MoveMapCursor { north: f64, east: f64 },
    /// A new request was issued; older in-flight results become stale
    RequestStarted { seq: u64 },
    RequestSucceeded { seq: u64, loaded: Box<Loaded> },
    RequestFailed { seq: u64, message: String },
    /// A search was refused before any request was made
    SearchRejected { seq: u64, message: String },
}

/// Snapshot of the dashboard UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub unit: TemperatureUnit,
    pub active_view: View,
    /// Contents of the search field
    pub input: String,
    pub editing: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub forecast: Option<ForecastData>,
    pub display_name: Option<String>,
    /// Sequence number of the most recently issued request
    pub latest_request: u64,
    pub show_help: bool,
    /// Position picked on the map panel, starts at the shown location
    pub map_cursor: Option<Coordinates>,
}

impl DashboardState {
    pub fn with_unit(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    /// Returns true if a result tagged `seq` would still be applied
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_request
    }

    /// Applies an action and returns the resulting snapshot
    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::ToggleUnit => self.unit = self.unit.toggle(),
            Action::SelectView(view) => self.active_view = view,
            Action::NextView => self.active_view = self.active_view.next(),
            Action::PreviousView => self.active_view = self.active_view.previous(),
            Action::StartEditing => self.editing = true,
            Action::InputChar(c) => {
                if self.editing {
                    self.input.push(c);
                }
            }
            Action::InputBackspace => {
                if self.editing {
                    self.input.pop();
                }
            }
            Action::FinishEditing => self.editing = false,
            Action::CancelEditing => {
                self.editing = false;
                self.input.clear();
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::MoveMapCursor { north, east } => {
                if let Some(cursor) = self.map_cursor {
                    self.map_cursor = Some(move_cursor(cursor, north, east));
                }
            }
            Action::RequestStarted { seq } => {
                self.latest_request = seq;
                self.loading = true;
                self.error = None;
                self.notice = None;
                self.clear_data();
            }
            Action::RequestSucceeded { seq, loaded } => {
                if !self.is_current(seq) {
                    tracing::debug!(seq, latest = self.latest_request, "dropping stale result");
                    return self;
                }
                let loaded = *loaded;
                self.loading = false;
                self.error = None;
                self.notice = loaded.notice;
                self.display_name = Some(loaded.display_name);
                if let Some(city) = loaded.city_field {
                    self.input = city;
                }
                if loaded.show_current {
                    self.active_view = View::Current;
                }
                self.map_cursor = Some(loaded.forecast.current.coordinates);
                self.forecast = Some(loaded.forecast);
            }
            Action::RequestFailed { seq, message } => {
                if !self.is_current(seq) {
                    tracing::debug!(seq, latest = self.latest_request, "dropping stale failure");
                    return self;
                }
                self.loading = false;
                self.notice = None;
                self.error = Some(message);
                self.clear_data();
            }
            Action::SearchRejected { seq, message } => {
                self.latest_request = seq;
                self.loading = false;
                self.notice = None;
                self.error = Some(message);
                self.clear_data();
            }
        }
        self
    }

    fn clear_data(&mut self) {
        self.forecast = None;
        self.display_name = None;
    }
}

/// Latitude stays within the map's drawable band; longitude wraps around
fn move_cursor(cursor: Coordinates, north: f64, east: f64) -> Coordinates {
    let latitude = (cursor.latitude + north).clamp(-MAX_CURSOR_LATITUDE, MAX_CURSOR_LATITUDE);
    let mut longitude = cursor.longitude + east;
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }
    Coordinates::new(latitude, longitude)
}

const MAX_CURSOR_LATITUDE: f64 = 85.0;
