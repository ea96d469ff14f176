//! Application state management for weatherdash
//!
//! `App` owns the dashboard state, the preference store and the fetch worker.
//! Keyboard input becomes [`Action`]s for the pure state transitions, plus
//! fetches issued through the worker with a fresh sequence number.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::data::{Coordinates, TemperatureUnit};
use crate::fetch::{try_recv, FetchMessage, FetchWorker, Services};
use crate::state::{Action, DashboardState, View};
use crate::store::PreferenceStore;

/// Shown when Enter is pressed on an empty search field
pub const EMPTY_CITY_MESSAGE: &str = "City name cannot be empty.";

/// Degrees the map cursor moves per arrow key press
const MAP_CURSOR_STEP: f64 = 1.0;

/// The last query issued, re-run by `r`
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    City(String),
    Coordinates(Coordinates),
    Locate,
}

/// Main application struct managing state and background fetches
pub struct App {
    /// Current dashboard snapshot
    pub state: DashboardState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// What `r` will re-run
    pub last_request: Option<Request>,
    next_seq: u64,
    store: Option<PreferenceStore>,
    worker: FetchWorker,
}

impl App {
    /// Creates an App from runtime configuration, using the default store location
    pub fn new(config: &Config) -> Self {
        Self::with_parts(config.services(), PreferenceStore::new(), config.unit)
    }

    /// Creates an App with explicit clients and store
    pub fn with_parts(
        services: Services,
        store: Option<PreferenceStore>,
        unit: TemperatureUnit,
    ) -> Self {
        Self {
            state: DashboardState::with_unit(unit),
            should_quit: false,
            last_request: None,
            next_seq: 0,
            store,
            worker: FetchWorker::new(services),
        }
    }

    /// Issue the first request: the given city, or the device location
    pub fn start(&mut self, initial_city: Option<String>) {
        match initial_city {
            Some(city) => self.search(city),
            None => self.locate(),
        }
    }

    /// Applies an action to the dashboard state
    pub fn dispatch(&mut self, action: Action) {
        self.state = std::mem::take(&mut self.state).apply(action);
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn begin_request(&mut self, request: Request) -> u64 {
        let seq = self.next_seq();
        tracing::debug!(seq, ?request, "starting request");
        self.last_request = Some(request);
        self.dispatch(Action::RequestStarted { seq });
        seq
    }

    /// Submits the search field
    pub fn submit_search(&mut self) {
        self.dispatch(Action::FinishEditing);
        let city = self.state.input.trim().to_string();
        if city.is_empty() {
            let seq = self.next_seq();
            self.dispatch(Action::SearchRejected {
                seq,
                message: EMPTY_CITY_MESSAGE.to_string(),
            });
            return;
        }
        self.search(city);
    }

    pub fn search(&mut self, city: String) {
        let seq = self.begin_request(Request::City(city.clone()));
        self.worker.spawn_search(seq, city);
    }

    pub fn show_coordinates(&mut self, coords: Coordinates) {
        let seq = self.begin_request(Request::Coordinates(coords));
        self.worker.spawn_coordinates(seq, coords);
    }

    /// Uses the device location, with the stored last search as fallback
    pub fn locate(&mut self) {
        let last_city = self.last_searched_city();
        let seq = self.begin_request(Request::Locate);
        self.worker.spawn_locate(seq, last_city);
    }

    /// Re-runs the last query, if any
    pub fn refresh(&mut self) {
        match self.last_request.clone() {
            Some(Request::City(city)) => self.search(city),
            Some(Request::Coordinates(coords)) => self.show_coordinates(coords),
            Some(Request::Locate) => self.locate(),
            None => {}
        }
    }

    pub fn last_searched_city(&self) -> Option<String> {
        self.store.as_ref().and_then(PreferenceStore::last_searched_city)
    }

    /// Drains finished fetches without blocking
    ///
    /// Stale results are dropped by the state transition; the city of an
    /// applied success is persisted as the last search.
    pub fn poll_fetch(&mut self) {
        while let Some(message) = try_recv(&mut self.worker) {
            self.handle_fetch(message);
        }
    }

    /// Applies one fetch result
    pub fn handle_fetch(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Succeeded { seq, loaded } => {
                let remember = if self.state.is_current(seq) {
                    loaded.remember.clone()
                } else {
                    None
                };
                self.dispatch(Action::RequestSucceeded { seq, loaded });
                if let (Some(city), Some(store)) = (remember, self.store.as_ref()) {
                    store.remember_city(&city);
                }
            }
            FetchMessage::Failed { seq, message } => {
                self.dispatch(Action::RequestFailed { seq, message });
            }
        }
    }

    /// Handles keyboard input based on the current state
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.state.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.dispatch(Action::ToggleHelp);
            }
            return;
        }

        if self.state.editing {
            match key_event.code {
                KeyCode::Enter => self.submit_search(),
                KeyCode::Esc => self.dispatch(Action::CancelEditing),
                KeyCode::Backspace => self.dispatch(Action::InputBackspace),
                KeyCode::Char(c) => self.dispatch(Action::InputChar(c)),
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('u') => self.dispatch(Action::ToggleUnit),
            KeyCode::Char('1') => self.dispatch(Action::SelectView(View::Current)),
            KeyCode::Char('2') => self.dispatch(Action::SelectView(View::Hourly)),
            KeyCode::Char('3') => self.dispatch(Action::SelectView(View::Daily)),
            KeyCode::Char('4') => self.dispatch(Action::SelectView(View::Map)),
            KeyCode::Tab => self.dispatch(Action::NextView),
            KeyCode::BackTab => self.dispatch(Action::PreviousView),
            KeyCode::Char('/') => self.dispatch(Action::StartEditing),
            KeyCode::Char('l') => self.locate(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('?') => self.dispatch(Action::ToggleHelp),
            code if self.state.active_view == View::Map => self.handle_map_key(code),
            _ => {}
        }
    }

    fn handle_map_key(&mut self, code: KeyCode) {
        let (north, east) = match code {
            KeyCode::Up => (MAP_CURSOR_STEP, 0.0),
            KeyCode::Down => (-MAP_CURSOR_STEP, 0.0),
            KeyCode::Right => (0.0, MAP_CURSOR_STEP),
            KeyCode::Left => (0.0, -MAP_CURSOR_STEP),
            KeyCode::Enter => {
                if let Some(cursor) = self.state.map_cursor {
                    self.show_coordinates(cursor);
                }
                return;
            }
            _ => return,
        };
        self.dispatch(Action::MoveMapCursor { north, east });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Locator;
    use std::time::Duration;
    use tempfile::TempDir;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn offline_services() -> Services {
        Services {
            locator: Locator::new().enabled(false),
            ..Services::default()
        }
    }

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = PreferenceStore::with_dir(temp_dir.path().to_path_buf());
        let app = App::with_parts(offline_services(), Some(store), TemperatureUnit::Celsius);
        (app, temp_dir)
    }

    async fn wait_until_idle(app: &mut App) {
        for _ in 0..100 {
            app.poll_fetch();
            if !app.state.loading {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("fetch did not finish");
    }

    #[test]
    fn test_q_quits() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_u_toggles_unit() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.state.unit, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_number_keys_select_views() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.state.active_view, View::Daily);
        app.handle_key(key_event(KeyCode::Char('4')));
        assert_eq!(app.state.active_view, View::Map);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.state.active_view, View::Current);
        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(app.state.active_view, View::Map);
    }

    #[test]
    fn test_typing_q_while_editing_does_not_quit() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.state.input, "q");
    }

    #[test]
    fn test_empty_search_is_rejected() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char(' ')));
        app.handle_key(key_event(KeyCode::Enter));

        assert!(!app.state.editing);
        assert!(!app.state.loading);
        assert_eq!(app.state.error.as_deref(), Some(EMPTY_CITY_MESSAGE));
        assert!(app.last_request.is_none());
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.state.show_help);

        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.state.unit, TemperatureUnit::Celsius);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.state.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_refresh_without_previous_request_does_nothing() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(!app.state.loading);
        assert_eq!(app.state.latest_request, 0);
    }

    #[test]
    fn test_map_keys_ignored_outside_map_view() {
        let (mut app, _dir) = create_test_app();
        app.state.map_cursor = Some(Coordinates::new(10.0, 10.0));
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.state.map_cursor, Some(Coordinates::new(10.0, 10.0)));

        app.handle_key(key_event(KeyCode::Char('4')));
        app.handle_key(key_event(KeyCode::Up));
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.state.map_cursor, Some(Coordinates::new(11.0, 9.0)));
    }

    #[test]
    fn test_map_cursor_moves_only_with_arrow_keys() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('4')));
        app.state.map_cursor = Some(Coordinates::new(10.0, 10.0));

        for c in ['h', 'j', 'k'] {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        assert_eq!(app.state.map_cursor, Some(Coordinates::new(10.0, 10.0)));

        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.state.map_cursor, Some(Coordinates::new(9.0, 11.0)));
    }

    #[tokio::test]
    async fn test_search_failure_sets_error() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        for c in "Paris".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.state.loading);
        assert_eq!(app.last_request, Some(Request::City("Paris".to_string())));

        wait_until_idle(&mut app).await;
        assert_eq!(
            app.state.error.as_deref(),
            Some(crate::fetch::SEARCH_FAILED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_locate_without_fallback_reports_reason() {
        let (mut app, _dir) = create_test_app();
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.last_request, Some(Request::Locate));

        wait_until_idle(&mut app).await;
        let error = app.state.error.clone().unwrap_or_default();
        assert!(error.starts_with("Unable to get your current location."));
    }

    #[tokio::test]
    async fn test_refresh_reissues_with_new_seq() {
        let (mut app, _dir) = create_test_app();
        app.search("Oslo".to_string());
        let first = app.state.latest_request;

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.state.latest_request > first);
        assert_eq!(app.last_request, Some(Request::City("Oslo".to_string())));
        wait_until_idle(&mut app).await;
    }
}
