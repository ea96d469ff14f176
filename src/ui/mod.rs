//! UI rendering module for weatherdash
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Everything here reads a
//! `DashboardState` and never mutates it.

pub mod current;
pub mod daily;
pub mod help_overlay;
pub mod hourly;
pub mod map;
pub mod widgets;

use chrono::{Local, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::state::{DashboardState, View};

pub use help_overlay::render as render_help_overlay;

/// Color for temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(celsius: f64) -> Color {
    if celsius >= 30.0 {
        Color::Red
    } else if celsius >= 25.0 {
        Color::LightRed
    } else if celsius >= 20.0 {
        Color::Yellow
    } else if celsius >= 10.0 {
        Color::Green
    } else if celsius >= 0.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the whole dashboard
pub fn render(frame: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header and tabs
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Active panel
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_search(frame, chunks[1], state);
    render_body(frame, chunks[2], state);
    render_status(frame, chunks[3], state);

    if state.show_help {
        help_overlay::render(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, view.title())))
        .collect();

    let location = state.display_name.as_deref().unwrap_or("No location");
    let title = format!(" weatherdash | {} | {} ", location, state.unit.symbol());

    let tabs = Tabs::new(titles)
        .select(state.active_view.index())
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_search(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let (border_style, title) = if state.editing {
        (
            Style::default().fg(Color::Yellow),
            " Search city (Enter to search, Esc to cancel) ",
        )
    } else {
        (Style::default().fg(Color::DarkGray), " Search city (/ to edit) ")
    };

    let text = if state.input.is_empty() && !state.editing {
        Span::styled("Enter city name...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.input.clone())
    };

    let paragraph = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if state.editing {
        let typed = u16::try_from(state.input.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(typed);
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        frame.set_cursor_position((x.min(max_x), area.y + 1));
    }
}

fn render_body(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let Some(forecast) = state.forecast.as_ref() else {
        render_placeholder(frame, area, state);
        return;
    };

    match state.active_view {
        View::Current => current::render(
            frame,
            area,
            &forecast.current,
            state.display_name.as_deref().unwrap_or(&forecast.city_name),
            state.unit,
        ),
        View::Hourly => hourly::render(
            frame,
            area,
            &forecast.hourly_forecast,
            state.unit,
            Utc::now(),
            &Local,
        ),
        View::Daily => daily::render(
            frame,
            area,
            &forecast.daily_forecast,
            state.unit,
            Local::now().date_naive(),
            &Local,
        ),
        View::Map => map::render(frame, area, state),
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let (text, color) = if state.loading {
        ("Loading weather data...", Color::Cyan)
    } else {
        (
            "Press / to search for a city or l to use your location",
            Color::DarkGray,
        )
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, chunks[1]);
}

fn render_status(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let line = if state.loading {
        Line::from(Span::styled(
            "Loading weather data...",
            Style::default().fg(Color::Cyan),
        ))
    } else if let Some(error) = &state.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::styled("?", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" help  "),
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ])
    };

    frame.render_widget(Paragraph::new(line), area);
}
