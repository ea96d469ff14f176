//! Hourly forecast panel
//!
//! Shows the first [`HOURLY_DISPLAY_COUNT`] computed entries with a
//! temperature sparkline on top. The slot within an hour of now is labelled
//! "Now" and highlighted.

use chrono::{DateTime, TimeZone, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::fmt::Display;

use super::temperature_color;
use super::widgets::TemperatureSparkline;
use crate::config::HOURLY_DISPLAY_COUNT;
use crate::data::{icon_symbol, HourlyEntry, TemperatureUnit};

/// Longest condition text shown before truncation
const CONDITION_WIDTH: usize = 12;

/// True if `at` is less than an hour away from `now`, in either direction
pub fn is_now(at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (at - now).num_seconds().abs() < 3600
}

/// Cuts long conditions to 12 characters plus "..."
pub fn truncate_condition(text: &str) -> String {
    if text.chars().count() > CONDITION_WIDTH {
        let head: String = text.chars().take(CONDITION_WIDTH).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// "3 PM" for today, "Jun 2, 3 PM" for other days, in the given zone
pub fn time_label<Tz>(at: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = at.with_timezone(tz);
    if local.date_naive() == now.with_timezone(tz).date_naive() {
        local.format("%-I %p").to_string()
    } else {
        local.format("%b %-d, %-I %p").to_string()
    }
}

pub fn render<Tz>(
    frame: &mut Frame,
    area: Rect,
    entries: &[HourlyEntry],
    unit: TemperatureUnit,
    now: DateTime<Utc>,
    tz: &Tz,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let block = Block::default()
        .title(" Hourly Forecast ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let shown: Vec<&HourlyEntry> = entries.iter().take(HOURLY_DISPLAY_COUNT).collect();
    if shown.is_empty() {
        frame.render_widget(
            Paragraph::new("No hourly forecast available")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Sparkline plus spacing
            Constraint::Min(0),    // Rows
        ])
        .split(inner);

    let current_slot = shown.iter().position(|e| is_now(e.date_time_utc, now));
    let temperatures: Vec<f64> = shown
        .iter()
        .map(|e| unit.convert(e.temperature_c))
        .collect();
    let sparkline_area = Rect {
        x: chunks[0].x + 14,
        width: chunks[0].width.saturating_sub(14),
        height: 1,
        ..chunks[0]
    };
    frame.render_widget(
        Paragraph::new(Span::styled("Temperature", Style::default().fg(Color::DarkGray))),
        chunks[0],
    );
    frame.render_widget(
        TemperatureSparkline::new(&temperatures).current_position(current_slot),
        sparkline_area,
    );

    let lines: Vec<Line> = shown
        .iter()
        .enumerate()
        .map(|(i, entry)| hour_line(entry, unit, now, tz, current_slot == Some(i)))
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[1]);
}

fn hour_line<Tz>(
    entry: &HourlyEntry,
    unit: TemperatureUnit,
    now: DateTime<Utc>,
    tz: &Tz,
    highlighted: bool,
) -> Line<'static>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let label = if highlighted {
        "Now".to_string()
    } else {
        time_label(entry.date_time_utc, now, tz)
    };

    let line = Line::from(vec![
        Span::raw(format!("{:<14}", label)),
        Span::raw(format!("{}  ", icon_symbol(&entry.icon_code))),
        Span::styled(
            format!("{:>5}", unit.format(entry.temperature_c)),
            Style::default().fg(temperature_color(entry.temperature_c)),
        ),
        Span::styled(
            format!("  rain {:>3.0}%", entry.chance_of_rain_pct),
            Style::default().fg(Color::Blue),
        ),
        Span::raw(format!("  humidity {:>3}%", entry.humidity_pct)),
        Span::raw(format!("  wind {:>5.1} km/h  ", entry.wind_speed_kph)),
        Span::styled(
            truncate_condition(&entry.condition_text),
            Style::default().fg(Color::Gray),
        ),
    ]);

    if highlighted {
        line.style(
            Style::default()
                .bg(Color::Indexed(61))
                .add_modifier(Modifier::BOLD),
        )
    } else {
        line
    }
}
