//! Daily forecast panel

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::fmt::Display;

use super::current::capitalize;
use super::temperature_color;
use crate::data::{icon_symbol, DailyEntry, TemperatureUnit};

/// "Today", "Tomorrow", or a short date like "Mon, Jan 1"
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.checked_add_signed(Duration::days(1)) {
        "Tomorrow".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// Clock time in the given zone, like "6:42 AM"
pub fn clock_time<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%-I:%M %p").to_string()
}

pub fn render<Tz>(
    frame: &mut Frame,
    area: Rect,
    days: &[DailyEntry],
    unit: TemperatureUnit,
    today: NaiveDate,
    tz: &Tz,
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let block = Block::default()
        .title(format!(" {}-Day Forecast ", days.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if days.is_empty() {
        frame.render_widget(
            Paragraph::new("No daily forecast available")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let mut lines = Vec::with_capacity(days.len() * 3);
    for day in days {
        lines.extend(day_lines(day, unit, today, tz));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn day_lines<Tz>(
    day: &DailyEntry,
    unit: TemperatureUnit,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<Line<'static>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = day.date();
    let is_today = date == Some(today);
    let label = match date {
        Some(date) => day_label(date, today),
        None => day.date_key.clone(),
    };

    let label_style = if is_today {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let summary = Line::from(vec![
        Span::styled(format!("{:<12}", label), label_style),
        Span::raw(format!("{}  ", icon_symbol(&day.icon_code))),
        Span::styled(
            format!("{:>5}", unit.format(day.max_temperature_c)),
            Style::default()
                .fg(temperature_color(day.max_temperature_c))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" / "),
        Span::styled(
            format!("{:<5}", unit.format(day.min_temperature_c)),
            Style::default().fg(temperature_color(day.min_temperature_c)),
        ),
        Span::raw(format!("  {}", capitalize(&day.condition_text))),
    ]);

    let muted = Style::default().fg(Color::DarkGray);
    let details = Line::from(vec![
        Span::raw(" ".repeat(12)),
        Span::styled(
            format!("rain {:.0}%", day.chance_of_rain_pct),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(format!("  humidity {}%", day.humidity_pct), muted),
        Span::styled(format!("  wind {:.1} km/h", day.wind_speed_kph), muted),
        Span::styled(
            format!(
                "  sunrise {}  sunset {}",
                clock_time(day.sunrise_utc, tz),
                clock_time(day.sunset_utc, tz)
            ),
            muted,
        ),
    ]);

    vec![summary, details, Line::from("")]
}
