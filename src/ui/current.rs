//! Current conditions panel

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::temperature_color;
use crate::data::weather::icon_url;
use crate::data::{icon_symbol, CurrentConditions, TemperatureUnit};

/// Upper-cases the first letter ("clear sky" -> "Clear sky")
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    current: &CurrentConditions,
    location: &str,
    unit: TemperatureUnit,
) {
    let block = Block::default()
        .title(format!(" {} ", location))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Temperature and condition
            Constraint::Min(0),    // Details
        ])
        .split(inner);

    let headline = vec![
        Line::from(vec![
            Span::raw(format!("{}  ", icon_symbol(&current.icon_code))),
            Span::styled(
                unit.format(current.temperature_c),
                Style::default()
                    .fg(temperature_color(current.temperature_c))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            capitalize(&current.condition_text),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];
    frame.render_widget(
        Paragraph::new(headline).alignment(Alignment::Center),
        chunks[0],
    );

    let label = Style::default().fg(Color::DarkGray);
    let mut details = vec![
        Line::from(vec![
            Span::styled("Humidity     ", label),
            Span::raw(format!("{}%", current.humidity_pct)),
        ]),
        Line::from(vec![
            Span::styled("Wind         ", label),
            Span::raw(format!("{:.1} km/h", current.wind_speed_kph)),
        ]),
        Line::from(vec![
            Span::styled("Coordinates  ", label),
            Span::raw(current.coordinates.label()),
        ]),
    ];
    if !current.icon_code.is_empty() {
        details.push(Line::from(vec![
            Span::styled("Icon         ", label),
            Span::styled(icon_url(&current.icon_code), Style::default().fg(Color::Blue)),
        ]));
    }
    frame.render_widget(
        Paragraph::new(details).wrap(Wrap { trim: true }),
        chunks[1],
    );
}
