//! Map panel
//!
//! A canvas world map centred on the shown location, with a marker, a label
//! carrying the place name and temperature, and the cursor used to pick a new
//! location.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::data::Coordinates;
use crate::state::DashboardState;

/// Half the width of the visible window, in degrees of longitude
const HALF_SPAN_LON: f64 = 30.0;
/// Half the height of the visible window, in degrees of latitude
const HALF_SPAN_LAT: f64 = 15.0;

/// Visible `(x_bounds, y_bounds)` around a point, kept inside the world
pub fn viewport(center: Coordinates) -> ([f64; 2], [f64; 2]) {
    let lon = center
        .longitude
        .clamp(-180.0 + HALF_SPAN_LON, 180.0 - HALF_SPAN_LON);
    let lat = center
        .latitude
        .clamp(-90.0 + HALF_SPAN_LAT, 90.0 - HALF_SPAN_LAT);
    (
        [lon - HALF_SPAN_LON, lon + HALF_SPAN_LON],
        [lat - HALF_SPAN_LAT, lat + HALF_SPAN_LAT],
    )
}

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let block = Block::default()
        .title(" Map ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(forecast) = state.forecast.as_ref() else {
        frame.render_widget(
            Paragraph::new("No location to show")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let location = forecast.current.coordinates;
    let cursor = state.map_cursor.unwrap_or(location);
    let (x_bounds, y_bounds) = viewport(cursor);

    let name = state
        .display_name
        .clone()
        .unwrap_or_else(|| forecast.city_name.clone());
    let label = format!(
        " {} {}",
        name,
        state.unit.format(forecast.current.temperature_c)
    );

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Green,
                resolution: MapResolution::High,
            });
            ctx.layer();
            if cursor != location {
                ctx.draw(&Points {
                    coords: &[(cursor.longitude, cursor.latitude)],
                    color: Color::Yellow,
                });
                ctx.print(
                    cursor.longitude,
                    cursor.latitude,
                    Span::styled("+", Style::default().fg(Color::Yellow)),
                );
            }
            ctx.draw(&Points {
                coords: &[(location.longitude, location.latitude)],
                color: Color::Red,
            });
            ctx.print(
                location.longitude,
                location.latitude,
                Span::styled(label.clone(), Style::default().fg(Color::White)),
            );
        });
    frame.render_widget(canvas, chunks[0]);

    let hint = Line::from(vec![
        Span::styled("←↑↓→", Style::default().fg(Color::Yellow)),
        Span::raw(" move cursor  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" show weather at {}", cursor.label())),
    ]);
    frame.render_widget(Paragraph::new(hint), chunks[1]);
}
