//! Map view: a world map centered on the selected event's location.

use chronoline_engine::Location;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Widget,
    },
};

use crate::ui::{Palette, Styles, Symbols};

/// Deepest zoom level; each level halves the visible span.
pub const MAX_ZOOM: u8 = 8;

/// Visible `(x_bounds, y_bounds)` for a map centered on (`lat`, `lng`).
///
/// Bounds are `[lng_min, lng_max]` and `[lat_min, lat_max]`. The center is
/// clamped so the window never leaves the world.
pub fn map_bounds(lat: f64, lng: f64, zoom: u8) -> ([f64; 2], [f64; 2]) {
    let scale = f64::from(1u32 << zoom.min(MAX_ZOOM));
    let half_lng = 180.0 / scale;
    let half_lat = 90.0 / scale;

    let lng = lng.clamp(-180.0 + half_lng, 180.0 - half_lng);
    let lat = lat.clamp(-90.0 + half_lat, 90.0 - half_lat);

    (
        [lng - half_lng, lng + half_lng],
        [lat - half_lat, lat + half_lat],
    )
}

/// Widget showing a marker at a location. Draws nothing without one.
#[derive(Debug, Clone)]
pub struct MapView<'a> {
    location: Option<&'a Location>,
    zoom: u8,
}

impl<'a> MapView<'a> {
    pub fn new(location: Option<&'a Location>) -> Self {
        Self { location, zoom: 0 }
    }

    #[must_use]
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom.min(MAX_ZOOM);
        self
    }
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(location) = self.location else {
            return;
        };

        let (x_bounds, y_bounds) = map_bounds(location.lat, location.lng, self.zoom);
        let title = if location.name.is_empty() {
            " Map ".to_string()
        } else {
            format!(" Map \u{00b7} {} ", location.name)
        };
        let coordinates = format!(" {:.4}, {:.4} ", location.lat, location.lng);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(Span::styled(title, Styles::title()))
            .title_bottom(Line::from(Span::styled(coordinates, Styles::dim())).right_aligned());

        let (lat, lng) = (location.lat, location.lng);
        let label = if location.name.is_empty() {
            Symbols::MARKER.to_string()
        } else {
            format!("{} {}", Symbols::MARKER, location.name)
        };

        Canvas::default()
            .block(block)
            .background_color(Palette::BG)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: Palette::COASTLINE,
                    resolution: MapResolution::High,
                });
                ctx.layer();
                ctx.draw(&Points {
                    coords: &[(lng, lat)],
                    color: Palette::MARKER,
                });
                ctx.print(lng, lat, Span::styled(label.clone(), Styles::marker()));
            })
            .render(area, buf);
    }
}
