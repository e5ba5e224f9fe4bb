//! Map tab.
//!
//! Plots the coordinates found on the current records page over a world
//! coastline. One point can be selected to show its label and open it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    symbols::Marker,
    text::Span,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Map, MapResolution, Points},
    },
};

use dwc_core::core::map::{MapPoint, bounds};

use super::state_renderer::{LoadStateConfig, render_empty};
use super::{Component, styles};

/// Degrees of padding around the points when zoomed to them.
const FIT_MARGIN: f64 = 5.0;

const WORLD: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

#[derive(Debug, Default)]
pub struct MapView {
    points: Vec<MapPoint>,
    selected: Option<usize>,
    /// Zoom to the points instead of showing the whole world.
    fit: bool,
}

impl MapView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the plotted points, e.g. after a new page arrived.
    pub fn set_points(&mut self, points: Vec<MapPoint>) {
        self.selected = match self.selected {
            _ if points.is_empty() => None,
            Some(i) => Some(i.min(points.len() - 1)),
            None => Some(0),
        };
        self.points = points;
    }

    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    pub fn selected_point(&self) -> Option<&MapPoint> {
        self.points.get(self.selected?)
    }

    pub fn is_fit(&self) -> bool {
        self.fit
    }

    fn select_next(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1) % self.points.len());
        }
    }

    fn select_previous(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.checked_sub(1).unwrap_or(self.points.len() - 1));
        }
    }

    /// Visible window `(min_lng, min_lat, max_lng, max_lat)`.
    pub fn viewport(&self) -> (f64, f64, f64, f64) {
        if !self.fit {
            return WORLD;
        }
        bounds(&self.points, FIT_MARGIN).unwrap_or(WORLD)
    }
}

impl Component for MapView {
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let title = format!(" Map ({} points) ", self.points.len());
        if self.points.is_empty() {
            let config = LoadStateConfig::new(&title, focused);
            render_empty(frame, area, &config, "No records with coordinates on this page.");
            return;
        }

        let mut block = Block::default()
            .title(Span::styled(title, styles::modal_title_style()))
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused));
        if let Some(point) = self.selected_point() {
            let label = point.label.as_deref().unwrap_or("(no label)");
            block = block.title_bottom(format!(
                " #{} {} ({:.4}, {:.4}) ",
                point.row + 1,
                label,
                point.lat,
                point.lng
            ));
        }

        let (min_lng, min_lat, max_lng, max_lat) = self.viewport();
        let coords: Vec<(f64, f64)> = self.points.iter().map(|p| (p.lng, p.lat)).collect();
        let selected = self.selected_point().map(|p| (p.lng, p.lat));

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([min_lng, max_lng])
            .y_bounds([min_lat, max_lat])
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: styles::MAP_COASTLINE,
                    resolution: MapResolution::High,
                });
                ctx.layer();
                ctx.draw(&Points {
                    coords: &coords,
                    color: styles::MAP_POINT,
                });
                if let Some(point) = selected {
                    ctx.layer();
                    ctx.draw(&Points {
                        coords: &[point],
                        color: styles::MAP_POINT_SELECTED,
                    });
                }
            });
        frame.render_widget(canvas, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(']') => {
                self.select_next();
                true
            }
            KeyCode::Char('[') => {
                self.select_previous();
                true
            }
            KeyCode::Char('z') => {
                self.fit = !self.fit;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::buffer_text;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    fn point(row: usize, lat: f64, lng: f64) -> MapPoint {
        MapPoint {
            row,
            lat,
            lng,
            label: Some(format!("specimen {}", row)),
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_wraps_around() {
        let mut view = MapView::new();
        view.set_points(vec![point(0, 10.0, 20.0), point(3, -5.0, 40.0)]);
        assert_eq!(view.selected_point().map(|p| p.row), Some(0));
        view.handle_key(key('['));
        assert_eq!(view.selected_point().map(|p| p.row), Some(3));
        view.handle_key(key(']'));
        assert_eq!(view.selected_point().map(|p| p.row), Some(0));
    }

    #[test]
    fn test_selection_survives_fewer_points() {
        let mut view = MapView::new();
        view.set_points(vec![point(0, 1.0, 1.0), point(1, 2.0, 2.0)]);
        view.handle_key(key(']'));
        view.set_points(vec![point(4, 3.0, 3.0)]);
        assert_eq!(view.selected_point().map(|p| p.row), Some(4));
        view.set_points(Vec::new());
        assert!(view.selected_point().is_none());
    }

    #[test]
    fn test_zoom_toggles_viewport() {
        let mut view = MapView::new();
        view.set_points(vec![point(0, 10.0, 20.0), point(1, 20.0, 30.0)]);
        assert_eq!(view.viewport(), WORLD);
        assert!(view.handle_key(key('z')));
        assert!(view.is_fit());
        assert_eq!(view.viewport(), (15.0, 5.0, 35.0, 25.0));
    }

    #[test]
    fn test_draw_empty_and_with_points() {
        let mut view = MapView::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| view.draw(frame, frame.area(), true))
            .unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("No records with coordinates"));

        view.set_points(vec![point(0, 37.8, -122.2)]);
        terminal
            .draw(|frame| view.draw(frame, frame.area(), true))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Map (1 points)"));
        assert!(text.contains("specimen 0"));
    }
}
