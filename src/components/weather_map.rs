use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Map, MapResolution},
    },
};

use super::Component;
use crate::action::Action;
use crate::model::{MapView, Marker};

const PIN: &str = "\u{25cf}";

/// World map with one pin per favorite city
#[derive(Default)]
pub struct WeatherMap;

pub struct WeatherMapProps<'a> {
    /// `None` until geolocation has resolved
    pub map: Option<&'a MapView>,
    pub markers: &'a [Marker],
}

impl Component<Action> for WeatherMap {
    type Props<'a> = WeatherMapProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Map ");

        let Some(map) = props.map else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let locating = Paragraph::new("Locating\u{2026}".dark_gray())
                .alignment(Alignment::Center);
            let middle = Rect {
                y: inner.y + inner.height / 2,
                height: inner.height.min(1),
                ..inner
            };
            frame.render_widget(locating, middle);
            return;
        };

        let inner = block.inner(area);
        // Braille cells are two dots wide and four tall.
        let aspect = f64::from(inner.width.max(1)) * 2.0 / (f64::from(inner.height.max(1)) * 4.0);
        let (x_bounds, y_bounds) = map.bounds(aspect);

        let canvas = Canvas::default()
            .block(block)
            .marker(symbols::Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: Color::DarkGray,
                });
                ctx.layer();
                for marker in props.markers {
                    let style = if marker.is_highlighted() {
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ctx.print(
                        marker.coordinates.longitude,
                        marker.coordinates.latitude,
                        Line::from(vec![
                            Span::styled(PIN, style),
                            Span::styled(format!(" {}", marker.title), style),
                        ]),
                    );
                }
            });
        frame.render_widget(canvas, area);
    }
}
