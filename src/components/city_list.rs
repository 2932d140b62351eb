use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::drag::DragSession;
use crate::model::{City, ListKind};

const DROP_MARKER: &str = "\u{2500}\u{2500} drop here \u{2500}\u{2500}";
const GRIP: &str = "\u{283f} ";
const STAR: &str = "\u{2605} ";

/// One column of city cards (general list or favorites)
#[derive(Default)]
pub struct CityList;

pub struct CityListProps<'a> {
    pub list: ListKind,
    pub title: &'a str,
    pub rows: &'a [City],
    pub selected: usize,
    pub is_focused: bool,
    pub drag: Option<&'a DragSession>,
    /// Favorite whose marker is pinned on the map
    pub active: Option<&'a str>,
    /// Shown instead of cards when `rows` is empty
    pub empty_hint: &'a str,
}

impl Component<Action> for CityList {
    type Props<'a> = CityListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        if let Some(drag) = props.drag {
            return match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Action::DragMove(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::DragMove(1)),
                KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                    Some(Action::DragRetarget(drag.target.other()))
                }
                KeyCode::Char(' ') | KeyCode::Enter => Some(Action::DragEnd),
                KeyCode::Esc => Some(Action::DragCancel),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(1)),
            KeyCode::Char(' ') if !props.rows.is_empty() => Some(Action::DragStart),
            KeyCode::Enter if props.list == ListKind::Favorites => Some(Action::CardActivate),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ({}) ", props.title, props.rows.len()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = card_lines(&props);
        if lines.is_empty() {
            let hint = Paragraph::new(Line::from(props.empty_hint.dark_gray().italic()));
            frame.render_widget(hint, inner);
            return;
        }

        let cursor = cursor_line(&props);
        let height = usize::from(inner.height).max(1);
        let offset = cursor.map_or(0, |c| (c + 1).saturating_sub(height));
        let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
        frame.render_widget(Paragraph::new(visible), inner);
    }
}

/// Where the insertion marker sits, as an index into `rows`.
fn drop_slot(props: &CityListProps<'_>) -> Option<usize> {
    let drag = props.drag?;
    if drag.target != props.list {
        return None;
    }
    let slot = drag
        .after
        .as_deref()
        .and_then(|after| props.rows.iter().position(|c| c.city == after))
        .map_or(props.rows.len(), |index| index + 1);
    Some(slot)
}

/// Line the viewport keeps on screen.
fn cursor_line(props: &CityListProps<'_>) -> Option<usize> {
    if let Some(slot) = drop_slot(props) {
        return Some(slot);
    }
    (!props.rows.is_empty()).then(|| props.selected.min(props.rows.len() - 1))
}

fn card_lines(props: &CityListProps<'_>) -> Vec<Line<'static>> {
    let slot = drop_slot(props);
    let mut lines = Vec::with_capacity(props.rows.len() + 1);
    for (index, city) in props.rows.iter().enumerate() {
        if slot == Some(index) {
            lines.push(drop_line());
        }
        let dragged = props.drag.is_some_and(|d| d.is_dragging(&city.city));
        let selected = props.is_focused && props.drag.is_none() && index == props.selected;
        let active = props.active == Some(city.city.as_str());
        lines.push(card_line(city, props.list, dragged, selected, active));
    }
    if slot == Some(props.rows.len()) {
        lines.push(drop_line());
    }
    lines
}

fn drop_line() -> Line<'static> {
    Line::from(DROP_MARKER.yellow().bold())
}

/// General list cards are small (name and temperature); favorites also show
/// conditions and wind.
fn card_line(
    city: &City,
    list: ListKind,
    dragged: bool,
    selected: bool,
    active: bool,
) -> Line<'static> {
    let prefix = if dragged {
        GRIP
    } else if active {
        STAR
    } else {
        "  "
    };
    let temperature = if city.temperature > 0 {
        Color::LightRed
    } else {
        Color::LightBlue
    };

    let mut style = Style::default();
    if dragged {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    } else if selected {
        style = style.bg(Color::Rgb(50, 50, 60)).add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(prefix),
        Span::raw(format!("{:<16}", city.city)),
        Span::styled(
            format!("{:>5} ", city.signed_temperature()),
            Style::default().fg(temperature),
        ),
    ];
    if list == ListKind::Favorites {
        let glyphs: String = city.weather.iter().map(|c| c.glyph()).collect();
        spans.push(Span::raw(format!("{glyphs} ")));
        spans.push(Span::styled(
            format!("{} {} m/s", city.wind.direction, city.wind.speed),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans).style(style)
}
