use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::model::{Condition, ConditionFilters, SortDirection};

const PLACEHOLDER: &str = "Search cities...";

/// Top bar: sort direction, search box and condition filter toggles
pub struct HeaderNav {
    input: TextInput,
}

impl Default for HeaderNav {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

pub struct HeaderNavProps<'a> {
    pub query: &'a str,
    pub sort: SortDirection,
    pub filters: &'a ConditionFilters,
    /// True while the search box has keyboard focus
    pub is_focused: bool,
}

impl HeaderNav {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_style() -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(Color::Rgb(50, 50, 60)),
                fg: None,
            },
            placeholder_style: None,
            cursor_style: None,
        }
    }
}

impl Component<Action> for HeaderNav {
    type Props<'a> = HeaderNavProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => vec![Action::SearchBlur],
            _ => self
                .input
                .handle_event(
                    event,
                    TextInputProps {
                        value: props.query,
                        placeholder: PLACEHOLDER,
                        is_focused: true,
                        style: Self::input_style(),
                        on_change: Action::SearchChange,
                        on_submit: |_| Action::SearchBlur,
                        on_cursor_move: Some(|_| Action::Render),
                    },
                )
                .into_iter()
                .collect(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::horizontal([
            Constraint::Length(9),  // Sort
            Constraint::Min(16),    // Search
            Constraint::Length(30), // Filters
        ])
        .spacing(1)
        .split(area);

        let sort = Paragraph::new(Line::from(vec![
            Span::styled("s ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                props.sort.arrow(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        frame.render_widget(sort, chunks[0]);

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused,
            style: Self::input_style(),
            on_change: Action::SearchChange,
            on_submit: |_| Action::SearchBlur,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, chunks[1], input_props);

        frame.render_widget(Paragraph::new(filter_line(props.filters)), chunks[2]);
    }
}

/// `1☀ 2☁ ...` with enabled conditions lit up.
fn filter_line(filters: &ConditionFilters) -> Line<'static> {
    let mut spans = Vec::with_capacity(Condition::ALL.len() * 2);
    for (index, condition) in Condition::ALL.into_iter().enumerate() {
        let style = if filters.is_enabled(condition) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("{}{}", index + 1, condition.glyph()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn props(filters: &ConditionFilters, is_focused: bool) -> HeaderNavProps<'_> {
        HeaderNavProps {
            query: "",
            sort: SortDirection::Ascending,
            filters,
            is_focused,
        }
    }

    #[test]
    fn test_typing_changes_search() {
        let filters = ConditionFilters::default();
        let mut header = HeaderNav::new();
        let actions: Vec<_> = header
            .handle_event(&EventKind::Key(key("p")), props(&filters, true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchChange("p".into()));
    }

    #[test]
    fn test_escape_leaves_search() {
        let filters = ConditionFilters::default();
        let mut header = HeaderNav::new();
        let esc = EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        let actions: Vec<_> = header
            .handle_event(&esc, props(&filters, true))
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchBlur);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let filters = ConditionFilters::default();
        let mut header = HeaderNav::new();
        let actions: Vec<_> = header
            .handle_event(&EventKind::Key(key("p")), props(&filters, false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_shows_sort_and_filters() {
        let mut filters = ConditionFilters::default();
        filters.set(Condition::Rainy, true);
        let mut render = RenderHarness::new(80, 1);
        let mut header = HeaderNav::new();
        let output = render.render_to_string_plain(|frame| {
            header.render(frame, frame.area(), props(&filters, false));
        });
        assert!(output.contains("A\u{2192}Z"));
        assert!(output.contains("Search cities..."));
        assert!(output.contains("5\u{2614}"));
    }
}
