use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    CityList, CityListProps, Component, HeaderNav, HeaderNavProps, WeatherMap, WeatherMapProps,
};
use crate::action::Action;
use crate::model::{Condition, ListKind};
use crate::state::{AppState, Pane};

pub const FAVORITES_HINT: &str = "Drag a city here (space, then \u{2192})";

/// Props for Dashboard - read-only view of state
pub struct DashboardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Header, both city lists and the map
#[derive(Default)]
pub struct Dashboard {
    header: HeaderNav,
    general: CityList,
    favorites: CityList,
    map: WeatherMap,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys typed while the search box has focus.
    pub fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let props = HeaderNavProps {
            query: &state.search_query,
            sort: state.store.cities().sort_direction(),
            filters: state.store.cities().condition_filters(),
            is_focused: state.focus == Pane::Search,
        };
        self.header.handle_event(event, props).into_iter().collect()
    }

    fn list_props<'a>(state: &'a AppState, list: ListKind, is_focused: bool) -> CityListProps<'a> {
        let (title, empty_hint) = match list {
            ListKind::General => ("Cities", "No cities"),
            ListKind::Favorites => ("Favorites", FAVORITES_HINT),
        };
        let focused_list = match &state.drag {
            Some(drag) => drag.target == list,
            None => state.focus.list() == Some(list),
        };
        CityListProps {
            list,
            title,
            rows: state.rows(list),
            selected: state.selected_index(list),
            is_focused: is_focused && focused_list,
            drag: state.drag.as_ref(),
            active: state.store.cities().active_card(),
            empty_hint,
        }
    }
}

impl Component<Action> for Dashboard {
    type Props<'a> = DashboardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let state = props.state;

        // The list under the pointer (or cursor) gets first pick.
        let list = state
            .drag
            .as_ref()
            .map(|drag| drag.target)
            .or(state.focus.list());
        if let Some(list) = list {
            let actions: Vec<_> = match list {
                ListKind::General => self
                    .general
                    .handle_event(event, Self::list_props(state, list, true))
                    .into_iter()
                    .collect(),
                ListKind::Favorites => self
                    .favorites
                    .handle_event(event, Self::list_props(state, list, true))
                    .into_iter()
                    .collect(),
            };
            if !actions.is_empty() || state.is_dragging() {
                return actions;
            }
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let action = match key.code {
            KeyCode::Char('s') => Some(Action::SortToggle),
            KeyCode::Char('/') => Some(Action::SearchFocus),
            KeyCode::Char('0') => Some(Action::FilterClear),
            KeyCode::Char(digit @ '1'..='7') => {
                let index = digit as usize - '1' as usize;
                Some(Action::FilterToggle(Condition::ALL[index]))
            }
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        };
        action.into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DashboardProps<'_>) {
        let state = props.state;
        let rows = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Lists and map
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let header_props = HeaderNavProps {
            query: &state.search_query,
            sort: state.store.cities().sort_direction(),
            filters: state.store.cities().condition_filters(),
            is_focused: props.is_focused && state.focus == Pane::Search,
        };
        self.header.render(frame, rows[0], header_props);

        let columns = Layout::horizontal([
            Constraint::Percentage(32),
            Constraint::Percentage(32),
            Constraint::Min(20),
        ])
        .split(rows[1]);

        self.general.render(
            frame,
            columns[0],
            Self::list_props(state, ListKind::General, props.is_focused),
        );
        self.favorites.render(
            frame,
            columns[1],
            Self::list_props(state, ListKind::Favorites, props.is_focused),
        );
        self.map.render(
            frame,
            columns[2],
            WeatherMapProps {
                map: state.store.map(),
                markers: state.store.markers(),
            },
        );

        let hints: Vec<StatusBarHint> = if state.is_dragging() {
            vec![
                StatusBarHint::new("\u{2191}\u{2193}", "place"),
                StatusBarHint::new("\u{2190}\u{2192}", "switch list"),
                StatusBarHint::new("space", "drop"),
                StatusBarHint::new("esc", "cancel"),
            ]
        } else if state.focus == Pane::Search {
            vec![
                StatusBarHint::new("enter", "done"),
                StatusBarHint::new("esc", "back"),
            ]
        } else {
            vec![
                StatusBarHint::new("space", "drag"),
                StatusBarHint::new("s", "sort"),
                StatusBarHint::new("/", "search"),
                StatusBarHint::new("1-7", "filter"),
                StatusBarHint::new("tab", "focus"),
                StatusBarHint::new("q", "quit"),
            ]
        };

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            rows[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
