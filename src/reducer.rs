//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::drag::DragSession;
use crate::effect::Effect;
use crate::model::{ListKind, MapView};
use crate::state::{AppState, Pane};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let effects = state.store.mount(&state.endpoints);
            for effect in &effects {
                match effect {
                    Effect::LoadCities { .. } => state.feed = DataResource::Loading,
                    Effect::Locate { .. } => state.location = DataResource::Loading,
                }
            }
            let mut result = DispatchResult::changed();
            result.effects.extend(effects);
            result
        }

        // ===== Async results =====
        Action::FeedDidLoad(cities) => {
            let loaded = state.store.load_all_cities(cities);
            state.feed = DataResource::Loaded(loaded.len());
            state.general_selected = 0;
            DispatchResult::changed()
        }

        Action::LocationDidLoad(point) => {
            state.store.set_map(MapView::at(point));
            state.location = DataResource::Loaded(point);
            DispatchResult::changed()
        }

        // ===== Controls =====
        Action::SortSet(direction) => {
            if state.store.cities().sort_direction() == direction {
                return DispatchResult::unchanged();
            }
            state.store.set_sort_direction(direction);
            DispatchResult::changed()
        }

        Action::SortToggle => {
            state.store.toggle_sort_direction();
            DispatchResult::changed()
        }

        Action::SearchFocus => {
            if state.is_dragging() {
                return DispatchResult::unchanged();
            }
            state.focus = Pane::Search;
            sync_hover(state);
            DispatchResult::changed()
        }

        Action::SearchChange(text) => {
            state.store.set_search_text(&text);
            state.search_query = text;
            state.general_selected = 0;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            state.focus = Pane::General;
            DispatchResult::changed()
        }

        Action::FilterToggle(condition) => {
            state.store.toggle_condition_filter(condition);
            sync_hover(state);
            DispatchResult::changed()
        }

        Action::FilterClear => {
            if state.store.cities().condition_filters().is_empty() {
                return DispatchResult::unchanged();
            }
            state.store.clear_condition_filters();
            sync_hover(state);
            DispatchResult::changed()
        }

        // ===== Navigation =====
        Action::FocusNext | Action::FocusPrev => {
            if state.is_dragging() {
                return DispatchResult::unchanged();
            }
            state.focus = if action == Action::FocusNext {
                state.focus.next()
            } else {
                state.focus.prev()
            };
            sync_hover(state);
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let Some(list) = state.focus.list() else {
                return DispatchResult::unchanged();
            };
            let len = state.rows(list).len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            let current = state.selected_index(list) as i64;
            let next = (current + i64::from(delta)).clamp(0, len as i64 - 1) as usize;
            if next as i64 == current {
                return DispatchResult::unchanged();
            }
            match list {
                ListKind::General => state.general_selected = next,
                ListKind::Favorites => state.favorites_selected = next,
            }
            sync_hover(state);
            DispatchResult::changed()
        }

        Action::CardActivate => {
            if state.focus != Pane::Favorites || state.is_dragging() {
                return DispatchResult::unchanged();
            }
            let Some(name) = state.selected_city().map(|c| c.city.clone()) else {
                return DispatchResult::unchanged();
            };
            state.store.toggle_active_card(&name);
            DispatchResult::changed()
        }

        // ===== Drag and drop =====
        Action::DragStart => {
            if state.is_dragging() {
                return DispatchResult::unchanged();
            }
            let Some(list) = state.focus.list() else {
                return DispatchResult::unchanged();
            };
            let index = state.selected_index(list);
            let rows = state.rows(list);
            let Some(city) = rows.get(index) else {
                return DispatchResult::unchanged();
            };
            let mut drag = DragSession::start(&city.city, list);
            // Dropping right away keeps a favorite where it is.
            if list == ListKind::Favorites && index > 0 {
                drag.pointer = Some(index - 1);
                drag.hover(ListKind::Favorites, Some(&rows[index - 1].city));
            }
            state.drag = Some(drag);
            DispatchResult::changed()
        }

        Action::DragMove(delta) => {
            let Some(drag) = state.drag.as_mut() else {
                return DispatchResult::unchanged();
            };
            let rows = match drag.target {
                ListKind::General => &state.store.views().general.rows,
                ListKind::Favorites => &state.store.views().favorites.rows,
            };
            drag.step(delta, rows);
            DispatchResult::changed()
        }

        Action::DragRetarget(target) => {
            let Some(drag) = state.drag.as_mut() else {
                return DispatchResult::unchanged();
            };
            drag.retarget(target);
            DispatchResult::changed()
        }

        Action::DragEnd => {
            let Some(drag) = state.drag.take() else {
                return DispatchResult::unchanged();
            };
            let settlement = drag.finish();
            state
                .store
                .reposition(&settlement.city, settlement.after.as_deref(), settlement.target);

            // Follow the card into the list it landed in.
            let landed = state.store.cities().list_of(&settlement.city);
            if let Some(list) = landed {
                let index = state
                    .rows(list)
                    .iter()
                    .position(|c| c.city == settlement.city);
                match list {
                    ListKind::General => {
                        state.focus = Pane::General;
                        state.general_selected = index.unwrap_or(0);
                    }
                    ListKind::Favorites => {
                        state.focus = Pane::Favorites;
                        state.favorites_selected = index.unwrap_or(0);
                    }
                }
            }
            sync_hover(state);
            DispatchResult::changed()
        }

        Action::DragCancel => {
            if state.drag.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// The favorite under the cursor lights up its map marker.
fn sync_hover(state: &mut AppState) {
    let hovered = match state.focus {
        Pane::Favorites => state.selected_city().map(|c| c.city.clone()),
        _ => None,
    };
    state.store.set_hovered_card(hovered.as_deref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{City, Coordinates, SortDirection, WeatherConditions, Wind};

    fn city(name: &str) -> City {
        City {
            city: name.into(),
            temperature: 5,
            wind: Wind::default(),
            weather: WeatherConditions::default(),
            coordinates: Coordinates::new(55.0, 37.0),
        }
    }

    fn loaded_state(names: &[&str]) -> AppState {
        let mut state = AppState::default();
        reducer(
            &mut state,
            Action::FeedDidLoad(names.iter().map(|n| city(n)).collect()),
        );
        state
    }

    #[test]
    fn test_init_requests_feed_and_location() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert_eq!(result.effects.len(), 2);
        assert!(matches!(result.effects[0], Effect::LoadCities { .. }));
        assert!(matches!(result.effects[1], Effect::Locate { .. }));
        assert!(state.feed.is_loading());
        assert!(state.location.is_loading());
    }

    #[test]
    fn test_feed_did_load_fills_general_list() {
        let state = loaded_state(&["Oslo", "Berlin"]);
        assert!(state.feed.is_loaded());
        assert_eq!(state.feed.data(), Some(&2));
        assert_eq!(state.rows(ListKind::General).len(), 2);
        assert_eq!(state.rows(ListKind::General)[0].city, "Berlin");
    }

    #[test]
    fn test_sort_set_same_direction_is_unchanged() {
        let mut state = loaded_state(&["A"]);
        let result = reducer(&mut state, Action::SortSet(SortDirection::Ascending));
        assert!(!result.changed);
        let result = reducer(&mut state, Action::SortSet(SortDirection::Descending));
        assert!(result.changed);
    }

    #[test]
    fn test_drag_general_card_into_favorites() {
        let mut state = loaded_state(&["A", "B", "C"]);
        reducer(&mut state, Action::SelectionMove(1));
        reducer(&mut state, Action::DragStart);
        assert!(state.is_dragging());

        reducer(&mut state, Action::DragRetarget(ListKind::Favorites));
        // Nothing is committed before the drop.
        assert!(state.store.cities().favorite_cities().is_empty());

        reducer(&mut state, Action::DragEnd);
        assert!(!state.is_dragging());
        assert_eq!(state.focus, Pane::Favorites);
        assert_eq!(state.rows(ListKind::Favorites)[0].city, "B");
        assert_eq!(state.store.markers().len(), 1);
    }

    #[test]
    fn test_drag_cancel_commits_nothing() {
        let mut state = loaded_state(&["A", "B"]);
        reducer(&mut state, Action::DragStart);
        reducer(&mut state, Action::DragRetarget(ListKind::Favorites));
        reducer(&mut state, Action::DragCancel);

        assert!(!state.is_dragging());
        assert!(state.store.cities().favorite_cities().is_empty());
        assert_eq!(state.store.cities().all_cities().len(), 2);
    }

    #[test]
    fn test_card_activate_requires_favorites_focus() {
        let mut state = loaded_state(&["A"]);
        let result = reducer(&mut state, Action::CardActivate);
        assert!(!result.changed);

        reducer(&mut state, Action::DragStart);
        reducer(&mut state, Action::DragRetarget(ListKind::Favorites));
        reducer(&mut state, Action::DragEnd);
        let result = reducer(&mut state, Action::CardActivate);
        assert!(result.changed);
        assert_eq!(state.store.cities().active_card(), Some("A"));
    }

    #[test]
    fn test_focus_is_locked_while_dragging() {
        let mut state = loaded_state(&["A"]);
        reducer(&mut state, Action::DragStart);
        let result = reducer(&mut state, Action::FocusNext);
        assert!(!result.changed);
        assert_eq!(state.focus, Pane::General);
    }
}
