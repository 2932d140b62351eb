//! City store - list membership, search/sort/filter state and map markers
//!
//! `CityState` holds the data and answers queries. `WeatherStore` wraps it
//! with the views and the signal bus: every mutation goes through the store,
//! updates the data, then publishes exactly one signal to the subscribed
//! views before returning.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::effect::Effect;
use crate::model::{
    City, Condition, ConditionFilters, ListKind, MapView, Marker, SortDirection,
    OPACITY_DIM, OPACITY_HIGHLIGHTED,
};
use crate::signal::{Signal, SignalBus, SignalKind};
use crate::views::{FavoritesView, GeneralListView, MapPanelView, Mounted, Subscriber, ViewId};

// ============================================================================
// CityState
// ============================================================================

/// Every loaded city lives in exactly one of `all_cities` / `favorite_cities`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CityState {
    all_cities: Vec<City>,
    favorite_cities: Vec<City>,
    search_text: String,
    sort_direction: SortDirection,
    condition_filters: ConditionFilters,
    map: Option<MapView>,
    markers: Vec<Marker>,
    active_card: Option<String>,
    hovered_card: Option<String>,
}

impl CityState {
    pub fn all_cities(&self) -> &[City] {
        &self.all_cities
    }

    pub fn favorite_cities(&self) -> &[City] {
        &self.favorite_cities
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn condition_filters(&self) -> &ConditionFilters {
        &self.condition_filters
    }

    pub fn list_of(&self, name: &str) -> Option<ListKind> {
        if position(&self.favorite_cities, name).is_some() {
            Some(ListKind::Favorites)
        } else if position(&self.all_cities, name).is_some() {
            Some(ListKind::General)
        } else {
            None
        }
    }

    pub fn find(&self, name: &str) -> Option<&City> {
        self.favorite_cities
            .iter()
            .chain(self.all_cities.iter())
            .find(|c| c.city == name)
    }

    /// Store a freshly fetched feed and return it in the current sort order.
    ///
    /// Names are identities: repeated names (and names already marked as
    /// favorite) are dropped.
    pub fn load(&mut self, cities: Vec<City>) -> Vec<City> {
        let mut seen: HashSet<String> = self
            .favorite_cities
            .iter()
            .map(|c| c.city.clone())
            .collect();
        let mut loaded = Vec::with_capacity(cities.len());
        for city in cities {
            if seen.insert(city.city.clone()) {
                loaded.push(city);
            } else {
                tracing::warn!(city = %city.city, "duplicate city in feed, keeping first");
            }
        }
        let direction = self.sort_direction;
        loaded.sort_by(|a, b| direction.compare(a, b));
        self.all_cities = loaded;
        self.all_cities.clone()
    }

    /// General list as displayed: name contains the search text, sorted.
    pub fn cities_for_general_list(&self) -> Vec<City> {
        let mut cities: Vec<City> = self
            .all_cities
            .iter()
            .filter(|c| c.city.to_lowercase().contains(&self.search_text))
            .cloned()
            .collect();
        let direction = self.sort_direction;
        cities.sort_by(|a, b| direction.compare(a, b));
        cities
    }

    /// Favorites in manual order, keeping only cities that satisfy every
    /// enabled condition flag.
    pub fn favorite_cities_filtered(&self) -> Vec<City> {
        self.favorite_cities
            .iter()
            .filter(|c| self.condition_filters.matches(c))
            .cloned()
            .collect()
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort_direction = direction;
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_lowercase();
    }

    pub fn set_condition_filter(&mut self, condition: Condition, enabled: bool) {
        self.condition_filters.set(condition, enabled);
    }

    pub fn clear_condition_filters(&mut self) {
        self.condition_filters = ConditionFilters::default();
    }

    /// Settle a drop: move `city` into `target`, right after `after`.
    ///
    /// A missing or unknown `after` appends. Dropping into the general list
    /// always appends since that list is re-sorted for display. A city found
    /// in neither list, or a general-to-general drop, leaves the lists as
    /// they are. Returns whether either list changed.
    pub fn reposition(&mut self, city: &str, after: Option<&str>, target: ListKind) -> bool {
        let current = if position(&self.favorite_cities, city).is_some() {
            ListKind::Favorites
        } else {
            ListKind::General
        };

        let moved = match (current, target) {
            (ListKind::Favorites, ListKind::Favorites) => {
                match position(&self.favorite_cities, city) {
                    Some(index) => {
                        let card = self.favorite_cities.remove(index);
                        insert_after(&mut self.favorite_cities, card, after);
                        true
                    }
                    None => false,
                }
            }
            (ListKind::General, ListKind::Favorites) => match position(&self.all_cities, city) {
                Some(index) => {
                    let card = self.all_cities.remove(index);
                    insert_after(&mut self.favorite_cities, card, after);
                    true
                }
                None => {
                    tracing::warn!(city, "dropped city is in neither list");
                    false
                }
            },
            (ListKind::Favorites, ListKind::General) => {
                match position(&self.favorite_cities, city) {
                    Some(index) => {
                        let card = self.favorite_cities.remove(index);
                        self.all_cities.push(card);
                        true
                    }
                    None => false,
                }
            }
            (ListKind::General, ListKind::General) => {
                tracing::debug!(city, "general-to-general drop ignored");
                false
            }
        };

        if moved {
            // Cards are rebuilt after a move, which drops any active highlight.
            self.active_card = None;
            if target == ListKind::General && self.hovered_card.as_deref() == Some(city) {
                self.hovered_card = None;
            }
        }
        moved
    }

    // ===== Map widget and markers =====

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub fn set_map(&mut self, map: MapView) {
        self.map = Some(map);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        self.refresh_marker_opacity();
    }

    pub fn marker(&self, title: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.title == title)
    }

    pub fn active_card(&self) -> Option<&str> {
        self.active_card.as_deref()
    }

    pub fn hovered_card(&self) -> Option<&str> {
        self.hovered_card.as_deref()
    }

    /// Click on a favorite: activate it and center the map on it, or, if it
    /// was already active, deactivate it and frame every marker.
    pub fn toggle_active_card(&mut self, name: &str) {
        let Some(point) = position(&self.favorite_cities, name)
            .map(|index| self.favorite_cities[index].coordinates)
        else {
            return;
        };

        if self.active_card.as_deref() == Some(name) {
            self.active_card = None;
            if let Some(map) = self.map.as_mut() {
                map.fit(&self.markers);
            }
        } else {
            self.active_card = Some(name.to_string());
            if let Some(map) = self.map.as_mut() {
                map.focus(point);
            }
        }
        self.refresh_marker_opacity();
    }

    /// Pointer over a favorite card: its marker is drawn highlighted.
    pub fn set_hovered_card(&mut self, name: Option<&str>) {
        self.hovered_card = name
            .filter(|n| position(&self.favorite_cities, n).is_some())
            .map(str::to_string);
        self.refresh_marker_opacity();
    }

    fn refresh_marker_opacity(&mut self) {
        for marker in &mut self.markers {
            let lit = self.active_card.as_deref() == Some(marker.title.as_str())
                || self.hovered_card.as_deref() == Some(marker.title.as_str());
            marker.opacity = if lit { OPACITY_HIGHLIGHTED } else { OPACITY_DIM };
        }
    }
}

fn position(cities: &[City], name: &str) -> Option<usize> {
    cities.iter().position(|c| c.city == name)
}

fn insert_after(cities: &mut Vec<City>, card: City, after: Option<&str>) {
    let index = after
        .and_then(|name| position(cities, name))
        .map_or(cities.len(), |i| i + 1);
    cities.insert(index, card);
}

// ============================================================================
// WeatherStore
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Views {
    pub general: GeneralListView,
    pub favorites: FavoritesView,
    pub map: MapPanelView,
}

impl Views {
    fn get_mut(&mut self, id: ViewId) -> &mut dyn Subscriber {
        match id {
            ViewId::GeneralList => &mut self.general,
            ViewId::Favorites => &mut self.favorites,
            ViewId::Map => &mut self.map,
        }
    }

    fn get(&self, id: ViewId) -> &dyn Mounted {
        match id {
            ViewId::GeneralList => &self.general,
            ViewId::Favorites => &self.favorites,
            ViewId::Map => &self.map,
        }
    }
}

/// The application's single state container, handed by reference to the
/// components that render it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherStore {
    cities: CityState,
    views: Views,
    bus: SignalBus<ViewId>,
}

impl Default for WeatherStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherStore {
    pub fn new() -> Self {
        let bus = SignalBus::new()
            .with(
                ViewId::GeneralList,
                &[
                    SignalKind::SortChanged,
                    SignalKind::SearchChanged,
                    SignalKind::CardPositionChanged,
                    SignalKind::CitiesLoaded,
                ],
            )
            .with(
                ViewId::Favorites,
                &[
                    SignalKind::FilterChanged,
                    SignalKind::CardPositionChanged,
                    SignalKind::CitiesLoaded,
                ],
            )
            .with(
                ViewId::Map,
                &[SignalKind::CardPositionChanged, SignalKind::MapReady],
            );

        Self {
            cities: CityState::default(),
            views: Views {
                general: GeneralListView::default(),
                favorites: FavoritesView::default(),
                map: MapPanelView::default(),
            },
            bus,
        }
    }

    pub fn cities(&self) -> &CityState {
        &self.cities
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn bus(&self) -> &SignalBus<ViewId> {
        &self.bus
    }

    /// Run every view's mount hook, collecting the effects they request.
    pub fn mount(&self, endpoints: &Endpoints) -> Vec<Effect> {
        ViewId::ALL
            .into_iter()
            .filter_map(|id| self.views.get(id).mounted(endpoints))
            .collect()
    }

    // ===== Queries =====

    pub fn cities_for_general_list(&self) -> Vec<City> {
        self.cities.cities_for_general_list()
    }

    pub fn favorite_cities_filtered(&self) -> Vec<City> {
        self.cities.favorite_cities_filtered()
    }

    pub fn map(&self) -> Option<&MapView> {
        self.cities.map()
    }

    pub fn markers(&self) -> &[Marker] {
        self.cities.markers()
    }

    // ===== Mutations =====

    pub fn load_all_cities(&mut self, cities: Vec<City>) -> Vec<City> {
        let loaded = self.cities.load(cities);
        tracing::info!(count = loaded.len(), "cities loaded");
        self.publish(Signal::CitiesLoaded {
            count: loaded.len(),
        });
        loaded
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.cities.set_sort_direction(direction);
        self.publish(Signal::SortChanged(direction));
    }

    pub fn toggle_sort_direction(&mut self) {
        let direction = self.cities.sort_direction().toggle();
        self.set_sort_direction(direction);
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.cities.set_search_text(text);
        let text = self.cities.search_text().to_string();
        self.publish(Signal::SearchChanged(text));
    }

    pub fn set_condition_filter(&mut self, condition: Condition, enabled: bool) {
        self.cities.set_condition_filter(condition, enabled);
        self.publish(Signal::FilterChanged {
            condition: Some(condition),
            enabled,
        });
    }

    pub fn toggle_condition_filter(&mut self, condition: Condition) {
        let enabled = !self.cities.condition_filters().is_enabled(condition);
        self.set_condition_filter(condition, enabled);
    }

    pub fn clear_condition_filters(&mut self) {
        self.cities.clear_condition_filters();
        self.publish(Signal::FilterChanged {
            condition: None,
            enabled: false,
        });
    }

    pub fn reposition(&mut self, city: &str, after: Option<&str>, target: ListKind) {
        let moved = self.cities.reposition(city, after, target);
        tracing::debug!(city, ?after, ?target, moved, "card repositioned");
        self.publish(Signal::CardPositionChanged {
            city: city.to_string(),
        });
    }

    /// Install the map camera once the map is mounted.
    pub fn set_map(&mut self, map: MapView) {
        self.cities.set_map(map);
        self.publish(Signal::MapReady);
    }

    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.cities.set_markers(markers);
    }

    pub fn toggle_active_card(&mut self, name: &str) {
        self.cities.toggle_active_card(name);
    }

    pub fn set_hovered_card(&mut self, name: Option<&str>) {
        self.cities.set_hovered_card(name);
    }

    fn publish(&mut self, signal: Signal) {
        let Self { cities, views, bus } = self;
        bus.publish(&signal, |id, signal| {
            views.get_mut(id).on_signal(signal, cities)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, WeatherConditions, Wind};
    use pretty_assertions::assert_eq;

    fn city(name: &str) -> City {
        City {
            city: name.into(),
            temperature: 10,
            wind: Wind::default(),
            weather: WeatherConditions::default(),
            coordinates: Coordinates::new(50.0, 30.0),
        }
    }

    fn names(cities: &[City]) -> Vec<&str> {
        cities.iter().map(|c| c.city.as_str()).collect()
    }

    fn loaded(list: &[&str]) -> CityState {
        let mut state = CityState::default();
        state.load(list.iter().map(|n| city(n)).collect());
        state
    }

    #[test]
    fn test_load_sorts_and_drops_duplicates() {
        let mut state = CityState::default();
        let result = state.load(vec![city("Oslo"), city("Berlin"), city("Oslo")]);
        assert_eq!(names(&result), vec!["Berlin", "Oslo"]);
        assert_eq!(names(state.all_cities()), vec!["Berlin", "Oslo"]);
    }

    #[test]
    fn test_load_sorts_by_current_direction() {
        let mut state = CityState::default();
        state.set_sort_direction(SortDirection::Descending);
        let result = state.load(vec![city("A"), city("C"), city("B")]);
        assert_eq!(names(&result), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_reposition_within_favorites_after_predecessor() {
        let mut state = loaded(&["A", "B", "C"]);
        state.reposition("A", None, ListKind::Favorites);
        state.reposition("B", None, ListKind::Favorites);
        state.reposition("C", None, ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["A", "B", "C"]);

        state.reposition("C", Some("A"), ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["A", "C", "B"]);

        state.reposition("A", Some("B"), ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_reposition_unknown_predecessor_appends() {
        let mut state = loaded(&["A", "B", "C"]);
        state.reposition("A", None, ListKind::Favorites);
        state.reposition("B", None, ListKind::Favorites);
        state.reposition("C", Some("Nowhere"), ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["A", "B", "C"]);

        state.reposition("A", Some("Nowhere"), ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_reposition_after_itself_appends() {
        let mut state = loaded(&["A", "B"]);
        state.reposition("A", None, ListKind::Favorites);
        state.reposition("B", None, ListKind::Favorites);
        state.reposition("A", Some("A"), ListKind::Favorites);
        assert_eq!(names(state.favorite_cities()), vec!["B", "A"]);
    }

    #[test]
    fn test_reposition_back_to_general_appends() {
        let mut state = loaded(&["A", "B", "C"]);
        state.reposition("A", None, ListKind::Favorites);
        assert!(state.reposition("A", Some("C"), ListKind::General));
        assert_eq!(names(state.all_cities()), vec!["B", "C", "A"]);
        assert!(state.favorite_cities().is_empty());
        assert_eq!(names(&state.cities_for_general_list()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_reposition_general_to_general_is_noop() {
        let mut state = loaded(&["A", "B"]);
        let before = state.clone();
        assert!(!state.reposition("A", Some("B"), ListKind::General));
        assert_eq!(state, before);
    }

    #[test]
    fn test_reposition_unknown_city_is_noop() {
        let mut state = loaded(&["A", "B"]);
        let before = state.clone();
        assert!(!state.reposition("Z", None, ListKind::Favorites));
        assert_eq!(state, before);
    }

    #[test]
    fn test_search_is_lowercased_substring() {
        let mut state = loaded(&["Paris", "PARANÁ", "Oslo"]);
        state.set_search_text("PaR");
        assert_eq!(state.search_text(), "par");
        assert_eq!(
            names(&state.cities_for_general_list()),
            vec!["PARANÁ", "Paris"]
        );
    }

    #[test]
    fn test_sort_does_not_touch_favorites() {
        let mut state = loaded(&["A", "B", "C"]);
        state.reposition("C", None, ListKind::Favorites);
        state.reposition("A", None, ListKind::Favorites);
        state.set_sort_direction(SortDirection::Descending);
        state.set_search_text("zzz");
        assert_eq!(names(&state.favorite_cities_filtered()), vec!["C", "A"]);
    }

    #[test]
    fn test_toggle_active_card_moves_camera() {
        let mut state = loaded(&["A", "B"]);
        state.reposition("A", None, ListKind::Favorites);
        state.set_map(MapView::at(Coordinates::fallback()));
        state.set_markers(vec![Marker::for_city(&state.favorite_cities()[0])]);

        state.toggle_active_card("A");
        assert_eq!(state.active_card(), Some("A"));
        assert_eq!(state.map().unwrap().center, Coordinates::new(50.0, 30.0));
        assert!(state.marker("A").unwrap().is_highlighted());

        state.toggle_active_card("A");
        assert_eq!(state.active_card(), None);
        assert!(!state.marker("A").unwrap().is_highlighted());
    }

    #[test]
    fn test_toggle_active_ignores_general_cities() {
        let mut state = loaded(&["A"]);
        state.toggle_active_card("A");
        assert_eq!(state.active_card(), None);
    }

    #[test]
    fn test_hover_highlights_marker() {
        let mut state = loaded(&["A", "B"]);
        state.reposition("A", None, ListKind::Favorites);
        state.reposition("B", None, ListKind::Favorites);
        let markers = state.favorite_cities().iter().map(Marker::for_city).collect();
        state.set_markers(markers);

        state.set_hovered_card(Some("B"));
        assert!(state.marker("B").unwrap().is_highlighted());
        assert!(!state.marker("A").unwrap().is_highlighted());

        state.set_hovered_card(None);
        assert!(!state.marker("B").unwrap().is_highlighted());
    }

    #[test]
    fn test_store_publishes_to_subscribed_views_only() {
        let mut store = WeatherStore::new();
        store.load_all_cities(vec![city("A"), city("B")]);
        let general = store.views().general.renders;
        let favorites = store.views().favorites.renders;
        let map = store.views().map.renders;

        store.set_search_text("a");
        assert_eq!(store.views().general.renders, general + 1);
        assert_eq!(store.views().favorites.renders, favorites);
        assert_eq!(store.views().map.renders, map);
        assert_eq!(names(&store.views().general.rows), vec!["A"]);
    }

    #[test]
    fn test_store_reposition_keeps_markers_in_step() {
        let mut store = WeatherStore::new();
        store.load_all_cities(vec![city("A"), city("B"), city("C")]);
        store.reposition("B", None, ListKind::Favorites);
        store.reposition("A", Some("B"), ListKind::Favorites);

        assert_eq!(store.markers().len(), store.cities().favorite_cities().len());
        let titles: Vec<&str> = store.markers().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(names(&store.views().favorites.rows), vec!["B", "A"]);
        assert_eq!(names(&store.views().general.rows), vec!["C"]);
    }
}
