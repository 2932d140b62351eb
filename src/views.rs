//! Render snapshots for each independently drawn part of the dashboard
//!
//! A view never trusts signal payloads: on every signal it is subscribed to
//! it re-queries the store and rebuilds its snapshot from scratch.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::effect::Effect;
use crate::model::{City, Marker};
use crate::signal::Signal;
use crate::store::CityState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ViewId {
    GeneralList,
    Favorites,
    Map,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::GeneralList, ViewId::Favorites, ViewId::Map];
}

/// Reacts to store signals by rebuilding its own snapshot.
pub trait Subscriber {
    fn on_signal(&mut self, signal: &Signal, cities: &mut CityState);
}

/// Side effects a view needs once it is on screen.
pub trait Mounted {
    fn mounted(&self, _endpoints: &Endpoints) -> Option<Effect> {
        None
    }
}

/// Small cards: every non-favorite city matching the search, sorted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneralListView {
    pub rows: Vec<City>,
    pub renders: u32,
}

impl Subscriber for GeneralListView {
    fn on_signal(&mut self, signal: &Signal, cities: &mut CityState) {
        self.rows = cities.cities_for_general_list();
        self.renders += 1;
        tracing::trace!(?signal, rows = self.rows.len(), "general list rebuilt");
    }
}

impl Mounted for GeneralListView {
    fn mounted(&self, endpoints: &Endpoints) -> Option<Effect> {
        Some(Effect::LoadCities {
            url: endpoints.feed_url.clone(),
        })
    }
}

/// Big cards: favorites in manual order, narrowed by the condition filters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FavoritesView {
    pub rows: Vec<City>,
    pub renders: u32,
}

impl Subscriber for FavoritesView {
    fn on_signal(&mut self, signal: &Signal, cities: &mut CityState) {
        self.rows = cities.favorite_cities_filtered();
        self.renders += 1;
        tracing::trace!(?signal, rows = self.rows.len(), "favorites rebuilt");
    }
}

impl Mounted for FavoritesView {}

/// Map pins. Owns the marker list: one dim marker per favorite, rebuilt
/// wholesale, with the camera re-framed around them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapPanelView {
    pub renders: u32,
}

impl Subscriber for MapPanelView {
    fn on_signal(&mut self, signal: &Signal, cities: &mut CityState) {
        let markers: Vec<Marker> = cities
            .favorite_cities()
            .iter()
            .map(Marker::for_city)
            .collect();
        cities.set_markers(markers);

        if let Some(mut map) = cities.map().copied() {
            map.fit(cities.markers());
            cities.set_map(map);
        }
        self.renders += 1;
        tracing::trace!(?signal, markers = cities.markers().len(), "map rebuilt");
    }
}

impl Mounted for MapPanelView {
    fn mounted(&self, endpoints: &Endpoints) -> Option<Effect> {
        Some(Effect::Locate {
            url: endpoints.geo_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, ListKind, MapView, WeatherConditions, Wind};

    fn city(name: &str, lat: f64) -> City {
        City {
            city: name.into(),
            temperature: 1,
            wind: Wind::default(),
            weather: WeatherConditions::default(),
            coordinates: Coordinates::new(lat, 10.0),
        }
    }

    #[test]
    fn test_map_view_rebuilds_one_marker_per_favorite() {
        let mut cities = CityState::default();
        cities.load(vec![city("A", 40.0), city("B", 60.0), city("C", 0.0)]);
        cities.set_map(MapView::at(Coordinates::fallback()));
        cities.reposition("A", None, ListKind::Favorites);
        cities.reposition("B", None, ListKind::Favorites);

        let mut view = MapPanelView::default();
        view.on_signal(&Signal::MapReady, &mut cities);

        assert_eq!(view.renders, 1);
        assert_eq!(cities.markers().len(), 2);
        assert!(cities.markers().iter().all(|m| !m.is_highlighted()));
        assert_eq!(cities.map().unwrap().center, Coordinates::new(50.0, 10.0));
    }

    #[test]
    fn test_map_view_without_favorites_returns_home() {
        let mut cities = CityState::default();
        let home = Coordinates::new(1.0, 1.0);
        let mut map = MapView::at(home);
        map.focus(Coordinates::new(20.0, 20.0));
        cities.set_map(map);

        let mut view = MapPanelView::default();
        view.on_signal(&Signal::MapReady, &mut cities);

        assert!(cities.markers().is_empty());
        assert_eq!(cities.map().unwrap().center, home);
    }

    #[test]
    fn test_mount_hooks() {
        let endpoints = Endpoints::default();
        assert!(matches!(
            GeneralListView::default().mounted(&endpoints),
            Some(Effect::LoadCities { .. })
        ));
        assert!(matches!(
            MapPanelView::default().mounted(&endpoints),
            Some(Effect::Locate { .. })
        ));
        assert!(FavoritesView::default().mounted(&endpoints).is_none());
    }
}
