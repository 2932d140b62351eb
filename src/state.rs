//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::config::Endpoints;
use crate::drag::DragSession;
use crate::model::{City, Coordinates, ListKind};
use crate::store::WeatherStore;

/// Which part of the screen receives keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Pane {
    Search,
    #[default]
    General,
    Favorites,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::General => Pane::Favorites,
            Pane::Favorites => Pane::Search,
            Pane::Search => Pane::General,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pane::General => Pane::Search,
            Pane::Favorites => Pane::General,
            Pane::Search => Pane::Favorites,
        }
    }

    pub fn list(self) -> Option<ListKind> {
        match self {
            Pane::General => Some(ListKind::General),
            Pane::Favorites => Some(ListKind::Favorites),
            Pane::Search => None,
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Store (visible in debug) ---
    /// Cities, favorites, search/sort/filter state, map and markers
    #[debug(section = "Cities", label = "Store", debug_fmt)]
    pub store: WeatherStore,

    /// Feed lifecycle: Empty → Loading → Loaded(count)
    #[debug(section = "Cities", label = "Feed", debug_fmt)]
    pub feed: DataResource<usize>,

    /// Geolocation lifecycle: Empty → Loading → Loaded(point)
    #[debug(section = "Map", label = "Location", debug_fmt)]
    pub location: DataResource<Coordinates>,

    /// Card currently being dragged, if any
    #[debug(section = "UI", label = "Drag", debug_fmt)]
    pub drag: Option<DragSession>,

    #[debug(section = "UI", label = "Focus", debug_fmt)]
    pub focus: Pane,

    // --- Cursor internals (skipped) ---
    #[debug(skip)]
    pub general_selected: usize,

    #[debug(skip)]
    pub favorites_selected: usize,

    /// Search box text as typed (the store keeps it lower-cased)
    #[debug(skip)]
    pub search_query: String,

    #[debug(skip)]
    pub endpoints: Endpoints,
}

impl AppState {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            store: WeatherStore::new(),
            feed: DataResource::Empty,
            location: DataResource::Empty,
            drag: None,
            focus: Pane::default(),
            general_selected: 0,
            favorites_selected: 0,
            search_query: String::new(),
            endpoints,
        }
    }

    /// Rows currently displayed for `list`.
    pub fn rows(&self, list: ListKind) -> &[City] {
        match list {
            ListKind::General => &self.store.views().general.rows,
            ListKind::Favorites => &self.store.views().favorites.rows,
        }
    }

    pub fn selected_index(&self, list: ListKind) -> usize {
        let selected = match list {
            ListKind::General => self.general_selected,
            ListKind::Favorites => self.favorites_selected,
        };
        selected.min(self.rows(list).len().saturating_sub(1))
    }

    /// City under the cursor of the focused list.
    pub fn selected_city(&self) -> Option<&City> {
        let list = self.focus.list()?;
        self.rows(list).get(self.selected_index(list))
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Endpoints::default())
    }
}
