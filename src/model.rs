//! Domain records - cities, weather conditions, map camera and markers

use std::cmp::Ordering;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fallback map center when geolocation is unavailable (Moscow).
pub const DEFAULT_LAT: f64 = 55.751244;
pub const DEFAULT_LON: f64 = 37.618423;
pub const DEFAULT_ZOOM: u8 = 10;

/// Marker opacity while its card is hovered or active.
pub const OPACITY_HIGHLIGHTED: f32 = 1.0;
/// Marker opacity at rest.
pub const OPACITY_DIM: f32 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub const fn fallback() -> Self {
        Self::new(DEFAULT_LAT, DEFAULT_LON)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Wind {
    pub direction: String,
    pub speed: f64,
}

/// Weather conditions reported by the feed, in the feed's own spelling.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Sunny,
    Cloudy,
    Snowy,
    Metorite,
    Rainy,
    Blizzard,
    Stormy,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::Sunny,
        Condition::Cloudy,
        Condition::Snowy,
        Condition::Metorite,
        Condition::Rainy,
        Condition::Blizzard,
        Condition::Stormy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Condition::Sunny => "sunny",
            Condition::Cloudy => "cloudy",
            Condition::Snowy => "snowy",
            Condition::Metorite => "metorite",
            Condition::Rainy => "rainy",
            Condition::Blizzard => "blizzard",
            Condition::Stormy => "stormy",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Condition::Sunny => "\u{2600}",
            Condition::Cloudy => "\u{2601}",
            Condition::Snowy => "\u{2744}",
            Condition::Metorite => "\u{2604}",
            Condition::Rainy => "\u{2614}",
            Condition::Blizzard => "\u{2746}",
            Condition::Stormy => "\u{26a1}",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition flags of a single city. Missing feed keys read as `false`,
/// unknown keys are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WeatherConditions {
    pub sunny: bool,
    pub cloudy: bool,
    pub snowy: bool,
    pub metorite: bool,
    pub rainy: bool,
    pub blizzard: bool,
    pub stormy: bool,
}

impl WeatherConditions {
    pub fn has(&self, condition: Condition) -> bool {
        match condition {
            Condition::Sunny => self.sunny,
            Condition::Cloudy => self.cloudy,
            Condition::Snowy => self.snowy,
            Condition::Metorite => self.metorite,
            Condition::Rainy => self.rainy,
            Condition::Blizzard => self.blizzard,
            Condition::Stormy => self.stormy,
        }
    }

    pub fn with(mut self, condition: Condition) -> Self {
        match condition {
            Condition::Sunny => self.sunny = true,
            Condition::Cloudy => self.cloudy = true,
            Condition::Snowy => self.snowy = true,
            Condition::Metorite => self.metorite = true,
            Condition::Rainy => self.rainy = true,
            Condition::Blizzard => self.blizzard = true,
            Condition::Stormy => self.stormy = true,
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::ALL.into_iter().filter(|c| self.has(*c))
    }
}

/// A weather record for one location. Identity is the `city` name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct City {
    pub city: String,
    pub temperature: i32,
    pub wind: Wind,
    pub weather: WeatherConditions,
    pub coordinates: Coordinates,
}

impl City {
    pub fn name(&self) -> &str {
        &self.city
    }

    /// Temperature with an explicit `+` for values above zero.
    pub fn signed_temperature(&self) -> String {
        if self.temperature > 0 {
            format!("+{}°", self.temperature)
        } else {
            format!("{}°", self.temperature)
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn compare(self, a: &City, b: &City) -> Ordering {
        match self {
            SortDirection::Ascending => a.city.cmp(&b.city),
            SortDirection::Descending => b.city.cmp(&a.city),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "A\u{2192}Z",
            SortDirection::Descending => "Z\u{2192}A",
        }
    }
}

/// Which list a city card lives in (or is being dropped on).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ListKind {
    General,
    Favorites,
}

impl ListKind {
    pub fn other(self) -> Self {
        match self {
            ListKind::General => ListKind::Favorites,
            ListKind::Favorites => ListKind::General,
        }
    }
}

/// Per-condition filter flags applied to the favorites list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionFilters {
    flags: [bool; 7],
}

impl ConditionFilters {
    pub fn set(&mut self, condition: Condition, enabled: bool) {
        self.flags[condition.index()] = enabled;
    }

    pub fn is_enabled(&self, condition: Condition) -> bool {
        self.flags[condition.index()]
    }

    pub fn active(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| *f)
    }

    /// A city passes when it satisfies every active flag.
    pub fn matches(&self, city: &City) -> bool {
        self.active().all(|c| city.weather.has(c))
    }
}

/// A map pin for one favorite city. `title` is the city name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Marker {
    pub title: String,
    pub coordinates: Coordinates,
    pub opacity: f32,
}

impl Marker {
    pub fn for_city(city: &City) -> Self {
        Self {
            title: city.city.clone(),
            coordinates: city.coordinates,
            opacity: OPACITY_DIM,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.opacity >= OPACITY_HIGHLIGHTED
    }
}

/// Map camera: where it looks, how close, and where it returns to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub home: Coordinates,
}

impl MapView {
    pub fn at(home: Coordinates) -> Self {
        Self {
            center: home,
            zoom: DEFAULT_ZOOM,
            home,
        }
    }

    pub fn reset(&mut self) {
        self.center = self.home;
        self.zoom = DEFAULT_ZOOM;
    }

    pub fn focus(&mut self, point: Coordinates) {
        self.center = point;
        self.zoom = DEFAULT_ZOOM;
    }

    /// Frame every marker, never zooming in past the default zoom.
    pub fn fit(&mut self, markers: &[Marker]) {
        let Some(first) = markers.first() else {
            self.reset();
            return;
        };
        let (mut min_lat, mut max_lat) = (first.coordinates.latitude, first.coordinates.latitude);
        let (mut min_lon, mut max_lon) = (first.coordinates.longitude, first.coordinates.longitude);
        for marker in &markers[1..] {
            min_lat = min_lat.min(marker.coordinates.latitude);
            max_lat = max_lat.max(marker.coordinates.latitude);
            min_lon = min_lon.min(marker.coordinates.longitude);
            max_lon = max_lon.max(marker.coordinates.longitude);
        }
        self.center = Coordinates::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0);
        let span = (max_lat - min_lat).max(max_lon - min_lon);
        self.zoom = zoom_for_span(span);
    }

    /// Longitude/latitude window for a viewport with the given cell aspect.
    pub fn bounds(&self, aspect: f64) -> ([f64; 2], [f64; 2]) {
        let lon_span = span_for_zoom(self.zoom);
        let lat_span = lon_span / aspect.max(f64::EPSILON);
        (
            [
                self.center.longitude - lon_span / 2.0,
                self.center.longitude + lon_span / 2.0,
            ],
            [
                self.center.latitude - lat_span / 2.0,
                self.center.latitude + lat_span / 2.0,
            ],
        )
    }
}

fn span_for_zoom(zoom: u8) -> f64 {
    360.0 / 2f64.powi(i32::from(zoom.max(1)) - 1)
}

fn zoom_for_span(span: f64) -> u8 {
    // Leave a margin so edge markers stay inside the frame.
    let padded = (span * 1.5).max(f64::EPSILON);
    let zoom = (360.0 / padded).log2().floor() + 1.0;
    zoom.clamp(1.0, f64::from(DEFAULT_ZOOM)) as u8
}
