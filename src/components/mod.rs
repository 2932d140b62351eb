pub mod city_list;
pub mod dashboard;
pub mod header_nav;
pub mod weather_map;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use city_list::{CityList, CityListProps};
pub use dashboard::{Dashboard, DashboardProps, FAVORITES_HINT};
pub use header_nav::{HeaderNav, HeaderNavProps};
pub use weather_map::{WeatherMap, WeatherMapProps};
