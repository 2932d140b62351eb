//! Render tests using RenderHarness

use tui_dispatch::testing::*;
use weather_board::{
    action::Action,
    components::{Component, Dashboard, DashboardProps, FAVORITES_HINT},
    model::{City, Condition, Coordinates, ListKind, WeatherConditions, Wind},
    reducer::reducer,
    state::AppState,
};

fn city(name: &str, temperature: i32) -> City {
    City {
        city: name.into(),
        temperature,
        wind: Wind {
            direction: "E".into(),
            speed: 7.0,
        },
        weather: WeatherConditions::default()
            .with(Condition::Rainy)
            .with(Condition::Stormy),
        coordinates: Coordinates::new(35.68, 139.69),
    }
}

fn render_board(state: &AppState) -> String {
    let mut render = RenderHarness::new(130, 18);
    let mut component = Dashboard::new();
    render.render_to_string_plain(|frame| {
        let props = DashboardProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_empty_favorites_hint() {
    let output = render_board(&AppState::default());
    assert!(
        output.contains(FAVORITES_HINT),
        "Favorites hint expected:\n{output}"
    );
}

#[test]
fn test_render_city_card() {
    let mut state = AppState::default();
    reducer(&mut state, Action::FeedDidLoad(vec![city("Tokyo", 0), city("Yakutsk", -40)]));

    let output = render_board(&state);
    assert!(output.contains("Tokyo"));
    assert!(output.contains("0\u{b0}"));
    assert!(output.contains("-40\u{b0}"));
    assert!(output.contains("Cities (2)"));
    // Small cards leave out wind.
    assert!(!output.contains("m/s"));
}

#[test]
fn test_render_sort_arrow_follows_direction() {
    let mut state = AppState::default();
    assert!(render_board(&state).contains("A\u{2192}Z"));

    reducer(&mut state, Action::SortToggle);
    assert!(render_board(&state).contains("Z\u{2192}A"));
}

#[test]
fn test_render_favorite_marker_on_map() {
    let mut state = AppState::default();
    reducer(&mut state, Action::LocationDidLoad(Coordinates::new(35.0, 139.0)));
    reducer(&mut state, Action::FeedDidLoad(vec![city("Tokyo", 15)]));
    reducer(&mut state, Action::DragStart);
    reducer(&mut state, Action::DragRetarget(ListKind::Favorites));
    reducer(&mut state, Action::DragEnd);

    let output = render_board(&state);
    assert!(output.contains("Favorites (1)"));
    assert!(!output.contains(FAVORITES_HINT));
    assert!(output.contains("E 7 m/s"), "Big card expected:\n{output}");
    // Card plus map label.
    assert!(output.matches("Tokyo").count() >= 2, "Map label expected:\n{output}");
}
