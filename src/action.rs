//! Actions - every way the dashboard state can change

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{City, Condition, Coordinates, ListKind, SortDirection};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Mount the views (requests the feed and the geolocation lookup)
    Init,

    // ===== Feed category =====
    /// Result: city feed fetched (empty when the feed was unavailable)
    FeedDidLoad(Vec<City>),

    // ===== Location category =====
    /// Result: map center resolved (default center when the lookup failed)
    LocationDidLoad(Coordinates),

    // ===== Sort category =====
    SortSet(SortDirection),
    SortToggle,

    // ===== Search category =====
    /// Move keyboard focus into the search box
    SearchFocus,

    /// Search box text changed
    SearchChange(String),

    /// Leave the search box (text is kept)
    SearchBlur,

    // ===== Filter category =====
    FilterToggle(Condition),
    FilterClear,

    // ===== Focus category =====
    FocusNext,
    FocusPrev,

    // ===== Selection category =====
    /// Move the cursor in the focused list
    SelectionMove(i16),

    // ===== Card category =====
    /// Toggle the favorite under the cursor as the active card
    CardActivate,

    // ===== Drag category =====
    /// Grab the card under the cursor
    DragStart,

    /// Move the pointer over the target list's cards
    DragMove(i16),

    /// Carry the card over to another list
    DragRetarget(ListKind),

    /// Drop the card where the insertion marker is
    DragEnd,

    /// Put the card back without moving it
    DragCancel,

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Exit the application
    Quit,
}
