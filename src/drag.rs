//! Drag-and-drop controller
//!
//! Idle is the absence of a session. A session starts on grab, follows the
//! pointer while it moves over cards of either list, and only commits when
//! it is dropped.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{City, ListKind};

/// A card in flight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DragSession {
    /// Name of the dragged city
    pub city: String,
    /// List the card was grabbed from
    pub source: ListKind,
    /// List the card would land in if dropped now
    pub target: ListKind,
    /// Card the insertion marker follows; `None` means "at the end"
    pub after: Option<String>,
    /// Row of the target list under the pointer; `None` is below the last card
    pub pointer: Option<usize>,
}

/// What a drop asks the store to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub city: String,
    pub after: Option<String>,
    pub target: ListKind,
}

impl DragSession {
    pub fn start(city: &str, source: ListKind) -> Self {
        tracing::debug!(city, ?source, "drag started");
        Self {
            city: city.to_string(),
            source,
            target: source,
            after: None,
            pointer: None,
        }
    }

    /// Pointer moved over `over` (a card name, or empty space) in `target`.
    ///
    /// Hovering the dragged card itself changes nothing. Over a favorites
    /// card the marker goes right after it; anywhere else it goes last.
    pub fn hover(&mut self, target: ListKind, over: Option<&str>) {
        if over == Some(self.city.as_str()) {
            return;
        }
        self.target = target;
        self.after = match (target, over) {
            (ListKind::Favorites, Some(card)) => Some(card.to_string()),
            _ => None,
        };
    }

    /// Move the pointer `delta` rows within the target list's visible rows.
    pub fn step(&mut self, delta: i16, rows: &[City]) {
        if rows.is_empty() {
            self.pointer = None;
            self.hover(self.target, None);
            return;
        }
        let last = rows.len() - 1;
        // Row past the last card is the "append" slot.
        let current = self.pointer.unwrap_or(rows.len()) as i64;
        let next = (current + i64::from(delta)).clamp(0, rows.len() as i64) as usize;
        self.pointer = (next <= last).then_some(next);
        let over = self.pointer.map(|index| rows[index].city.as_str());
        self.hover(self.target, over);
    }

    /// Carry the card over to `target`, pointing below its last card.
    pub fn retarget(&mut self, target: ListKind) {
        self.pointer = None;
        self.hover(target, None);
    }

    pub fn is_dragging(&self, city: &str) -> bool {
        self.city == city
    }

    /// Release the card.
    pub fn finish(self) -> Settlement {
        tracing::debug!(city = %self.city, after = ?self.after, target = ?self.target, "drag ended");
        Settlement {
            city: self.city,
            after: self.after,
            target: self.target,
        }
    }
}
