//! Input model: mouse buttons, interaction modes, drag state, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! Placing an item is not a gesture: the drag item lives in [`DragState`],
//! which the host sets and clears, and the pointer only moves its hover.
//! Keeping the two apart means a pan can never start while an item is in
//! hand, and a cleared drag item can never commit.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::catalog::{FurnitureItem, PlacementId, Rotation};
use crate::hit::{GridCell, Hover};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// What a primary click on a placed item means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Open details; presses on floor items offer them for pick-up.
    #[default]
    Normal,
    /// Select items for removal.
    Remove,
    /// Attach or edit annotations.
    Memory,
    /// Review due annotations.
    Study,
}

/// What sits under a primary click, resolved at release time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Placement(PlacementId),
    WallPlacement(PlacementId),
    Tile(GridCell),
    Nothing,
}

/// An item in hand, set by the host and cleared by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub item: FurnitureItem,
    /// Pending quarter turns, advanced by secondary presses.
    pub rotation: Rotation,
    /// Set when an existing placement is being moved; excluded from collision and from the scene.
    pub moving_placement_id: Option<PlacementId>,
    pub hover: Hover,
}

impl DragState {
    #[must_use]
    pub fn new(item: FurnitureItem, moving_placement_id: Option<PlacementId>) -> Self {
        Self { item, rotation: Rotation::default(), moving_placement_id, hover: Hover::None }
    }

    /// Advance the pending rotation by one quarter turn.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
    }
}

/// Persistent UI state visible to the scene builder.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub mode: Mode,
    /// Placement highlighted in remove mode.
    pub selected_id: Option<PlacementId>,
    /// Tile or wall slot under the pointer when nothing is being dragged.
    pub hover: Hover,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Primary drag on empty space moves the camera.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
        /// Screen position of the press.
        origin_screen: Point,
        /// Whether the pointer has left the click slop radius.
        moved: bool,
    },
    /// Secondary drag rotates the camera.
    RotatingCamera {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Primary press on a placed floor item in normal mode.
    PressingItem {
        id: PlacementId,
        origin_screen: Point,
    },
}

impl InputState {
    /// Whether this gesture moves the camera.
    #[must_use]
    pub fn is_camera_gesture(&self) -> bool {
        matches!(self, Self::Panning { .. } | Self::RotatingCamera { .. })
    }

    /// Record pointer travel for a pan; returns the delta since the last event.
    ///
    /// Returns `None` for every other gesture.
    pub fn pan_to(&mut self, screen: Point, click_slop: f64) -> Option<Point> {
        let Self::Panning { last_screen, origin_screen, moved } = self else {
            return None;
        };
        let delta = screen - *last_screen;
        *last_screen = screen;
        if screen.distance(*origin_screen) > click_slop {
            *moved = true;
        }
        Some(delta)
    }

    /// Record pointer travel for a camera rotation; returns the horizontal delta.
    pub fn rotate_to(&mut self, screen: Point) -> Option<f64> {
        let Self::RotatingCamera { last_screen } = self else {
            return None;
        };
        let dx = screen.x - last_screen.x;
        *last_screen = screen;
        Some(dx)
    }

    /// End the gesture, returning what it was.
    pub fn finish(&mut self) -> Self {
        std::mem::take(self)
    }
}
