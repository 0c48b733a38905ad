//! Pointer events and what they land on.

use crate::geometry::Handle;
use crate::widget::WidgetId;
use kurbo::Point;
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// The button that starts gestures.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => position,
        }
    }
}

/// The part of the canvas a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Widget body (including its header).
    Body(WidgetId),
    /// One of a widget's corner resize handles.
    Handle(WidgetId, Handle),
    /// A widget's remove button.
    RemoveButton(WidgetId),
    /// Empty canvas.
    Canvas,
}

impl PointerTarget {
    /// The widget under the pointer, if any.
    pub fn widget(&self) -> Option<WidgetId> {
        match *self {
            PointerTarget::Body(id)
            | PointerTarget::Handle(id, _)
            | PointerTarget::RemoveButton(id) => Some(id),
            PointerTarget::Canvas => None,
        }
    }
}

/// Last known pointer position and held buttons.
///
/// Windowing backends report button presses without a position, so the
/// shell keeps one of these to build complete [`PointerEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Point>,
    pressed: HashSet<MouseButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor move and return the matching event.
    pub fn moved(&mut self, position: Point) -> PointerEvent {
        self.position = Some(position);
        PointerEvent::Move { position }
    }

    /// Record a press at the last known position.
    pub fn pressed(&mut self, button: MouseButton) -> Option<PointerEvent> {
        let position = self.position?;
        self.pressed.insert(button);
        Some(PointerEvent::Down { position, button })
    }

    /// Record a release at the last known position.
    pub fn released(&mut self, button: MouseButton) -> Option<PointerEvent> {
        self.pressed.remove(&button);
        let position = self.position?;
        Some(PointerEvent::Up { position, button })
    }

    /// Forget the position (the cursor left the window).
    pub fn left(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    /// Drop all held buttons, e.g. after focus loss.
    pub fn reset_buttons(&mut self) {
        self.pressed.clear();
    }
}
