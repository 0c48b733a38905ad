//! The widget model: a titled rectangle on the grid.

use crate::geometry::Geometry;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Widget identifier. Unique and never reused within a session.
pub type WidgetId = u64;

/// A rectangular panel placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub title: String,
}

impl Widget {
    /// Create a widget with the given geometry and title.
    pub fn new(id: WidgetId, geometry: Geometry, title: impl Into<String>) -> Self {
        Self {
            id,
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            title: title.into(),
        }
    }

    /// The title a freshly added widget gets.
    pub fn default_title(id: WidgetId) -> String {
        format!("Widget {}", id)
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
    }

    pub fn bounds(&self) -> Rect {
        self.geometry().rect()
    }

    /// Text shown in the widget body.
    pub fn size_label(&self) -> String {
        format!("{} × {}", self.width, self.height)
    }
}

/// A partial update to a widget. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub title: Option<String>,
}

impl WidgetPatch {
    /// Patch that moves a widget.
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Patch that sets the full geometry.
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            title: None,
        }
    }

    /// Patch that renames a widget.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Merge into `widget`. Returns true if anything changed.
    pub fn apply(&self, widget: &mut Widget) -> bool {
        let before = widget.clone();
        if let Some(x) = self.x {
            widget.x = x;
        }
        if let Some(y) = self.y {
            widget.y = y;
        }
        if let Some(width) = self.width {
            widget.width = width;
        }
        if let Some(height) = self.height {
            widget.height = height;
        }
        if let Some(title) = &self.title {
            widget.title.clone_from(title);
        }
        *widget != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_json_shape() {
        let widget = Widget::new(3, Geometry::new(20, 40, 200, 120), "Widget 3");
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3, "x": 20, "y": 40, "width": 200, "height": 120, "title": "Widget 3"
            })
        );
    }

    #[test]
    fn test_patch_apply() {
        let mut widget = Widget::new(0, Geometry::new(20, 20, 200, 120), Widget::default_title(0));
        assert_eq!(widget.title, "Widget 0");

        assert!(WidgetPatch::position(60, 80).apply(&mut widget));
        assert_eq!(widget.geometry(), Geometry::new(60, 80, 200, 120));

        // Same values again: nothing changes
        assert!(!WidgetPatch::position(60, 80).apply(&mut widget));

        assert!(WidgetPatch::title("Sales").apply(&mut widget));
        assert_eq!(widget.title, "Sales");
        assert_eq!(widget.x, 60);
    }

    #[test]
    fn test_size_label() {
        let widget = Widget::new(1, Geometry::new(0, 0, 240, 100), "w");
        assert_eq!(widget.size_label(), "240 × 100");
    }
}
