//! Presentation view-model: where each part of each widget is drawn.
//!
//! Renderers paint a [`CanvasView`] and the shell hit-tests against the same
//! value, so what the user sees and what the pointer hits never disagree.

use crate::geometry::{Dimensions, Handle};
use crate::input::PointerTarget;
use crate::interaction::InteractionController;
use crate::layout::LayoutStore;
use crate::storage::Storage;
use crate::widget::{Widget, WidgetId};
use kurbo::{Point, Rect, Size};

/// Height of the title bar.
pub const HEADER_HEIGHT: f64 = 32.0;
/// Side of the square corner handles.
pub const HANDLE_SIZE: f64 = 12.0;
/// Side of the square remove button.
pub const REMOVE_BUTTON_SIZE: f64 = 20.0;
/// Horizontal padding inside the header.
pub const HEADER_PADDING: f64 = 12.0;

/// Layout of a single widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub id: WidgetId,
    pub title: String,
    /// `"{width} × {height}"`.
    pub size_label: String,
    pub frame: Rect,
    pub header: Rect,
    pub remove_button: Rect,
    pub handles: [(Handle, Rect); 4],
    pub dragging: bool,
    pub resizing: bool,
}

impl WidgetView {
    pub fn new(widget: &Widget, dragging: bool, resizing: bool) -> Self {
        let frame = widget.bounds();
        let header = Rect::new(frame.x0, frame.y0, frame.x1, (frame.y0 + HEADER_HEIGHT).min(frame.y1));
        let button_origin = Point::new(
            header.x1 - HEADER_PADDING - REMOVE_BUTTON_SIZE,
            header.y0 + (HEADER_HEIGHT - REMOVE_BUTTON_SIZE) / 2.0,
        );
        let remove_button =
            Rect::from_origin_size(button_origin, Size::new(REMOVE_BUTTON_SIZE, REMOVE_BUTTON_SIZE));
        let handles = Handle::ALL.map(|handle| {
            let corner = handle.corner(frame);
            (handle, Rect::from_center_size(corner, Size::new(HANDLE_SIZE, HANDLE_SIZE)))
        });
        Self {
            id: widget.id,
            title: widget.title.clone(),
            size_label: widget.size_label(),
            frame,
            header,
            remove_button,
            handles,
            dragging,
            resizing,
        }
    }

    /// Body area below the header.
    pub fn content(&self) -> Rect {
        Rect::new(self.frame.x0, self.header.y1, self.frame.x1, self.frame.y1)
    }

    /// Whether a gesture is running on this widget.
    pub fn is_active(&self) -> bool {
        self.dragging || self.resizing
    }

    pub fn handle_at(&self, point: Point) -> Option<Handle> {
        self.handles
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(handle, _)| *handle)
    }

    /// Hit-test this widget alone.
    pub fn hit_test(&self, point: Point) -> Option<PointerTarget> {
        if let Some(handle) = self.handle_at(point) {
            return Some(PointerTarget::Handle(self.id, handle));
        }
        if self.remove_button.contains(point) {
            return Some(PointerTarget::RemoveButton(self.id));
        }
        if self.frame.contains(point) {
            return Some(PointerTarget::Body(self.id));
        }
        None
    }
}

/// All widgets of a canvas in paint order (back to front).
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasView {
    pub widgets: Vec<WidgetView>,
    pub container: Dimensions,
    /// Grid-aligned usable area.
    pub extent: Dimensions,
    pub grid_unit: i32,
}

impl CanvasView {
    /// Build the view. The widget under manipulation is painted last.
    pub fn build<S: Storage + ?Sized>(
        store: &LayoutStore<S>,
        controller: &InteractionController,
    ) -> Self {
        let active = controller.active_widget();
        let mut widgets: Vec<WidgetView> = store
            .widgets()
            .iter()
            .filter(|w| Some(w.id) != active)
            .map(|w| WidgetView::new(w, false, false))
            .collect();
        if let Some(widget) = active.and_then(|id| store.get(id)) {
            widgets.push(WidgetView::new(
                widget,
                controller.is_dragging(widget.id),
                controller.is_resizing(widget.id),
            ));
        }
        Self {
            widgets,
            container: controller.container(),
            extent: controller.extent(),
            grid_unit: controller.grid().unit(),
        }
    }

    /// What the pointer at `point` would hit, top-most widget first.
    pub fn hit_test(&self, point: Point) -> PointerTarget {
        self.widgets
            .iter()
            .rev()
            .find_map(|w| w.hit_test(point))
            .unwrap_or(PointerTarget::Canvas)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&WidgetView> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Canvas bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.container.width as f64, self.container.height as f64)
    }
}
