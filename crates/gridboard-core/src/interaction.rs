//! Pointer gesture state machine for moving and resizing widgets.
//!
//! The controller owns the only copy of gesture state, so at most one widget
//! is ever being dragged or resized. Each pointer move recomputes the target
//! geometry from the gesture-start snapshot plus total displacement, which
//! keeps commits idempotent no matter how many moves the shell delivers.

use crate::capture::{PointerCapture, PointerRouter};
use crate::geometry::{
    Dimensions, Geometry, GridSpec, Handle, clamp_to_container, fit_resized, place_dragged,
    resize_from_handle,
};
use crate::input::{MouseButton, PointerEvent, PointerTarget};
use crate::layout::LayoutStore;
use crate::storage::Storage;
use crate::view::CanvasView;
use crate::widget::{WidgetId, WidgetPatch};
use kurbo::{Point, Vec2};
use std::time::{Duration, Instant};

/// Default time after which a silent gesture is force-released.
pub const DEFAULT_GESTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// An in-flight move.
#[derive(Debug)]
struct DragState {
    widget_id: WidgetId,
    /// Pointer position minus widget top-left at pointer-down.
    pointer_offset: Vec2,
    last_event: Instant,
    _capture: PointerCapture,
}

/// An in-flight corner resize.
#[derive(Debug)]
struct ResizeState {
    widget_id: WidgetId,
    handle: Handle,
    start_geometry: Geometry,
    start_pointer: Point,
    last_event: Instant,
    _capture: PointerCapture,
}

#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
}

impl Gesture {
    fn widget_id(&self) -> Option<WidgetId> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging(drag) => Some(drag.widget_id),
            Gesture::Resizing(resize) => Some(resize.widget_id),
        }
    }

    fn last_event(&self) -> Option<Instant> {
        match self {
            Gesture::Idle => None,
            Gesture::Dragging(drag) => Some(drag.last_event),
            Gesture::Resizing(resize) => Some(resize.last_event),
        }
    }
}

/// Read-only summary of the controller state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    Idle,
    Dragging {
        widget_id: WidgetId,
        pointer_offset: Vec2,
    },
    Resizing {
        widget_id: WidgetId,
        handle: Handle,
        start_geometry: Geometry,
        start_pointer: Point,
    },
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened.
    Ignored,
    DragStarted(WidgetId),
    ResizeStarted(WidgetId, Handle),
    /// New geometry was written to the store.
    Committed(WidgetId, Geometry),
    /// The gesture is live but the snapped geometry did not change.
    Unchanged(WidgetId),
    /// The gesture on this widget ended.
    Released(WidgetId),
    Removed(WidgetId),
}

/// Turns pointer events into grid-snapped, bounds-clamped widget updates.
pub struct InteractionController {
    gesture: Gesture,
    router: PointerRouter,
    grid: GridSpec,
    container: Dimensions,
    gesture_timeout: Duration,
}

impl InteractionController {
    pub fn new(grid: GridSpec, container: Dimensions) -> Self {
        Self {
            gesture: Gesture::Idle,
            router: PointerRouter::new(),
            grid,
            container,
            gesture_timeout: DEFAULT_GESTURE_TIMEOUT,
        }
    }

    pub fn with_gesture_timeout(mut self, timeout: Duration) -> Self {
        self.gesture_timeout = timeout;
        self
    }

    /// The router the shell consults to decide who gets pointer events.
    pub fn router(&self) -> &PointerRouter {
        &self.router
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn container(&self) -> Dimensions {
        self.container
    }

    /// Update the container size (e.g. after a window resize).
    pub fn set_container(&mut self, container: Dimensions) {
        self.container = container;
    }

    /// The grid-aligned area widgets may occupy.
    pub fn extent(&self) -> Dimensions {
        self.grid.extent(self.container)
    }

    pub fn mode(&self) -> InteractionMode {
        match &self.gesture {
            Gesture::Idle => InteractionMode::Idle,
            Gesture::Dragging(drag) => InteractionMode::Dragging {
                widget_id: drag.widget_id,
                pointer_offset: drag.pointer_offset,
            },
            Gesture::Resizing(resize) => InteractionMode::Resizing {
                widget_id: resize.widget_id,
                handle: resize.handle,
                start_geometry: resize.start_geometry,
                start_pointer: resize.start_pointer,
            },
        }
    }

    pub fn is_dragging(&self, id: WidgetId) -> bool {
        matches!(&self.gesture, Gesture::Dragging(drag) if drag.widget_id == id)
    }

    pub fn is_resizing(&self, id: WidgetId) -> bool {
        matches!(&self.gesture, Gesture::Resizing(resize) if resize.widget_id == id)
    }

    /// The widget under manipulation, if any.
    pub fn active_widget(&self) -> Option<WidgetId> {
        self.gesture.widget_id()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Route a pointer event, hit-testing pointer-downs against the store.
    pub fn handle_event<S: Storage + ?Sized>(
        &mut self,
        store: &mut LayoutStore<S>,
        event: PointerEvent,
    ) -> Outcome {
        match event {
            PointerEvent::Down { position, button } => {
                let target = CanvasView::build(store, self).hit_test(position);
                self.pointer_down(store, target, position, button)
            }
            PointerEvent::Move { position } => self.pointer_move(store, position),
            PointerEvent::Up { button, .. } if button.is_primary() => self.pointer_up(store),
            PointerEvent::Up { .. } => Outcome::Ignored,
        }
    }

    /// Start a gesture (or remove a widget) depending on what was hit.
    pub fn pointer_down<S: Storage + ?Sized>(
        &mut self,
        store: &mut LayoutStore<S>,
        target: PointerTarget,
        position: Point,
        button: MouseButton,
    ) -> Outcome {
        if !button.is_primary() {
            return Outcome::Ignored;
        }
        if let Some(active) = self.active_widget() {
            log::debug!("Ignoring pointer-down on {:?}, widget {} is active", target, active);
            return Outcome::Ignored;
        }
        match target {
            PointerTarget::Body(id) => self.begin_drag(store, id, position),
            PointerTarget::Handle(id, handle) => self.begin_resize(store, id, handle, position),
            PointerTarget::RemoveButton(id) => self.remove_widget(store, id),
            PointerTarget::Canvas => Outcome::Ignored,
        }
    }

    /// Start moving widget `id` with the pointer at `position`.
    pub fn begin_drag<S: Storage + ?Sized>(
        &mut self,
        store: &LayoutStore<S>,
        id: WidgetId,
        position: Point,
    ) -> Outcome {
        if self.is_active() {
            return Outcome::Ignored;
        }
        let Some(widget) = store.get(id) else {
            return Outcome::Ignored;
        };
        let Some(capture) = self.router.capture(id) else {
            log::warn!("Pointer already captured, not dragging widget {}", id);
            return Outcome::Ignored;
        };
        let pointer_offset = position - widget.geometry().position();
        log::debug!("Drag start on widget {} (offset {:?})", id, pointer_offset);
        self.gesture = Gesture::Dragging(DragState {
            widget_id: id,
            pointer_offset,
            last_event: Instant::now(),
            _capture: capture,
        });
        Outcome::DragStarted(id)
    }

    /// Start resizing widget `id` from `handle` with the pointer at `position`.
    pub fn begin_resize<S: Storage + ?Sized>(
        &mut self,
        store: &LayoutStore<S>,
        id: WidgetId,
        handle: Handle,
        position: Point,
    ) -> Outcome {
        if self.is_active() {
            return Outcome::Ignored;
        }
        let Some(widget) = store.get(id) else {
            return Outcome::Ignored;
        };
        let Some(capture) = self.router.capture(id) else {
            log::warn!("Pointer already captured, not resizing widget {}", id);
            return Outcome::Ignored;
        };
        log::debug!("Resize start on widget {} from {:?}", id, handle);
        self.gesture = Gesture::Resizing(ResizeState {
            widget_id: id,
            handle,
            start_geometry: widget.geometry(),
            start_pointer: position,
            last_event: Instant::now(),
            _capture: capture,
        });
        Outcome::ResizeStarted(id, handle)
    }

    /// Advance the active gesture to the pointer at `position`.
    pub fn pointer_move<S: Storage + ?Sized>(
        &mut self,
        store: &mut LayoutStore<S>,
        position: Point,
    ) -> Outcome {
        let Some(id) = self.active_widget() else {
            return Outcome::Ignored;
        };
        let Some(current) = store.get(id).map(|w| w.geometry()) else {
            log::debug!("Widget {} vanished mid-gesture, releasing", id);
            self.gesture = Gesture::Idle;
            return Outcome::Released(id);
        };

        let now = Instant::now();
        let extent = self.grid.extent(self.container);
        let min_size = self.grid.min_size();
        let next = match &mut self.gesture {
            Gesture::Idle => return Outcome::Ignored,
            Gesture::Dragging(drag) => {
                drag.last_event = now;
                place_dragged(current, position - drag.pointer_offset, self.container, &self.grid)
            }
            Gesture::Resizing(resize) => {
                resize.last_event = now;
                let raw = resize_from_handle(
                    resize.handle,
                    resize.start_geometry,
                    position - resize.start_pointer,
                    min_size,
                );
                let fitted = fit_resized(resize.handle, raw, extent, min_size, self.grid.unit());
                clamp_to_container(fitted, extent, min_size)
            }
        };

        if next == current {
            return Outcome::Unchanged(id);
        }
        store.update(id, WidgetPatch::geometry(next));
        log::debug!("Committed widget {} -> {:?}", id, next);
        Outcome::Committed(id, next)
    }

    /// End the active gesture and flush the store.
    pub fn pointer_up<S: Storage + ?Sized>(&mut self, store: &mut LayoutStore<S>) -> Outcome {
        self.release(store, "pointer-up")
    }

    /// End the active gesture without applying further moves.
    pub fn cancel<S: Storage + ?Sized>(&mut self, store: &mut LayoutStore<S>) -> Outcome {
        self.release(store, "cancel")
    }

    /// Release a gesture that has not seen a pointer event within the timeout.
    pub fn expire_stale<S: Storage + ?Sized>(
        &mut self,
        store: &mut LayoutStore<S>,
        now: Instant,
    ) -> Outcome {
        let Some(last) = self.gesture.last_event() else {
            return Outcome::Ignored;
        };
        if now.saturating_duration_since(last) < self.gesture_timeout {
            return Outcome::Ignored;
        }
        log::warn!(
            "Gesture idle for {:?}, releasing widget {:?}",
            self.gesture_timeout,
            self.active_widget()
        );
        self.release(store, "timeout")
    }

    /// Remove widget `id`, ending any gesture on it first.
    pub fn remove_widget<S: Storage + ?Sized>(
        &mut self,
        store: &mut LayoutStore<S>,
        id: WidgetId,
    ) -> Outcome {
        if self.active_widget() == Some(id) {
            self.gesture = Gesture::Idle;
        }
        if store.remove(id) {
            Outcome::Removed(id)
        } else {
            Outcome::Ignored
        }
    }

    fn release<S: Storage + ?Sized>(&mut self, store: &mut LayoutStore<S>, reason: &str) -> Outcome {
        let Some(id) = std::mem::take(&mut self.gesture).widget_id() else {
            return Outcome::Ignored;
        };
        log::debug!("Gesture on widget {} ended ({})", id, reason);
        store.flush();
        Outcome::Released(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DEFAULT_GEOMETRY;
    use crate::storage::{LayoutPersistence, MemoryStorage, WritePolicy};
    use std::sync::Arc;

    fn setup() -> (LayoutStore<MemoryStorage>, InteractionController) {
        let storage = Arc::new(MemoryStorage::new());
        let store = LayoutStore::new(LayoutPersistence::new(storage), WritePolicy::Immediate);
        let controller = InteractionController::new(GridSpec::default(), Dimensions::new(600, 600));
        (store, controller)
    }

    fn geometry_of(store: &LayoutStore<MemoryStorage>, id: WidgetId) -> Geometry {
        store.get(id).map(|w| w.geometry()).unwrap()
    }

    #[test]
    fn test_drag_snaps_and_commits() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;

        let outcome = controller.pointer_down(
            &mut store,
            PointerTarget::Body(id),
            Point::new(30.0, 30.0),
            MouseButton::Left,
        );
        assert_eq!(outcome, Outcome::DragStarted(id));
        assert!(controller.is_dragging(id));
        assert!(controller.router().is_captured());

        let outcome = controller.pointer_move(&mut store, Point::new(67.0, 93.0));
        assert_eq!(outcome, Outcome::Committed(id, Geometry::new(60, 80, 200, 120)));

        // Same snapped position again
        let outcome = controller.pointer_move(&mut store, Point::new(68.0, 92.0));
        assert_eq!(outcome, Outcome::Unchanged(id));

        assert_eq!(controller.pointer_up(&mut store), Outcome::Released(id));
        assert_eq!(controller.mode(), InteractionMode::Idle);
        assert!(!controller.router().is_captured());
    }

    #[test]
    fn test_drag_clamps_to_container() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        controller.begin_drag(&store, id, Point::new(30.0, 30.0));

        controller.pointer_move(&mut store, Point::new(900.0, -200.0));
        assert_eq!(geometry_of(&store, id), Geometry::new(400, 0, 200, 120));
    }

    #[test]
    fn test_resize_below_minimum() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        let corner = Point::new(220.0, 140.0);

        let outcome = controller.pointer_down(
            &mut store,
            PointerTarget::Handle(id, Handle::SouthEast),
            corner,
            MouseButton::Left,
        );
        assert_eq!(outcome, Outcome::ResizeStarted(id, Handle::SouthEast));
        assert!(controller.is_resizing(id));

        // Requested width 40
        controller.pointer_move(&mut store, Point::new(60.0, 140.0));
        assert_eq!(geometry_of(&store, id), Geometry::new(20, 20, 100, 120));
    }

    #[test]
    fn test_resize_north_west_keeps_opposite_corner() {
        let (mut store, mut controller) = setup();
        let id = store.add(Geometry::new(200, 200, 200, 120), None).id;
        controller.begin_resize(&store, id, Handle::NorthWest, Point::new(200.0, 200.0));

        controller.pointer_move(&mut store, Point::new(143.0, 171.0));
        let g = geometry_of(&store, id);
        assert_eq!((g.right(), g.bottom()), (400, 320));
        assert_eq!((g.x, g.y), (140, 180));

        // Past the minimum: bottom-right still fixed
        controller.pointer_move(&mut store, Point::new(390.0, 310.0));
        let g = geometry_of(&store, id);
        assert_eq!(g, Geometry::new(300, 260, 100, 60));
    }

    #[test]
    fn test_pointer_down_during_gesture_is_ignored() {
        let (mut store, mut controller) = setup();
        let a = store.add_default().id;
        let b = store.add(Geometry::new(300, 300, 200, 120), None).id;

        controller.begin_drag(&store, a, Point::new(30.0, 30.0));
        let outcome = controller.pointer_down(
            &mut store,
            PointerTarget::Handle(b, Handle::SouthEast),
            Point::new(500.0, 420.0),
            MouseButton::Left,
        );
        assert_eq!(outcome, Outcome::Ignored);
        assert!(controller.is_dragging(a));
        assert!(!controller.is_resizing(b));
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        let outcome = controller.pointer_down(
            &mut store,
            PointerTarget::Body(id),
            Point::new(30.0, 30.0),
            MouseButton::Right,
        );
        assert_eq!(outcome, Outcome::Ignored);
        assert!(!controller.is_active());
    }

    #[test]
    fn test_remove_button() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        let outcome = controller.pointer_down(
            &mut store,
            PointerTarget::RemoveButton(id),
            Point::new(200.0, 30.0),
            MouseButton::Left,
        );
        assert_eq!(outcome, Outcome::Removed(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_during_gesture_releases() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        controller.begin_drag(&store, id, Point::new(30.0, 30.0));

        assert_eq!(controller.remove_widget(&mut store, id), Outcome::Removed(id));
        assert!(!controller.is_active());
        assert!(!controller.router().is_captured());
    }

    #[test]
    fn test_widget_vanishing_ends_gesture() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        controller.begin_resize(&store, id, Handle::SouthEast, Point::new(220.0, 140.0));
        store.remove(id);

        assert_eq!(
            controller.pointer_move(&mut store, Point::new(300.0, 300.0)),
            Outcome::Released(id)
        );
        assert!(!controller.router().is_captured());
        assert!(store.is_empty());
    }

    #[test]
    fn test_expire_stale() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        controller.begin_drag(&store, id, Point::new(30.0, 30.0));

        assert_eq!(controller.expire_stale(&mut store, Instant::now()), Outcome::Ignored);
        assert!(controller.is_active());

        let later = Instant::now() + DEFAULT_GESTURE_TIMEOUT + Duration::from_secs(1);
        assert_eq!(controller.expire_stale(&mut store, later), Outcome::Released(id));
        assert!(!controller.is_active());
        assert_eq!(geometry_of(&store, id), DEFAULT_GEOMETRY);
    }

    #[test]
    fn test_cancel_keeps_last_commit() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;
        controller.begin_drag(&store, id, Point::new(30.0, 30.0));
        controller.pointer_move(&mut store, Point::new(110.0, 110.0));

        assert_eq!(controller.cancel(&mut store), Outcome::Released(id));
        assert_eq!(controller.pointer_move(&mut store, Point::new(300.0, 300.0)), Outcome::Ignored);
        assert_eq!(geometry_of(&store, id), Geometry::new(100, 100, 200, 120));
        assert_eq!(controller.cancel(&mut store), Outcome::Ignored);
    }

    #[test]
    fn test_pointer_up_flushes_debounced_store() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = LayoutStore::new(
            LayoutPersistence::new(storage.clone()),
            WritePolicy::Debounced(Duration::from_secs(60)),
        );
        let mut controller =
            InteractionController::new(GridSpec::default(), Dimensions::new(600, 600));
        let id = store.add_default().id;
        controller.begin_drag(&store, id, Point::new(30.0, 30.0));
        controller.pointer_move(&mut store, Point::new(110.0, 110.0));
        assert!(store.is_dirty());

        controller.pointer_up(&mut store);
        assert!(!store.is_dirty());
        let saved = LayoutPersistence::new(storage).load_layout().unwrap().unwrap();
        assert_eq!(saved[0].geometry(), Geometry::new(100, 100, 200, 120));
    }

    #[test]
    fn test_handle_event_hit_tests() {
        let (mut store, mut controller) = setup();
        let id = store.add_default().id;

        let outcome = controller.handle_event(
            &mut store,
            PointerEvent::Down {
                position: Point::new(100.0, 100.0),
                button: MouseButton::Left,
            },
        );
        assert_eq!(outcome, Outcome::DragStarted(id));

        controller.handle_event(
            &mut store,
            PointerEvent::Move {
                position: Point::new(140.0, 100.0),
            },
        );
        let outcome = controller.handle_event(
            &mut store,
            PointerEvent::Up {
                position: Point::new(140.0, 100.0),
                button: MouseButton::Left,
            },
        );
        assert_eq!(outcome, Outcome::Released(id));
        assert_eq!(geometry_of(&store, id), Geometry::new(60, 20, 200, 120));
    }
}
