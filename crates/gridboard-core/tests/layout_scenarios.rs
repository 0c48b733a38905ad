//! End-to-end layout scenarios against file-backed storage.

use std::sync::Arc;

use gridboard_core::{
    Config, Dimensions, FileStorage, Geometry, Handle, InteractionController, LAYOUT_KEY,
    LayoutPersistence, LayoutStore, MouseButton, Outcome, PointerEvent, Storage, WidgetPatch,
};
use kurbo::Point;
use tempfile::tempdir;

fn open(dir: &std::path::Path, config: &Config) -> LayoutStore<FileStorage> {
    let storage = Arc::new(FileStorage::new(dir.to_path_buf()).unwrap());
    let mut store = LayoutStore::new(LayoutPersistence::new(storage), config.write_policy())
        .with_default_geometry(config.default_geometry());
    store.load();
    store
}

fn controller(config: &Config, container: Dimensions) -> InteractionController {
    InteractionController::new(config.grid_spec(), container)
        .with_gesture_timeout(config.gesture_timeout())
}

fn down(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Down {
        position: Point::new(x, y),
        button: MouseButton::Left,
    }
}

fn moved(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Move {
        position: Point::new(x, y),
    }
}

fn up(x: f64, y: f64) -> PointerEvent {
    PointerEvent::Up {
        position: Point::new(x, y),
        button: MouseButton::Left,
    }
}

#[test]
fn add_then_drag_survives_restart() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    let mut controller = controller(&config, Dimensions::new(600, 600));

    let widget = store.add_default();
    assert_eq!(widget.id, 0);
    assert_eq!(widget.geometry(), Geometry::new(20, 20, 200, 120));

    assert_eq!(controller.handle_event(&mut store, down(30.0, 30.0)), Outcome::DragStarted(0));
    assert_eq!(
        controller.handle_event(&mut store, moved(67.0, 93.0)),
        Outcome::Committed(0, Geometry::new(60, 80, 200, 120))
    );
    assert_eq!(controller.handle_event(&mut store, up(67.0, 93.0)), Outcome::Released(0));
    drop(store);

    let reopened = open(dir.path(), &config);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(0).map(|w| w.geometry()), Some(Geometry::new(60, 80, 200, 120)));
    assert_eq!(reopened.next_id(), 1);
}

#[test]
fn resize_from_corner_via_hit_test() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    let mut controller = controller(&config, Dimensions::new(600, 600));
    store.add_default();

    // South-east handle is centred on (220, 140)
    assert_eq!(
        controller.handle_event(&mut store, down(222.0, 141.0)),
        Outcome::ResizeStarted(0, Handle::SouthEast)
    );
    controller.handle_event(&mut store, moved(62.0, 141.0));
    controller.handle_event(&mut store, up(62.0, 141.0));
    assert_eq!(store.get(0).map(|w| w.width), Some(100));

    assert_eq!(
        controller.handle_event(&mut store, down(18.0, 18.0)),
        Outcome::ResizeStarted(0, Handle::NorthWest)
    );
    controller.handle_event(&mut store, moved(-300.0, -300.0));
    controller.handle_event(&mut store, up(-300.0, -300.0));
    assert_eq!(store.get(0).map(|w| w.geometry()), Some(Geometry::new(0, 0, 120, 140)));
}

#[test]
fn remove_button_deletes_widget() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    let mut controller = controller(&config, Dimensions::new(600, 600));
    store.add_default();
    store.add(Geometry::new(300, 300, 200, 120), None);

    // Remove button of widget 1 sits at (468..488, 306..326)
    assert_eq!(controller.handle_event(&mut store, down(478.0, 316.0)), Outcome::Removed(1));
    assert_eq!(controller.handle_event(&mut store, up(478.0, 316.0)), Outcome::Ignored);
    assert_eq!(open(dir.path(), &config).len(), 1);
}

#[test]
fn clear_then_reload_starts_over() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    for _ in 0..3 {
        store.add_default();
    }
    assert_eq!(store.stored_count(), 3);

    store.clear();
    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    assert!(!storage.exists(LAYOUT_KEY).unwrap());

    let mut reopened = open(dir.path(), &config);
    assert!(reopened.is_empty());
    assert_eq!(reopened.add_default().id, 0);
}

#[test]
fn corrupt_snapshot_recovers_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("gridWidgets.json"), "not json at all").unwrap();

    let config = Config::default();
    let mut store = open(dir.path(), &config);
    assert!(store.is_empty());
    assert_eq!(store.stored_count(), 0);

    // The next write replaces the corrupt payload
    store.add_default();
    assert_eq!(open(dir.path(), &config).len(), 1);
}

#[test]
fn title_edits_persist() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    store.add_default();
    assert!(store.update(0, WidgetPatch::title("Revenue")));

    let reopened = open(dir.path(), &config);
    assert_eq!(reopened.get(0).map(|w| w.title.as_str()), Some("Revenue"));
}

#[test]
fn shrinking_the_canvas_refits_widgets() {
    let dir = tempdir().unwrap();
    let config = Config::default();
    let mut store = open(dir.path(), &config);
    let mut controller = controller(&config, Dimensions::new(1200, 600));
    store.add(Geometry::new(900, 400, 200, 120), None);

    let smaller = Dimensions::new(700, 450);
    controller.set_container(smaller);
    assert_eq!(store.fit_to_container(smaller, controller.grid()), 1);
    assert_eq!(store.get(0).map(|w| w.geometry()), Some(Geometry::new(500, 320, 200, 120)));
}
