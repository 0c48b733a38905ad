//! Gridboard Core Library
//!
//! Platform-agnostic data structures and logic for the Gridboard widget
//! canvas: grid geometry, the widget layout store and its persistence, and
//! the pointer interaction state machine.

pub mod capture;
pub mod config;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod storage;
pub mod view;
pub mod widget;

pub use capture::{PointerCapture, PointerRouter};
pub use config::{Config, ConfigError};
pub use geometry::{
    Dimensions, GRID_SIZE, Geometry, GridSpec, Handle, RawGeometry, clamp_to_container,
    fit_resized, place_dragged, resize_from_handle, snap_to_grid, snap_value,
};
pub use input::{MouseButton, PointerEvent, PointerTarget, PointerTracker};
pub use interaction::{InteractionController, InteractionMode, Outcome};
pub use layout::{DEFAULT_GEOMETRY, LayoutStore};
pub use storage::{
    FileStorage, LAYOUT_KEY, LayoutPersistence, MemoryStorage, Storage, StorageError,
    StorageResult, WritePolicy,
};
pub use view::{CanvasView, WidgetView};
pub use widget::{Widget, WidgetId, WidgetPatch};
