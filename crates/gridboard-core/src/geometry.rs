//! Grid geometry: snapping, bounds clamping and corner-handle resizing.
//!
//! Everything in here is pure. The interaction controller feeds pointer
//! positions in, and gets grid-aligned, container-bounded geometry back.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid unit in pixels (matches the painted grid).
pub const GRID_SIZE: i32 = 20;

/// Default minimum widget width.
pub const MIN_WIDTH: i32 = 100;

/// Default minimum widget height.
pub const MIN_HEIGHT: i32 = 60;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Position and size of a widget, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Bounding rectangle in canvas coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.right() as f64,
            self.bottom() as f64,
        )
    }

    /// Check that every coordinate is a non-negative multiple of `unit`.
    pub fn is_grid_aligned(&self, unit: i32) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| *v >= 0 && v % unit == 0)
    }

    /// Check that the geometry lies fully inside `extent`.
    pub fn fits_within(&self, extent: Dimensions) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= extent.width && self.bottom() <= extent.height
    }
}

/// Unsnapped working geometry produced while a resize is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Geometry> for RawGeometry {
    fn from(g: Geometry) -> Self {
        Self {
            x: g.x as f64,
            y: g.y as f64,
            width: g.width as f64,
            height: g.height as f64,
        }
    }
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Handle {
    /// All handles, in paint order.
    pub const ALL: [Handle; 4] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthWest,
        Handle::SouthEast,
    ];

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::SouthWest)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::NorthEast)
    }

    /// The corner of `rect` this handle sits on.
    pub fn corner(self, rect: Rect) -> Point {
        let x = if self.moves_left_edge() { rect.x0 } else { rect.x1 };
        let y = if self.moves_top_edge() { rect.y0 } else { rect.y1 };
        Point::new(x, y)
    }
}

/// Grid unit plus the effective (grid-aligned) minimum widget size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    unit: i32,
    min_size: Dimensions,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            unit: GRID_SIZE,
            min_size: Dimensions::new(MIN_WIDTH, MIN_HEIGHT),
        }
    }
}

impl GridSpec {
    /// Build a grid spec, rounding the minimum size up to the grid.
    pub fn new(unit: i32, min_size: Dimensions) -> Self {
        let unit = if unit < 1 {
            log::warn!("Grid size {} is not positive, using 1", unit);
            1
        } else {
            unit
        };
        let aligned = Dimensions::new(
            round_up(min_size.width.max(unit), unit),
            round_up(min_size.height.max(unit), unit),
        );
        if aligned != min_size {
            log::warn!(
                "Minimum widget size {}x{} is not a multiple of the grid ({}), using {}x{}",
                min_size.width,
                min_size.height,
                unit,
                aligned.width,
                aligned.height
            );
        }
        Self {
            unit,
            min_size: aligned,
        }
    }

    pub fn unit(&self) -> i32 {
        self.unit
    }

    pub fn min_size(&self) -> Dimensions {
        self.min_size
    }

    /// The container size rounded down to a whole number of grid cells.
    pub fn extent(&self, container: Dimensions) -> Dimensions {
        Dimensions::new(
            round_down(container.width.max(0), self.unit),
            round_down(container.height.max(0), self.unit),
        )
    }
}

fn round_up(value: i32, unit: i32) -> i32 {
    value.saturating_add(unit - 1).div_euclid(unit) * unit
}

fn round_down(value: i32, unit: i32) -> i32 {
    value.div_euclid(unit) * unit
}

/// Snap a point to the nearest grid intersection.
///
/// Halfway values round away from zero.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Snap a single coordinate to the nearest multiple of `unit`.
pub fn snap_value(value: f64, unit: i32) -> i32 {
    let unit_f = unit as f64;
    ((value / unit_f).round() * unit_f) as i32
}

/// Clamp a geometry into a container.
///
/// Size is first clamped to `[min_size, container]`, then the position is
/// clamped so the geometry stays inside. A container smaller than the
/// minimum pins the widget to the origin at minimum size.
pub fn clamp_to_container(geometry: Geometry, container: Dimensions, min_size: Dimensions) -> Geometry {
    let width = geometry
        .width
        .clamp(min_size.width, container.width.max(min_size.width));
    let height = geometry
        .height
        .clamp(min_size.height, container.height.max(min_size.height));
    let x = geometry.x.clamp(0, (container.width - width).max(0));
    let y = geometry.y.clamp(0, (container.height - height).max(0));
    Geometry::new(x, y, width, height)
}

/// Apply a pointer displacement to a corner handle.
///
/// Sizes are floored at `min_size` before any snapping, and the position of
/// a moving left/top edge is derived from the floored size so the opposite
/// edge stays exactly where it was.
pub fn resize_from_handle(
    handle: Handle,
    start: Geometry,
    delta: Vec2,
    min_size: Dimensions,
) -> RawGeometry {
    let start_raw = RawGeometry::from(start);
    let min_w = min_size.width as f64;
    let min_h = min_size.height as f64;

    let (x, width) = if handle.moves_left_edge() {
        let width = (start_raw.width - delta.x).max(min_w);
        (start_raw.x + start_raw.width - width, width)
    } else {
        (start_raw.x, (start_raw.width + delta.x).max(min_w))
    };

    let (y, height) = if handle.moves_top_edge() {
        let height = (start_raw.height - delta.y).max(min_h);
        (start_raw.y + start_raw.height - height, height)
    } else {
        (start_raw.y, (start_raw.height + delta.y).max(min_h))
    };

    RawGeometry { x, y, width, height }
}

/// Finish a resize: clamp the moving edges to the container, snap them and
/// enforce the minimum by pushing the moving edge away from its anchor.
pub fn fit_resized(
    handle: Handle,
    raw: RawGeometry,
    container: Dimensions,
    min_size: Dimensions,
    unit: i32,
) -> Geometry {
    let (x, width) = fit_axis(
        raw.x,
        raw.width,
        handle.moves_left_edge(),
        container.width,
        min_size.width,
        unit,
    );
    let (y, height) = fit_axis(
        raw.y,
        raw.height,
        handle.moves_top_edge(),
        container.height,
        min_size.height,
        unit,
    );
    Geometry::new(x, y, width, height)
}

fn fit_axis(start: f64, len: f64, moves_start: bool, extent: i32, min: i32, unit: i32) -> (i32, i32) {
    if moves_start {
        let anchor = (start + len).round() as i32;
        let new_start = snap_value(start.max(0.0), unit).max(0).min(anchor - min);
        (new_start, anchor - new_start)
    } else {
        let anchor = start.round() as i32;
        let new_end = snap_value((start + len).min(extent as f64), unit)
            .min(extent)
            .max(anchor + min);
        (anchor, new_end - anchor)
    }
}

/// Place a dragged widget so its top-left corner follows `target`.
///
/// The target is snapped to the grid, then clamped so the widget stays
/// inside the grid-aligned extent of `container`.
pub fn place_dragged(geometry: Geometry, target: Point, container: Dimensions, grid: &GridSpec) -> Geometry {
    let unit = grid.unit();
    let candidate = Geometry::new(
        snap_value(target.x, unit),
        snap_value(target.y, unit),
        geometry.width,
        geometry.height,
    );
    clamp_to_container(candidate, grid.extent(container), grid.min_size())
}
