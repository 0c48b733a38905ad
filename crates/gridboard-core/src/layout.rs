//! Layout store: the ordered widget collection and its persistence.

use crate::geometry::{Dimensions, Geometry, GridSpec, clamp_to_container, snap_value};
use crate::storage::{LayoutPersistence, LayoutWriter, Storage, WritePolicy};
use crate::widget::{Widget, WidgetId, WidgetPatch};
use std::collections::HashSet;
use std::time::Instant;

/// Geometry of a freshly added widget.
pub const DEFAULT_GEOMETRY: Geometry = Geometry::new(20, 20, 200, 120);

/// Owns the widgets, hands out ids and writes every mutation through to
/// storage (subject to the [`WritePolicy`]).
pub struct LayoutStore<S: Storage + ?Sized> {
    widgets: Vec<Widget>,
    next_id: WidgetId,
    writer: LayoutWriter<S>,
    default_geometry: Geometry,
}

impl<S: Storage + ?Sized> LayoutStore<S> {
    /// Create an empty store. Call [`LayoutStore::load`] to restore saved state.
    pub fn new(persistence: LayoutPersistence<S>, policy: WritePolicy) -> Self {
        Self {
            widgets: Vec::new(),
            next_id: 0,
            writer: LayoutWriter::new(persistence, policy),
            default_geometry: DEFAULT_GEOMETRY,
        }
    }

    /// Set the geometry used by [`LayoutStore::add_default`].
    pub fn with_default_geometry(mut self, geometry: Geometry) -> Self {
        self.default_geometry = geometry;
        self
    }

    /// Replace the in-memory layout with the saved one.
    ///
    /// Missing or unreadable snapshots yield an empty layout. Duplicate ids
    /// keep their first occurrence. `WidgetId::MAX` is reserved (it has no
    /// successor to continue from), so widgets carrying it are dropped.
    pub fn load(&mut self) -> &[Widget] {
        let loaded = match self.writer.persistence().load_layout() {
            Ok(Some(widgets)) => widgets,
            Ok(None) => {
                log::info!("No saved layout, starting empty");
                Vec::new()
            }
            Err(e) => {
                log::error!("Discarding saved layout: {}", e);
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        self.widgets = loaded
            .into_iter()
            .filter(|w| {
                if w.id == WidgetId::MAX {
                    log::warn!("Dropping widget with reserved id {} from saved layout", w.id);
                    return false;
                }
                let fresh = seen.insert(w.id);
                if !fresh {
                    log::warn!("Dropping duplicate widget id {} from saved layout", w.id);
                }
                fresh
            })
            .collect();
        self.next_id = self
            .widgets
            .iter()
            .filter_map(|w| w.id.checked_add(1))
            .max()
            .unwrap_or(0);

        log::info!("Loaded {} widgets", self.widgets.len());
        &self.widgets
    }

    /// Append a widget with the next id. `None` titles it `"Widget {id}"`.
    pub fn add(&mut self, geometry: Geometry, title: Option<String>) -> Widget {
        let id = self.allocate_id();
        let title = title.unwrap_or_else(|| Widget::default_title(id));
        let widget = Widget::new(id, geometry, title);
        self.widgets.push(widget.clone());
        log::debug!("Added widget {} at {:?}", id, geometry);
        self.persist();
        widget
    }

    /// Add a widget with the default geometry and title.
    pub fn add_default(&mut self) -> Widget {
        self.add(self.default_geometry, None)
    }

    /// Merge `patch` into widget `id`. Returns false if there is no such widget.
    pub fn update(&mut self, id: WidgetId, patch: WidgetPatch) -> bool {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        if patch.apply(widget) {
            self.persist();
        }
        true
    }

    /// Remove widget `id`. Returns false if there is no such widget.
    pub fn remove(&mut self, id: WidgetId) -> bool {
        let Some(index) = self.widgets.iter().position(|w| w.id == id) else {
            return false;
        };
        self.widgets.remove(index);
        log::debug!("Removed widget {}", id);
        self.persist();
        true
    }

    /// Drop every widget, reset ids and delete the saved layout.
    pub fn clear(&mut self) {
        self.widgets.clear();
        self.next_id = 0;
        if let Err(e) = self.writer.clear() {
            log::error!("Failed to delete saved layout ({}), writing an empty one", e);
            self.writer.flush(&self.widgets);
        }
        log::info!("Cleared layout");
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Widgets in insertion order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// The id the next added widget will get.
    pub fn next_id(&self) -> WidgetId {
        self.next_id
    }

    pub fn default_geometry(&self) -> Geometry {
        self.default_geometry
    }

    /// Number of widgets in the saved snapshot (0 if absent or unreadable).
    pub fn stored_count(&self) -> usize {
        match self.writer.persistence().load_layout() {
            Ok(Some(widgets)) => widgets.len(),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Saved layout is unreadable: {}", e);
                0
            }
        }
    }

    /// Snap and clamp every widget into `container`. Returns how many moved.
    pub fn fit_to_container(&mut self, container: Dimensions, grid: &GridSpec) -> usize {
        let extent = grid.extent(container);
        let unit = grid.unit();
        let mut changed = 0;
        for widget in &mut self.widgets {
            let g = widget.geometry();
            let aligned = Geometry::new(
                snap_value(g.x as f64, unit),
                snap_value(g.y as f64, unit),
                snap_value(g.width as f64, unit),
                snap_value(g.height as f64, unit),
            );
            let fitted = clamp_to_container(aligned, extent, grid.min_size());
            if fitted != g {
                widget.set_geometry(fitted);
                changed += 1;
            }
        }
        if changed > 0 {
            log::debug!("Refitted {} widgets into {}x{}", changed, extent.width, extent.height);
            self.persist();
        }
        changed
    }

    /// Check if there are changes storage has not seen yet.
    pub fn is_dirty(&self) -> bool {
        self.writer.is_dirty()
    }

    /// Write pending changes now. Returns false if the write failed.
    pub fn flush(&mut self) -> bool {
        self.writer.flush(&self.widgets)
    }

    /// Write pending changes if the debounce interval has passed.
    pub fn maybe_flush(&mut self, now: Instant) -> bool {
        self.writer.maybe_save_at(&self.widgets, now)
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.writer.policy()
    }

    /// Hand out the next id. Once the counter reaches the reserved
    /// `WidgetId::MAX`, fall back to the lowest id not in use.
    fn allocate_id(&mut self) -> WidgetId {
        if self.next_id < WidgetId::MAX {
            let id = self.next_id;
            self.next_id += 1;
            return id;
        }
        let used: HashSet<WidgetId> = self.widgets.iter().map(|w| w.id).collect();
        let id = (0..WidgetId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or(WidgetId::MAX);
        log::warn!("Widget id counter exhausted, reusing free id {}", id);
        id
    }

    fn persist(&mut self) {
        self.writer.record(&self.widgets);
    }
}
