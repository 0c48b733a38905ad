//! Application configuration.
//!
//! Loaded from a JSON file. Every section is optional and falls back to the
//! compiled-in defaults, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "grid":        { "size": 20, "min_width": 100, "min_height": 60 },
//!   "canvas":      { "width": 1200, "height": 600 },
//!   "widget":      { "x": 20, "y": 20, "width": 200, "height": 120 },
//!   "persistence": { "debounce_ms": 0, "data_dir": null },
//!   "interaction": { "gesture_timeout_ms": 10000 },
//!   "window":      { "title": "Gridboard", "width": 1280, "height": 800 }
//! }
//! ```

use crate::geometry::{Dimensions, GRID_SIZE, Geometry, GridSpec, MIN_HEIGHT, MIN_WIDTH};
use crate::layout::DEFAULT_GEOMETRY;
use crate::storage::WritePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest accepted grid, canvas or widget dimension (pixels).
pub const MAX_DIMENSION: i32 = 1 << 20;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "GRIDBOARD_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Geometry of newly added widgets.
    #[serde(default)]
    pub widget: WidgetDefaults,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Grid unit and minimum widget size, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: i32,
    pub min_width: i32,
    pub min_height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: GRID_SIZE,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        }
    }
}

/// Preferred canvas size. The shell shrinks it to fit the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetDefaults {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for WidgetDefaults {
    fn default() -> Self {
        let g = DEFAULT_GEOMETRY;
        Self {
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Minimum time between layout writes (ms). `0` writes on every change.
    pub debounce_ms: u64,
    /// Directory for layout files. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// A gesture with no pointer events for this long is released (ms).
    pub gesture_timeout_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            gesture_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gridboard".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Where the config file lives: `$GRIDBOARD_CONFIG`, else
    /// `<config dir>/gridboard/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("gridboard").join("config.json"))
    }

    /// Reject values no layout can satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid.size must be positive, got {}",
                self.grid.size
            )));
        }
        if self.grid.min_width <= 0 || self.grid.min_height <= 0 {
            return Err(ConfigError::Invalid(
                "grid.min_width and grid.min_height must be positive".to_string(),
            ));
        }
        let w = &self.widget;
        let bounded = [
            ("grid.size", self.grid.size),
            ("grid.min_width", self.grid.min_width),
            ("grid.min_height", self.grid.min_height),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("widget.x", w.x),
            ("widget.y", w.y),
            ("widget.width", w.width),
            ("widget.height", w.height),
        ];
        for (name, value) in bounded {
            if !(-MAX_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between -{} and {}, got {}",
                    name, MAX_DIMENSION, MAX_DIMENSION, value
                )));
            }
        }

        let min = self.grid_spec().min_size();
        let extent = self.grid_spec().extent(self.container());
        if extent.width < min.width || extent.height < min.height {
            return Err(ConfigError::Invalid(format!(
                "canvas {}x{} cannot hold a {}x{} widget",
                self.canvas.width, self.canvas.height, min.width, min.height
            )));
        }

        // Off-grid defaults are fine, the shell snaps new widgets on insert
        let g = self.default_geometry();
        if g.width < min.width || g.height < min.height || !g.fits_within(extent) {
            return Err(ConfigError::Invalid(format!(
                "default widget {}x{} at ({}, {}) does not fit a {}x{} canvas with minimum {}x{}",
                g.width, g.height, g.x, g.y, extent.width, extent.height, min.width, min.height
            )));
        }
        Ok(())
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(
            self.grid.size,
            Dimensions::new(self.grid.min_width, self.grid.min_height),
        )
    }

    pub fn container(&self) -> Dimensions {
        Dimensions::new(self.canvas.width, self.canvas.height)
    }

    pub fn default_geometry(&self) -> Geometry {
        let w = &self.widget;
        Geometry::new(w.x, w.y, w.width, w.height)
    }

    pub fn write_policy(&self) -> WritePolicy {
        WritePolicy::from_millis(self.persistence.debounce_ms)
    }

    pub fn gesture_timeout(&self) -> Duration {
        Duration::from_millis(self.interaction.gesture_timeout_ms)
    }
}

/// Error from loading or validating a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.grid.size, 20);
        assert_eq!(cfg.container(), Dimensions::new(1200, 600));
        assert_eq!(cfg.default_geometry(), Geometry::new(20, 20, 200, 120));
        assert_eq!(cfg.write_policy(), WritePolicy::Immediate);
        assert_eq!(cfg.gesture_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.window.title, "Gridboard");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialize_partial_sections() {
        let json = r#"{
            "grid": { "size": 10 },
            "persistence": { "debounce_ms": 500, "data_dir": "/tmp/layouts" }
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.grid.size, 10);
        assert_eq!(cfg.grid.min_width, MIN_WIDTH);
        assert_eq!(cfg.write_policy(), WritePolicy::Debounced(Duration::from_millis(500)));
        assert_eq!(cfg.persistence.data_dir, Some(PathBuf::from("/tmp/layouts")));
        assert_eq!(cfg.canvas, CanvasConfig::default());
    }

    #[test]
    fn unknown_keys_ignored() {
        let json = r#"{ "grid": {}, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn validate_rejects_zero_grid() {
        let mut cfg = Config::default();
        cfg.grid.size = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_tiny_canvas() {
        let mut cfg = Config::default();
        cfg.canvas.width = 90;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn grid_spec_rounds_minimum() {
        let mut cfg = Config::default();
        cfg.grid.min_width = 110;
        assert_eq!(cfg.grid_spec().min_size(), Dimensions::new(120, 60));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "canvas": {{ "width": 800, "height": 400 }} }}"#).unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.container(), Dimensions::new(800, 400));
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Read { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ nope").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{ "grid": { "size": -5 } }"#).unwrap();
        assert!(matches!(Config::load(&invalid), Err(ConfigError::Invalid(_))));

        let huge = dir.path().join("huge.json");
        std::fs::write(&huge, r#"{ "grid": { "min_width": 2147483647 } }"#).unwrap();
        assert!(matches!(Config::load(&huge), Err(ConfigError::Invalid(_))));

        let far = dir.path().join("far.json");
        std::fs::write(&far, r#"{ "widget": { "x": 2147483647 } }"#).unwrap();
        assert!(matches!(Config::load(&far), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_misfit_widget_defaults() {
        let mut cfg = Config::default();
        cfg.widget.width = 50;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = Config::default();
        cfg.widget.x = 5000;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = Config::default();
        cfg.widget.y = -20;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        // Off-grid but inside the canvas is accepted
        let mut cfg = Config::default();
        cfg.widget.x = 25;
        assert!(cfg.validate().is_ok());
    }
}
