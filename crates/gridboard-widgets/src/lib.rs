//! Reusable egui components for the Gridboard page chrome.
//!
//! - **Buttons**: filled action buttons and plain text buttons
//! - **Frames**: toolbar and panel frames
//! - **Layout**: separators, section and status labels

pub mod buttons;
pub mod frames;
pub mod layout;

pub use buttons::{ActionButton, ButtonVariant, TextButton};
pub use frames::{panel_frame, toolbar_frame};
pub use layout::{section_label, status_label, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Height of toolbar action buttons
    pub const BUTTON_HEIGHT: f32 = 36.0;
    /// Horizontal padding inside action buttons
    pub const BUTTON_PADDING_X: f32 = 20.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(102, 102, 102);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(221, 221, 221);
    /// Primary action (blue)
    pub const PRIMARY: Color32 = Color32::from_rgb(0, 123, 255);
    /// Destructive action (red)
    pub const DANGER: Color32 = Color32::from_rgb(220, 53, 69);
    /// Confirming action (green)
    pub const SUCCESS: Color32 = Color32::from_rgb(40, 167, 69);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
