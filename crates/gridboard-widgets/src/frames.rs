//! Floating frames for the page chrome.

use egui::epaint::Shadow;
use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

use crate::{sizing, theme};

/// Rounded, bordered frame floating above the canvas.
fn floating(elevation: u8, margin: Margin) -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(Shadow {
            spread: 0,
            blur: elevation * 2,
            offset: [0, (elevation / 2) as i8],
            color: Color32::from_black_alpha(10 + elevation),
        })
        .inner_margin(margin)
}

/// Frame for the button row above the canvas.
pub fn toolbar_frame() -> Frame {
    floating(3, Margin::symmetric(14, 8))
}

/// Frame for small read-outs such as the storage debug panel.
pub fn panel_frame() -> Frame {
    floating(4, Margin::same(10))
}
