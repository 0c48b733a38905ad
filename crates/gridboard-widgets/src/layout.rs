//! Labels and separators for horizontal toolbars.

use egui::{Pos2, RichText, Stroke, Ui};

use crate::theme;

/// Thin vertical rule centred on the row, as tall as a toolbar button.
pub fn vertical_separator(ui: &mut Ui) {
    let row = ui.available_rect_before_wrap();
    let half = crate::sizing::BUTTON_HEIGHT / 2.0 - 6.0;
    let x = row.left() + 1.0;
    let y = row.center().y;
    ui.painter().line_segment(
        [Pos2::new(x, y - half), Pos2::new(x, y + half)],
        Stroke::new(1.0, theme::BORDER),
    );
    ui.add_space(4.0);
}

/// Small caps heading above a control group.
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text.to_uppercase()).size(10.0).color(theme::TEXT_MUTED));
}

/// One-line status read-out in the content text color.
pub fn status_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(14.0).color(theme::TEXT_MUTED));
}
