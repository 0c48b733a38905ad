//! Button components: filled action buttons and plain text buttons.

use egui::{Color32, CornerRadius, CursorIcon, FontId, Pos2, Sense, Ui, vec2};

use crate::{sizing, theme};

/// Color scheme of an [`ActionButton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Danger,
    Success,
}

impl ButtonVariant {
    /// Fill color at rest.
    pub fn fill(self) -> Color32 {
        match self {
            ButtonVariant::Primary => theme::PRIMARY,
            ButtonVariant::Danger => theme::DANGER,
            ButtonVariant::Success => theme::SUCCESS,
        }
    }

    /// Fill color under the pointer.
    pub fn hover_fill(self) -> Color32 {
        match self {
            ButtonVariant::Primary => Color32::from_rgb(0, 105, 217),
            ButtonVariant::Danger => Color32::from_rgb(200, 35, 51),
            ButtonVariant::Success => Color32::from_rgb(33, 136, 56),
        }
    }
}

/// A solid, rounded button with white text.
pub struct ActionButton<'a> {
    label: &'a str,
    tooltip: Option<&'a str>,
    variant: ButtonVariant,
}

impl<'a> ActionButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            tooltip: None,
            variant: ButtonVariant::Primary,
        }
    }

    pub fn primary(label: &'a str) -> Self {
        Self::new(label)
    }

    pub fn danger(label: &'a str) -> Self {
        Self::new(label).variant(ButtonVariant::Danger)
    }

    pub fn success(label: &'a str) -> Self {
        Self::new(label).variant(ButtonVariant::Success)
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set a hover tooltip.
    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), FontId::proportional(14.0), Color32::WHITE);
        let size = vec2(
            galley.size().x + sizing::BUTTON_PADDING_X * 2.0,
            sizing::BUTTON_HEIGHT,
        );
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let fill = if response.hovered() {
                self.variant.hover_fill()
            } else {
                self.variant.fill()
            };
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), fill);

            let text_pos = Pos2::new(
                rect.center().x - galley.size().x / 2.0,
                rect.center().y - galley.size().y / 2.0,
            );
            ui.painter().galley(text_pos, galley, Color32::WHITE);
        }

        let clicked = response.clicked();
        let response = response.on_hover_cursor(CursorIcon::PointingHand);
        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip);
        }
        clicked
    }
}

/// A compact outlined button sized to its label, with an optional key hint.
pub struct TextButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
}

impl<'a> TextButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
        }
    }

    /// Show `key` after the label as a hint.
    pub fn shortcut(mut self, key: &'a str) -> Self {
        self.shortcut = Some(key);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let painter = ui.painter();
        let label = painter.layout_no_wrap(self.label.to_string(), FontId::proportional(12.0), theme::TEXT);
        let hint = self
            .shortcut
            .map(|key| painter.layout_no_wrap(key.to_string(), FontId::monospace(10.0), theme::TEXT_MUTED));
        let hint_width = hint.as_ref().map_or(0.0, |g| g.size().x + 6.0);
        let size = vec2(label.size().x + hint_width + 16.0, 22.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let fill = if response.hovered() {
                theme::HOVER_BG
            } else {
                Color32::TRANSPARENT
            };
            let corner = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, corner, fill);
            ui.painter()
                .rect_stroke(rect, corner, egui::Stroke::new(1.0, theme::BORDER), egui::StrokeKind::Inside);

            let left = rect.left() + 8.0;
            let label_height = label.size().y;
            ui.painter()
                .galley(Pos2::new(left, rect.center().y - label_height / 2.0), label.clone(), theme::TEXT);
            if let Some(hint) = hint {
                let x = left + label.size().x + 6.0;
                let y = rect.center().y - hint.size().y / 2.0;
                ui.painter().galley(Pos2::new(x, y), hint, theme::TEXT_MUTED);
            }
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
