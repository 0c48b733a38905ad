//! Toolbar and status UI.

use egui::{Align2, Context, Vec2};
use gridboard_render::GridStyle;
use gridboard_widgets::{
    ActionButton, TextButton, panel_frame, section_label, status_label, toolbar_frame,
    vertical_separator,
};

/// Height reserved above the canvas for the toolbar (points).
pub const TOOLBAR_HEIGHT: f32 = 64.0;

/// Actions the toolbar can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    AddWidget,
    ClearAll,
    DebugStorage,
    CycleGrid,
}

/// UI state that persists between frames.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub grid_style: GridStyle,
    /// Widget count read back from storage by the last debug request.
    pub storage_debug: Option<usize>,
}

/// Status line shown next to the toolbar buttons.
pub fn status_text(widget_count: usize) -> String {
    format!("Widgets: {} | Drag to move, resize from corners", widget_count)
}

/// Render the toolbar and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState, widget_count: usize) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(Align2::LEFT_TOP, Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            toolbar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(10.0, 0.0);

                    if ActionButton::primary("Add Widget").show(ui) {
                        action = Some(UiAction::AddWidget);
                    }
                    if ActionButton::danger("Clear All")
                        .tooltip("Remove every widget and the saved layout")
                        .show(ui)
                    {
                        action = Some(UiAction::ClearAll);
                    }
                    if ActionButton::success("Debug Storage")
                        .tooltip("Read the saved layout back from storage")
                        .show(ui)
                    {
                        action = Some(UiAction::DebugStorage);
                    }

                    vertical_separator(ui);
                    ui.vertical(|ui| {
                        section_label(ui, "Grid");
                        if TextButton::new(ui_state.grid_style.name())
                            .shortcut("G")
                            .show(ui)
                        {
                            action = Some(UiAction::CycleGrid);
                        }
                    });

                    vertical_separator(ui);
                    status_label(ui, &status_text(widget_count));
                });
            });
        });

    if let Some(stored) = ui_state.storage_debug {
        egui::Area::new(egui::Id::new("storage_debug"))
            .anchor(Align2::RIGHT_TOP, Vec2::new(-12.0, 12.0))
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    status_label(ui, &format!("Widgets in storage: {}", stored));
                });
            });
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(
            status_text(3),
            "Widgets: 3 | Drag to move, resize from corners"
        );
    }

    #[test]
    fn test_toolbar_renders_without_input() {
        let ctx = Context::default();
        let state = UiState {
            storage_debug: Some(2),
            ..Default::default()
        };
        let mut action = Some(UiAction::AddWidget);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            action = render_ui(ctx, &state, 2);
        });
        assert_eq!(action, None);
    }
}
