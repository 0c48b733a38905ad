//! Gridboard Application
//!
//! The native shell: window and GPU surface, egui integration, the toolbar,
//! and routing of window pointer events into the interaction controller.

mod app;
mod canvas_painter;
mod ui;

pub use app::{App, AppError};
pub use ui::{UiAction, UiState, render_ui};
