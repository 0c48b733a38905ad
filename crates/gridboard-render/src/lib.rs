//! Gridboard Render Library
//!
//! Renderer abstraction for the Gridboard canvas. The bundled
//! [`SceneBuilder`] turns a [`gridboard_core::view::CanvasView`] into a flat
//! list of draw commands that any immediate-mode backend can replay.

mod renderer;
mod scene;

pub use renderer::{GridStyle, Palette, RenderContext, Renderer};
pub use scene::{DrawCommand, Rounding, Scene, SceneBuilder, TextAnchor};
