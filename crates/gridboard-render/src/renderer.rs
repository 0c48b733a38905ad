//! Renderer trait abstraction.

use gridboard_core::input::PointerTarget;
use gridboard_core::view::CanvasView;
use peniko::Color;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only corner crosses (+).
    CrossPlus,
    /// Only corner dots (.).
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::CrossPlus,
            GridStyle::CrossPlus => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::CrossPlus => "Crosses",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Colors used to paint the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub border: Color,
    pub accent: Color,
    pub widget_fill: Color,
    pub header_text: Color,
    pub content_text: Color,
    pub shadow: Color,
    /// Overlay drawn on a hovered remove button.
    pub button_hover: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(250, 250, 250, 255),
            grid: Color::from_rgba8(224, 224, 224, 255),
            border: Color::from_rgba8(221, 221, 221, 255),
            accent: Color::from_rgba8(0, 123, 255, 255),
            widget_fill: Color::WHITE,
            header_text: Color::WHITE,
            content_text: Color::from_rgba8(102, 102, 102, 255),
            shadow: Color::from_rgba8(0, 0, 0, 26),
            button_hover: Color::from_rgba8(255, 255, 255, 51),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render, in canvas coordinates.
    pub view: &'a CanvasView,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub palette: Palette,
    pub grid_style: GridStyle,
    /// What the pointer is currently over, for hover feedback.
    pub hovered: Option<PointerTarget>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(view: &'a CanvasView) -> Self {
        Self {
            view,
            scale_factor: 1.0,
            palette: Palette::default(),
            grid_style: GridStyle::Lines,
            hovered: None,
        }
    }

    /// Width in points of a line one device pixel wide.
    pub fn hairline(&self) -> f64 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            1.0 / self.scale_factor
        } else {
            1.0
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_hovered(mut self, hovered: Option<PointerTarget>) -> Self {
        self.hovered = hovered;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the draw commands for a frame.
    ///
    /// Called once per frame; must prepare everything the frame draws.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.palette.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_style_cycles() {
        let mut style = GridStyle::default();
        assert_eq!(style, GridStyle::Lines);
        for _ in 0..4 {
            style = style.next();
        }
        assert_eq!(style, GridStyle::Lines);
        assert_eq!(GridStyle::CrossPlus.name(), "Crosses");
    }

    #[test]
    fn test_hairline_follows_scale_factor() {
        let view = CanvasView {
            widgets: Vec::new(),
            container: gridboard_core::Dimensions::new(100, 60),
            extent: gridboard_core::Dimensions::new(100, 60),
            grid_unit: 20,
        };
        assert_eq!(RenderContext::new(&view).hairline(), 1.0);
        assert_eq!(RenderContext::new(&view).with_scale_factor(2.0).hairline(), 0.5);
        assert_eq!(RenderContext::new(&view).with_scale_factor(0.0).hairline(), 1.0);
    }
}
