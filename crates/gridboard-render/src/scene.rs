//! Backend-neutral display list for the canvas.

use crate::renderer::{GridStyle, Palette, RenderContext, Renderer};
use gridboard_core::input::PointerTarget;
use gridboard_core::view::{HEADER_PADDING, WidgetView};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;

const CANVAS_RADIUS: f64 = 8.0;
const WIDGET_RADIUS: f64 = 8.0;
const HANDLE_RADIUS: f64 = 2.0;
const TITLE_SIZE: f64 = 14.0;
const CONTENT_SIZE: f64 = 12.0;
const REMOVE_GLYPH_SIZE: f64 = 16.0;

/// Per-corner radii.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rounding {
    pub nw: f64,
    pub ne: f64,
    pub sw: f64,
    pub se: f64,
}

impl Rounding {
    pub fn uniform(r: f64) -> Self {
        Self { nw: r, ne: r, sw: r, se: r }
    }

    /// Only the top corners rounded.
    pub fn top(r: f64) -> Self {
        Self { nw: r, ne: r, sw: 0.0, se: 0.0 }
    }
}

/// How a text position relates to the drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    LeftCenter,
}

/// A single draw operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        rounding: Rounding,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        rounding: Rounding,
        width: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    Text {
        position: Point,
        anchor: TextAnchor,
        text: String,
        size: f64,
        color: Color,
    },
}

/// Ordered draw commands, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn fill(&mut self, rect: Rect, rounding: Rounding, color: Color) {
        self.push(DrawCommand::FillRect { rect, rounding, color });
    }

    fn stroke(&mut self, rect: Rect, rounding: Rounding, width: f64, color: Color) {
        self.push(DrawCommand::StrokeRect { rect, rounding, width, color });
    }

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.push(DrawCommand::Line { from, to, width, color });
    }

    fn text(&mut self, position: Point, anchor: TextAnchor, text: impl Into<String>, size: f64, color: Color) {
        self.push(DrawCommand::Text {
            position,
            anchor,
            text: text.into(),
            size,
            color,
        });
    }
}

/// Builds a [`Scene`] from a canvas view.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_grid(&mut self, bounds: Rect, unit: f64, style: GridStyle, color: Color, hairline: f64) {
        if unit <= 0.0 {
            return;
        }
        let xs = steps(bounds.x0, bounds.x1, unit);
        let ys = steps(bounds.y0, bounds.y1, unit);
        match style {
            GridStyle::None => {}
            GridStyle::Lines => {
                for &x in &xs {
                    self.scene.line(Point::new(x, bounds.y0), Point::new(x, bounds.y1), hairline, color);
                }
                for &y in &ys {
                    self.scene.line(Point::new(bounds.x0, y), Point::new(bounds.x1, y), hairline, color);
                }
            }
            GridStyle::CrossPlus => {
                let arm = 3.0;
                for &x in &xs {
                    for &y in &ys {
                        self.scene.line(Point::new(x - arm, y), Point::new(x + arm, y), hairline, color);
                        self.scene.line(Point::new(x, y - arm), Point::new(x, y + arm), hairline, color);
                    }
                }
            }
            GridStyle::Dots => {
                let half = 1.5;
                for &x in &xs {
                    for &y in &ys {
                        let dot = Rect::new(x - half, y - half, x + half, y + half);
                        self.scene.fill(dot, Rounding::default(), color);
                    }
                }
            }
        }
    }

    fn render_widget(&mut self, widget: &WidgetView, palette: &Palette, hovered: Option<PointerTarget>) {
        let shadow_offset = if widget.is_active() { 8.0 } else { 4.0 };
        self.scene.fill(
            widget.frame + Vec2::new(0.0, shadow_offset),
            Rounding::uniform(WIDGET_RADIUS),
            palette.shadow,
        );
        self.scene.fill(widget.frame, Rounding::uniform(WIDGET_RADIUS), palette.widget_fill);

        // Header
        self.scene.fill(widget.header, Rounding::top(WIDGET_RADIUS - 2.0), palette.accent);
        self.scene.text(
            Point::new(widget.header.x0 + HEADER_PADDING, widget.header.center().y),
            TextAnchor::LeftCenter,
            widget.title.clone(),
            TITLE_SIZE,
            palette.header_text,
        );
        if hovered == Some(PointerTarget::RemoveButton(widget.id)) {
            self.scene.fill(widget.remove_button, Rounding::uniform(3.0), palette.button_hover);
        }
        self.scene.text(
            widget.remove_button.center(),
            TextAnchor::Center,
            "×",
            REMOVE_GLYPH_SIZE,
            palette.header_text,
        );

        // Body
        let content = widget.content();
        let center = content.center();
        self.scene.text(
            center - Vec2::new(0.0, CONTENT_SIZE * 0.75),
            TextAnchor::Center,
            "Widget Content",
            CONTENT_SIZE,
            palette.content_text,
        );
        self.scene.text(
            center + Vec2::new(0.0, CONTENT_SIZE * 0.75),
            TextAnchor::Center,
            format!("({})", widget.size_label),
            CONTENT_SIZE - 1.0,
            palette.content_text,
        );

        self.scene.stroke(widget.frame, Rounding::uniform(WIDGET_RADIUS), 2.0, palette.accent);

        for (_, rect) in &widget.handles {
            self.scene.fill(*rect, Rounding::uniform(HANDLE_RADIUS), palette.accent);
            self.scene.stroke(*rect, Rounding::uniform(HANDLE_RADIUS), 1.0, palette.widget_fill);
        }
    }
}

/// Grid line positions from `start` to `end` inclusive.
fn steps(start: f64, end: f64, unit: f64) -> Vec<f64> {
    let count = ((end - start) / unit).floor() as usize;
    (0..=count).map(|i| start + i as f64 * unit).collect()
}

impl Renderer for SceneBuilder {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let palette = ctx.palette;
        let bounds = ctx.view.bounds();

        self.scene.fill(bounds, Rounding::uniform(CANVAS_RADIUS), palette.background);
        self.render_grid(
            bounds,
            ctx.view.grid_unit as f64,
            ctx.grid_style,
            palette.grid,
            ctx.hairline(),
        );
        self.scene.stroke(bounds, Rounding::uniform(CANVAS_RADIUS), 2.0, palette.border);

        for widget in &ctx.view.widgets {
            self.render_widget(widget, &palette, ctx.hovered);
        }
    }
}
