//! Replays a render [`Scene`] onto an egui painter.

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Stroke, StrokeKind, Vec2};
use gridboard_render::{DrawCommand, Rounding, Scene, TextAnchor};
use peniko::Color;

/// Paint `scene` with canvas coordinates offset by `origin` (in points).
pub fn paint_scene(painter: &Painter, scene: &Scene, origin: Vec2) {
    for command in scene.commands() {
        match command {
            DrawCommand::FillRect {
                rect,
                rounding,
                color,
            } => {
                painter.rect_filled(to_rect(*rect, origin), corner_radius(*rounding), color32(*color));
            }
            DrawCommand::StrokeRect {
                rect,
                rounding,
                width,
                color,
            } => {
                painter.rect_stroke(
                    to_rect(*rect, origin),
                    corner_radius(*rounding),
                    Stroke::new(*width as f32, color32(*color)),
                    StrokeKind::Inside,
                );
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                painter.line_segment(
                    [to_pos(*from, origin), to_pos(*to, origin)],
                    Stroke::new(*width as f32, color32(*color)),
                );
            }
            DrawCommand::Text {
                position,
                anchor,
                text,
                size,
                color,
            } => {
                let align = match anchor {
                    TextAnchor::Center => Align2::CENTER_CENTER,
                    TextAnchor::LeftCenter => Align2::LEFT_CENTER,
                };
                painter.text(
                    to_pos(*position, origin),
                    align,
                    text,
                    FontId::proportional(*size as f32),
                    color32(*color),
                );
            }
        }
    }
}

pub(crate) fn color32(color: Color) -> Color32 {
    let rgba = color.to_rgba8();
    Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
}

pub(crate) fn to_pos(point: kurbo::Point, origin: Vec2) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32) + origin
}

fn to_rect(rect: kurbo::Rect, origin: Vec2) -> egui::Rect {
    egui::Rect::from_min_max(
        to_pos(rect.origin(), origin),
        to_pos(kurbo::Point::new(rect.x1, rect.y1), origin),
    )
}

fn corner_radius(rounding: Rounding) -> CornerRadius {
    let clamp = |r: f64| r.round().clamp(0.0, u8::MAX as f64) as u8;
    CornerRadius {
        nw: clamp(rounding.nw),
        ne: clamp(rounding.ne),
        sw: clamp(rounding.sw),
        se: clamp(rounding.se),
    }
}
