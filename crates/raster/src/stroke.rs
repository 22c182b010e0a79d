//! Anti-aliased strokes
//!
//! Lines and bracket paths are handed to tiny-skia as one path each, so
//! joints inside a path are covered once.

use formula::{Color, PathCommand, Point};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Solid anti-aliased paint in `color`
pub fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn stroke_style(thickness: f32) -> Stroke {
    Stroke {
        width: thickness,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

/// Convert path commands into a tiny-skia path
///
/// Returns `None` for paths with no segment to stroke.
pub fn build_path(commands: &[PathCommand]) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for command in commands {
        match *command {
            PathCommand::MoveTo(x, y) => builder.move_to(x, y),
            PathCommand::LineTo(x, y) => builder.line_to(x, y),
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => builder.cubic_to(x1, y1, x2, y2, x, y),
        }
    }
    builder.finish()
}

/// Stroke a path onto `pixmap`
pub fn stroke_path(pixmap: &mut Pixmap, commands: &[PathCommand], thickness: f32, color: Color) {
    let Some(path) = build_path(commands) else {
        return;
    };
    pixmap.stroke_path(
        &path,
        &paint_for(color),
        &stroke_style(thickness),
        Transform::identity(),
        None,
    );
}

/// Stroke a straight line onto `pixmap`
pub fn stroke_line(pixmap: &mut Pixmap, start: Point, end: Point, thickness: f32, color: Color) {
    stroke_path(
        pixmap,
        &[
            PathCommand::MoveTo(start.x, start.y),
            PathCommand::LineTo(end.x, end.y),
        ],
        thickness,
        color,
    );
}
