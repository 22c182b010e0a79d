//! Formula Rendering - Record drawing calls as render primitives
//!
//! Boxes draw through the [`Canvas`] trait with an explicit [`Transform`];
//! [`DrawList`] is the canvas the render driver uses, recording everything in
//! image coordinates so a backend can replay it onto a pixel surface.

use crate::layout::{Point, Rect};
use serde::{Deserialize, Serialize};

// =============================================================================
// Render Primitives
// =============================================================================

/// A color in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Path drawing commands (similar to SVG)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    CubicTo(f32, f32, f32, f32, f32, f32), // two control points, end point
}

/// An open stroked path built from relative segments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
    current: Point,
}

impl Path {
    /// Start a new path at `(x, y)`
    pub fn starting_at(x: f32, y: f32) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(x, y)],
            current: Point::new(x, y),
        }
    }

    /// Cubic curve with control and end points relative to the current point
    pub fn rel_cubic_to(mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx: f32, dy: f32) -> Self {
        let Point { x, y } = self.current;
        self.commands
            .push(PathCommand::CubicTo(x + dx1, y + dy1, x + dx2, y + dy2, x + dx, y + dy));
        self.current = Point::new(x + dx, y + dy);
        self
    }

    /// Straight segment relative to the current point
    pub fn rel_line_to(mut self, dx: f32, dy: f32) -> Self {
        let end = self.current.offset(dx, dy);
        self.commands.push(PathCommand::LineTo(end.x, end.y));
        self.current = end;
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn current_point(&self) -> Point {
        self.current
    }

    /// The same path with every point mapped through `transform`
    pub fn transformed(&self, transform: Transform) -> Vec<PathCommand> {
        let map = |x: f32, y: f32| transform.apply(Point::new(x, y));
        self.commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(x, y) => {
                    let p = map(x, y);
                    PathCommand::MoveTo(p.x, p.y)
                }
                PathCommand::LineTo(x, y) => {
                    let p = map(x, y);
                    PathCommand::LineTo(p.x, p.y)
                }
                PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                    let c1 = map(x1, y1);
                    let c2 = map(x2, y2);
                    let p = map(x, y);
                    PathCommand::CubicTo(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
            })
            .collect()
    }
}

/// Uniform scale followed by a translation.
///
/// Maps a box's own coordinates into image coordinates. Boxes derive their
/// children's transform from their own and never mutate a shared one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }

    /// Shift the local origin by `(dx, dy)` local units
    pub fn then_translate(self, dx: f32, dy: f32) -> Self {
        Self {
            translate_x: self.translate_x + dx * self.scale,
            translate_y: self.translate_y + dy * self.scale,
            ..self
        }
    }

    /// Scale local units by `factor` around the local origin
    pub fn then_scale(self, factor: f32) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.translate_x + point.x * self.scale,
            self.translate_y + point.y * self.scale,
        )
    }

    pub fn apply_rect(&self, rect: Rect) -> Rect {
        let origin = self.apply(rect.origin);
        Rect::new(
            origin.x,
            origin.y,
            rect.width() * self.scale,
            rect.height() * self.scale,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale == 1.0
    }
}

/// A render primitive in image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPrimitive {
    /// Text centred horizontally and top-aligned in `bounds`
    Text {
        text: String,
        bounds: Rect,
        /// Multiplier applied to the formula font size
        scale: f32,
        color: Color,
    },
    /// Straight stroke (fraction dividers)
    Line {
        start: Point,
        end: Point,
        thickness: f32,
        color: Color,
    },
    /// Open stroked path (bracket glyphs)
    Path {
        commands: Vec<PathCommand>,
        thickness: f32,
        color: Color,
    },
}

// =============================================================================
// Render Output
// =============================================================================

/// The complete render output for a formula
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    /// All render primitives, in drawing order
    pub primitives: Vec<RenderPrimitive>,
    /// Extent of the root box
    pub bounds: Rect,
    /// Baseline of the root box
    pub baseline: f32,
}

impl RenderOutput {
    pub fn new(primitives: Vec<RenderPrimitive>, bounds: Rect, baseline: f32) -> Self {
        Self {
            primitives,
            bounds,
            baseline,
        }
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// Drawing capability boxes paint through
pub trait Canvas {
    /// Text centred horizontally and top-aligned in local `bounds`
    fn draw_text(&mut self, text: &str, bounds: Rect, transform: Transform);

    fn draw_line(&mut self, from: Point, to: Point, transform: Transform);

    fn draw_path(&mut self, path: &Path, transform: Transform);
}

/// Canvas that records primitives in image coordinates
#[derive(Debug, Clone)]
pub struct DrawList {
    stroke_width: f32,
    color: Color,
    primitives: Vec<RenderPrimitive>,
}

impl DrawList {
    pub fn new(stroke_width: f32, color: Color) -> Self {
        Self {
            stroke_width,
            color,
            primitives: Vec::new(),
        }
    }

    pub fn primitives(&self) -> &[RenderPrimitive] {
        &self.primitives
    }

    pub fn finish(self, bounds: Rect, baseline: f32) -> RenderOutput {
        RenderOutput::new(self.primitives, bounds, baseline)
    }
}

impl Canvas for DrawList {
    fn draw_text(&mut self, text: &str, bounds: Rect, transform: Transform) {
        self.primitives.push(RenderPrimitive::Text {
            text: text.to_string(),
            bounds: transform.apply_rect(bounds),
            scale: transform.scale,
            color: self.color,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, transform: Transform) {
        self.primitives.push(RenderPrimitive::Line {
            start: transform.apply(from),
            end: transform.apply(to),
            thickness: self.stroke_width * transform.scale,
            color: self.color,
        });
    }

    fn draw_path(&mut self, path: &Path, transform: Transform) {
        self.primitives.push(RenderPrimitive::Path {
            commands: path.transformed(transform),
            thickness: self.stroke_width * transform.scale,
            color: self.color,
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
