//! Box Layout - the contract every layout box implements
//!
//! Layout happens in three phases, each a full traversal of the box tree:
//! `measure` fixes every box's size and baseline, `layout` positions every
//! child relative to its parent, and `draw` emits drawing calls through a
//! [`Canvas`]. [`LayoutTree`] enforces that order at the type level.

use crate::render::{Canvas, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// Geometry Types
// =============================================================================

/// A position in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A size with width and height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }
}

/// Position, extent and baseline of one box.
///
/// `x`/`y` are relative to the parent and valid after layout; `width`,
/// `height` and `baseline` are valid after measure. `baseline` is the offset
/// from the top edge that lines up with siblings in a row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub baseline: f32,
}

impl Frame {
    /// Baseline as a fraction of the height, 0 for an empty box
    pub fn baseline_ratio(&self) -> f32 {
        if self.height == 0.0 {
            0.0
        } else {
            self.baseline / self.height
        }
    }

    /// Height below the baseline
    pub fn descent(&self) -> f32 {
        self.height - self.baseline
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The box's own rectangle in its parent's coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// =============================================================================
// Measurement
// =============================================================================

/// Text measurement capability of a rendering backend
pub trait TextMetrics {
    /// Extent of `text` set in the formula font at scale 1
    fn measure_text(&self, text: &str) -> Size;
}

/// State threaded through one measure pass
pub struct MeasureContext<'a> {
    metrics: &'a dyn TextMetrics,
    /// Set while a [`SmallBox`](crate::boxes::SmallBox) measures its child
    in_small: bool,
}

impl<'a> MeasureContext<'a> {
    pub fn new(metrics: &'a dyn TextMetrics) -> Self {
        Self {
            metrics,
            in_small: false,
        }
    }

    pub fn measure_text(&self, text: &str) -> Size {
        self.metrics.measure_text(text)
    }

    pub(crate) fn in_small(&self) -> bool {
        self.in_small
    }

    /// Mark the pass as inside a small box, returning the previous state
    pub(crate) fn enter_small(&mut self) -> bool {
        std::mem::replace(&mut self.in_small, true)
    }

    pub(crate) fn leave_small(&mut self, previous: bool) {
        self.in_small = previous;
    }
}

// =============================================================================
// Box Contract
// =============================================================================

/// What a box is, for introspection and tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxKind {
    Text,
    Bracket,
    Translate,
    Scale,
    Autoscale,
    Small,
    Horizontal,
    Fraction,
    TripleVertical,
    Grid,
}

/// A node of the layout tree.
///
/// Implementors compute their own extent in [`measure`](MathBox::measure),
/// position their children in [`layout`](MathBox::layout), and paint in
/// their own coordinate system in [`draw_content`](MathBox::draw_content).
pub trait MathBox: fmt::Debug {
    fn kind(&self) -> BoxKind;

    fn frame(&self) -> &Frame;

    fn frame_mut(&mut self) -> &mut Frame;

    /// Compute width, height and baseline. Must be idempotent.
    fn measure(&mut self, ctx: &mut MeasureContext<'_>);

    /// Position children relative to this box's origin.
    fn layout(&mut self);

    /// Paint this box with `transform` mapping its own coordinates.
    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform);

    /// Paint this box, with `transform` mapping the parent's coordinates.
    fn draw(&self, canvas: &mut dyn Canvas, transform: Transform) {
        let frame = self.frame();
        self.draw_content(canvas, transform.then_translate(frame.x, frame.y));
    }

    /// False when the container decides this box's height
    fn height_is_intrinsic(&self) -> bool {
        true
    }

    fn baseline_ratio(&self) -> f32 {
        self.frame().baseline_ratio()
    }

    /// Measure whatever a stretchable box needs before its container
    /// assigns its height. Intrinsic boxes never see this call.
    fn prepare_stretch(&mut self, _ctx: &mut MeasureContext<'_>) {}

    fn children(&self) -> Vec<&dyn MathBox> {
        Vec::new()
    }
}

// =============================================================================
// Layout Tree
// =============================================================================

/// Phase marker: freshly built, sizes unknown
#[derive(Debug)]
pub struct Unmeasured;

/// Phase marker: sizes and baselines fixed
#[derive(Debug)]
pub struct Measured;

/// Phase marker: positions fixed, ready to draw
#[derive(Debug)]
pub struct LaidOut;

/// A box tree tagged with the phase it has reached
#[derive(Debug)]
pub struct LayoutTree<Phase> {
    root: Box<dyn MathBox>,
    _phase: PhantomData<Phase>,
}

impl<Phase> LayoutTree<Phase> {
    pub fn root(&self) -> &dyn MathBox {
        self.root.as_ref()
    }

    pub fn frame(&self) -> &Frame {
        self.root.frame()
    }

    fn advance<Next>(self) -> LayoutTree<Next> {
        LayoutTree {
            root: self.root,
            _phase: PhantomData,
        }
    }
}

impl LayoutTree<Unmeasured> {
    pub fn new(root: Box<dyn MathBox>) -> Self {
        Self {
            root,
            _phase: PhantomData,
        }
    }

    pub fn measure(mut self, metrics: &dyn TextMetrics) -> LayoutTree<Measured> {
        let mut ctx = MeasureContext::new(metrics);
        self.root.measure(&mut ctx);
        let frame = self.root.frame();
        tracing::debug!(
            width = frame.width,
            height = frame.height,
            baseline = frame.baseline,
            "measured formula"
        );
        self.advance()
    }
}

impl LayoutTree<Measured> {
    pub fn layout(mut self) -> LayoutTree<LaidOut> {
        let frame = self.root.frame_mut();
        frame.x = 0.0;
        frame.y = 0.0;
        self.root.layout();
        self.advance()
    }
}

impl LayoutTree<LaidOut> {
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.root.draw(canvas, Transform::identity());
    }

    /// Pixel extent of the image holding the whole formula
    pub fn pixel_size(&self) -> (u32, u32) {
        crate::driver::pixel_extent(&self.root.frame().bounds())
    }
}
