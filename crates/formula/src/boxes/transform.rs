//! Transform boxes - wrap one child and shift or scale it

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext};
use crate::render::{Canvas, Transform};
use serde::{Deserialize, Serialize};

/// Scale applied by a [`SmallBox`] that is not nested in another one
pub const SMALL_SCALE: f32 = 0.6;

// =============================================================================
// Translate
// =============================================================================

/// Moves its child's baseline by `shift` units, growing to keep it inside.
///
/// A negative shift raises the child (exponents), a positive one lowers it
/// (indices).
#[derive(Debug)]
pub struct TranslateBox {
    child: Box<dyn MathBox>,
    shift: f32,
    child_offset: f32,
    frame: Frame,
}

impl TranslateBox {
    pub fn new(child: Box<dyn MathBox>, shift: f32) -> Self {
        Self {
            child,
            shift,
            child_offset: 0.0,
            frame: Frame::default(),
        }
    }

    pub fn shift(&self) -> f32 {
        self.shift
    }
}

impl MathBox for TranslateBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Translate
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        self.child.measure(ctx);
        let child = *self.child.frame();
        let target = child.baseline - self.shift;

        self.frame.width = child.width;
        if target < 0.0 {
            self.frame.height = child.height - target;
            self.frame.baseline = 0.0;
            self.child_offset = -target;
        } else if target > child.height {
            self.frame.height = target;
            self.frame.baseline = target;
            self.child_offset = 0.0;
        } else {
            self.frame.height = child.height;
            self.frame.baseline = target;
            self.child_offset = 0.0;
        }
    }

    fn layout(&mut self) {
        let frame = self.child.frame_mut();
        frame.x = 0.0;
        frame.y = self.child_offset;
        self.child.layout();
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.child.draw(canvas, transform);
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![self.child.as_ref()]
    }
}

// =============================================================================
// Scale
// =============================================================================

/// Draws its child uniformly scaled by a fixed factor
#[derive(Debug)]
pub struct ScaleBox {
    child: Box<dyn MathBox>,
    factor: f32,
    frame: Frame,
}

impl ScaleBox {
    pub fn new(child: Box<dyn MathBox>, factor: f32) -> Self {
        Self {
            child,
            factor,
            frame: Frame::default(),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub(crate) fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
    }
}

impl MathBox for ScaleBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Scale
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        self.child.measure(ctx);
        let child = self.child.frame();
        self.frame.width = child.width * self.factor;
        self.frame.height = child.height * self.factor;
        self.frame.baseline = child.baseline * self.factor;
    }

    fn layout(&mut self) {
        let frame = self.child.frame_mut();
        frame.x = 0.0;
        frame.y = 0.0;
        self.child.layout();
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.child.draw(canvas, transform.then_scale(self.factor));
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![self.child.as_ref()]
    }
}

// =============================================================================
// Autoscale
// =============================================================================

/// Scales its child to whatever height the container assigns
#[derive(Debug)]
pub struct AutoscaleBox {
    child: Box<dyn MathBox>,
    factor: f32,
    frame: Frame,
}

impl AutoscaleBox {
    pub fn new(child: Box<dyn MathBox>) -> Self {
        Self {
            child,
            factor: 1.0,
            frame: Frame::default(),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl MathBox for AutoscaleBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Autoscale
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        self.child.measure(ctx);
        let child = *self.child.frame();
        self.factor = if child.height == 0.0 {
            1.0
        } else {
            self.frame.height / child.height
        };
        self.frame.width = child.width * self.factor;
        self.frame.baseline = child.baseline * self.factor;
    }

    fn layout(&mut self) {
        let frame = self.child.frame_mut();
        frame.x = 0.0;
        frame.y = 0.0;
        self.child.layout();
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.child.draw(canvas, transform.then_scale(self.factor));
    }

    fn height_is_intrinsic(&self) -> bool {
        false
    }

    fn baseline_ratio(&self) -> f32 {
        self.child.frame().baseline_ratio()
    }

    fn prepare_stretch(&mut self, ctx: &mut MeasureContext<'_>) {
        self.child.measure(ctx);
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![self.child.as_ref()]
    }
}

// =============================================================================
// Small
// =============================================================================

/// Where a [`SmallBox`] puts its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmallRole {
    /// Baseline at the bottom edge
    Exponent,
    /// Baseline at the top edge
    Subscript,
    Plain,
}

/// Shrinks its child for script positions.
///
/// Only the outermost small box shrinks; a small box measured inside another
/// one keeps its child's size so nested scripts do not vanish.
#[derive(Debug)]
pub struct SmallBox {
    inner: ScaleBox,
    role: SmallRole,
    frame: Frame,
}

impl SmallBox {
    pub fn new(child: Box<dyn MathBox>, role: SmallRole) -> Self {
        Self {
            inner: ScaleBox::new(child, SMALL_SCALE),
            role,
            frame: Frame::default(),
        }
    }

    pub fn role(&self) -> SmallRole {
        self.role
    }

    pub fn factor(&self) -> f32 {
        self.inner.factor()
    }
}

impl MathBox for SmallBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Small
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        let nested = ctx.enter_small();
        self.inner
            .set_factor(if nested { 1.0 } else { SMALL_SCALE });
        self.inner.measure(ctx);
        ctx.leave_small(nested);

        let inner = self.inner.frame();
        self.frame.width = inner.width;
        self.frame.height = inner.height;
        self.frame.baseline = match self.role {
            SmallRole::Exponent => inner.height,
            SmallRole::Subscript | SmallRole::Plain => 0.0,
        };
    }

    fn layout(&mut self) {
        let frame = self.inner.frame_mut();
        frame.x = 0.0;
        frame.y = 0.0;
        self.inner.layout();
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.inner.draw(canvas, transform);
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![&self.inner as &dyn MathBox]
    }
}
