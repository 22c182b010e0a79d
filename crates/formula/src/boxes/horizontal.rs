//! Horizontal box - a row of children sharing one baseline

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext};
use crate::render::{Canvas, Transform};

/// Lays its children out left to right with their baselines aligned.
///
/// Children whose height is intrinsic decide the row's height. Stretchable
/// children (brackets, autoscaled boxes) are then sized from that height.
#[derive(Debug, Default)]
pub struct HorizontalBox {
    children: Vec<Box<dyn MathBox>>,
    frame: Frame,
}

impl HorizontalBox {
    pub fn new(children: Vec<Box<dyn MathBox>>) -> Self {
        Self {
            children,
            frame: Frame::default(),
        }
    }

    /// A row with no children and zero size
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Box<dyn MathBox>) {
        self.children.push(child);
    }
}

impl MathBox for HorizontalBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Horizontal
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        let mut width = 0.0f32;
        let mut above = 0.0f32;
        let mut below = 0.0f32;

        for child in self.children.iter_mut().filter(|c| c.height_is_intrinsic()) {
            child.measure(ctx);
            let frame = child.frame();
            width += frame.width;
            above = above.max(frame.baseline);
            below = below.max(frame.descent());
        }
        let height = above + below;

        for child in self.children.iter_mut().filter(|c| !c.height_is_intrinsic()) {
            child.prepare_stretch(ctx);
            let ratio = child.baseline_ratio();
            child.frame_mut().height = 2.0 * ratio.min(1.0 - ratio) * height;
            child.measure(ctx);
            width += child.frame().width;
        }

        self.frame.width = width;
        self.frame.height = height;
        self.frame.baseline = above;
        tracing::trace!(children = self.children.len(), width, height, "measured row");
    }

    fn layout(&mut self) {
        let baseline = self.frame.baseline;
        let mut x = 0.0;
        for child in &mut self.children {
            let frame = child.frame_mut();
            frame.x = x;
            frame.y = baseline - frame.baseline;
            x += frame.width;
            child.layout();
        }
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        for child in &self.children {
            child.draw(canvas, transform);
        }
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        self.children.iter().map(|c| c.as_ref()).collect()
    }
}
