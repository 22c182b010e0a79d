//! Test helpers shared by the box modules

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext, Size, TextMetrics};
use crate::render::{Canvas, Transform};

/// Monospace metrics: 10 units per character plus 12 of padding, 60 high
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMetrics;

impl TextMetrics for FixedMetrics {
    fn measure_text(&self, text: &str) -> Size {
        Size::new(10.0 * text.chars().count() as f32 + 12.0, 60.0)
    }
}

/// Measure `b` once with [`FixedMetrics`]
pub fn measured<B: MathBox>(mut b: B) -> B {
    let metrics = FixedMetrics;
    let mut ctx = MeasureContext::new(&metrics);
    b.measure(&mut ctx);
    b
}

/// Leaf with a preset extent that draws nothing
#[derive(Debug)]
pub struct FixedBox {
    size: Size,
    baseline: f32,
    frame: Frame,
}

impl FixedBox {
    pub fn new(width: f32, height: f32, baseline: f32) -> Self {
        Self {
            size: Size::new(width, height),
            baseline,
            frame: Frame::default(),
        }
    }
}

impl MathBox for FixedBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Text
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, _ctx: &mut MeasureContext<'_>) {
        self.frame.width = self.size.width;
        self.frame.height = self.size.height;
        self.frame.baseline = self.baseline;
    }

    fn layout(&mut self) {}

    fn draw_content(&self, _canvas: &mut dyn Canvas, _transform: Transform) {}
}
