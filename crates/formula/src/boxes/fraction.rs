//! Fraction box - numerator over denominator with a divider

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext, Point};
use crate::render::{Canvas, Transform};

/// Extra width around the wider of numerator and denominator
pub const FRACTION_PADDING: f32 = 6.0;

/// Gap between each end of the divider and the box edge
pub const DIVIDER_INSET: f32 = 4.0;

#[derive(Debug)]
pub struct FractionBox {
    numerator: Box<dyn MathBox>,
    denominator: Box<dyn MathBox>,
    frame: Frame,
}

impl FractionBox {
    pub fn new(numerator: Box<dyn MathBox>, denominator: Box<dyn MathBox>) -> Self {
        Self {
            numerator,
            denominator,
            frame: Frame::default(),
        }
    }

    /// Divider endpoints in local coordinates
    pub fn divider(&self) -> (Point, Point) {
        let y = self.frame.baseline;
        (
            Point::new(DIVIDER_INSET, y),
            Point::new(self.frame.width - DIVIDER_INSET, y),
        )
    }
}

impl MathBox for FractionBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Fraction
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        self.numerator.measure(ctx);
        self.denominator.measure(ctx);
        let num = self.numerator.frame();
        let den = self.denominator.frame();

        self.frame.width = num.width.max(den.width) + FRACTION_PADDING;
        self.frame.height = num.height + den.height;
        self.frame.baseline = num.height;
    }

    fn layout(&mut self) {
        let width = self.frame.width;
        let num_height = self.numerator.frame().height;

        let num = self.numerator.frame_mut();
        num.x = (width - num.width) / 2.0;
        num.y = 0.0;
        let den = self.denominator.frame_mut();
        den.x = (width - den.width) / 2.0;
        den.y = num_height;

        self.numerator.layout();
        self.denominator.layout();
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.numerator.draw(canvas, transform);
        let (from, to) = self.divider();
        canvas.draw_line(from, to, transform);
        self.denominator.draw(canvas, transform);
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![self.numerator.as_ref(), self.denominator.as_ref()]
    }
}
