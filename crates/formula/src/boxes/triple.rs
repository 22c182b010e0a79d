//! Triple vertical box - three children stacked, right-aligned

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext};
use crate::render::{Canvas, Transform};

/// Stacks `top`, `center` and `bottom` with the baseline taken from `center`.
///
/// Used for big operators with their bounds above and below.
#[derive(Debug)]
pub struct TripleVerticalBox {
    top: Box<dyn MathBox>,
    center: Box<dyn MathBox>,
    bottom: Box<dyn MathBox>,
    frame: Frame,
}

impl TripleVerticalBox {
    pub fn new(top: Box<dyn MathBox>, center: Box<dyn MathBox>, bottom: Box<dyn MathBox>) -> Self {
        Self {
            top,
            center,
            bottom,
            frame: Frame::default(),
        }
    }

    fn parts_mut(&mut self) -> [&mut Box<dyn MathBox>; 3] {
        [&mut self.top, &mut self.center, &mut self.bottom]
    }
}

impl MathBox for TripleVerticalBox {
    fn kind(&self) -> BoxKind {
        BoxKind::TripleVertical
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for part in self.parts_mut() {
            part.measure(ctx);
            width = width.max(part.frame().width);
            height += part.frame().height;
        }

        self.frame.width = width;
        self.frame.height = height;
        self.frame.baseline = self.top.frame().height + self.center.frame().baseline;
    }

    fn layout(&mut self) {
        let width = self.frame.width;
        let mut y = 0.0;
        for part in self.parts_mut() {
            let frame = part.frame_mut();
            frame.x = width - frame.width;
            frame.y = y;
            y += frame.height;
            part.layout();
        }
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        self.top.draw(canvas, transform);
        self.center.draw(canvas, transform);
        self.bottom.draw(canvas, transform);
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        vec![self.top.as_ref(), self.center.as_ref(), self.bottom.as_ref()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::HorizontalBox;
    use crate::testing::{measured, FixedBox};

    fn fixed(width: f32, height: f32, baseline: f32) -> Box<dyn MathBox> {
        Box::new(FixedBox::new(width, height, baseline))
    }

    #[test]
    fn test_baseline_follows_center() {
        let b = measured(TripleVerticalBox::new(
            fixed(20.0, 30.0, 15.0),
            fixed(50.0, 60.0, 35.0),
            fixed(10.0, 30.0, 15.0),
        ));
        assert_eq!(b.frame().width, 50.0);
        assert_eq!(b.frame().height, 120.0);
        assert_eq!(b.frame().baseline, 65.0);
    }

    #[test]
    fn test_parts_right_aligned_and_stacked() {
        let mut b = measured(TripleVerticalBox::new(
            fixed(20.0, 30.0, 15.0),
            fixed(50.0, 60.0, 35.0),
            fixed(10.0, 30.0, 15.0),
        ));
        b.layout();
        let parts: Vec<_> = b.children().iter().map(|c| (c.frame().x, c.frame().y)).collect();
        assert_eq!(parts, vec![(30.0, 0.0), (0.0, 30.0), (40.0, 90.0)]);
    }

    #[test]
    fn test_missing_bounds_are_empty() {
        let b = measured(TripleVerticalBox::new(
            Box::new(HorizontalBox::empty()),
            fixed(50.0, 60.0, 30.0),
            Box::new(HorizontalBox::empty()),
        ));
        assert_eq!(b.frame().height, 60.0);
        assert_eq!(b.frame().baseline, 30.0);
    }
}
