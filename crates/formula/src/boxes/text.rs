use crate::layout::{BoxKind, Frame, MathBox, MeasureContext, Rect};
use crate::render::{Canvas, Transform};

/// A run of text in the formula font, centred on its own baseline
#[derive(Debug)]
pub struct TextBox {
    text: String,
    frame: Frame,
}

impl TextBox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            frame: Frame::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MathBox for TextBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Text
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        let size = ctx.measure_text(&self.text);
        self.frame.width = size.width;
        self.frame.height = size.height;
        self.frame.baseline = size.height / 2.0;
    }

    fn layout(&mut self) {}

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        let bounds = Rect::new(0.0, 0.0, self.frame.width, self.frame.height);
        canvas.draw_text(&self.text, bounds, transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawList, RenderPrimitive};
    use crate::testing::{measured, FixedMetrics};
    use crate::Color;

    #[test]
    fn test_size_comes_from_metrics() {
        let text = measured(TextBox::new("abc"));
        assert_eq!(text.frame().width, 42.0);
        assert_eq!(text.frame().height, 60.0);
        assert_eq!(text.frame().baseline, 30.0);
    }

    #[test]
    fn test_measure_is_idempotent() {
        let mut text = TextBox::new("x");
        let metrics = FixedMetrics;
        let mut ctx = MeasureContext::new(&metrics);
        text.measure(&mut ctx);
        let first = *text.frame();
        text.measure(&mut ctx);
        assert_eq!(first, *text.frame());
    }

    #[test]
    fn test_draws_into_own_extent() {
        let mut text = measured(TextBox::new("x"));
        text.frame_mut().x = 7.0;
        let mut list = DrawList::new(3.0, Color::BLACK);
        text.draw(&mut list, Transform::identity());
        assert_eq!(
            list.primitives(),
            &[RenderPrimitive::Text {
                text: "x".to_string(),
                bounds: Rect::new(7.0, 0.0, 22.0, 60.0),
                scale: 1.0,
                color: Color::BLACK,
            }]
        );
    }
}
