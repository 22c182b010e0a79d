use crate::layout::{BoxKind, Frame, MathBox, MeasureContext};
use crate::render::{Canvas, Path, Transform};
use serde::{Deserialize, Serialize};

/// Which bracket glyph a [`BracketBox`] draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketKind {
    OpenRound,
    CloseRound,
    OpenCurly,
}

impl BracketKind {
    /// Fixed glyph width
    pub fn width(self) -> f32 {
        match self {
            BracketKind::OpenRound | BracketKind::CloseRound => 22.0,
            BracketKind::OpenCurly => 38.0,
        }
    }

    /// Outline of the glyph stretched to `height`
    pub fn glyph(self, height: f32) -> Path {
        match self {
            BracketKind::OpenRound => Path::starting_at(18.0, 16.0)
                .rel_cubic_to(-5.654, 5.654, -7.0, 12.0, -7.0, 24.0)
                .rel_line_to(0.0, height - 76.0)
                .rel_cubic_to(0.0, 12.0, 1.346, 18.346, 7.0, 24.0),
            BracketKind::CloseRound => Path::starting_at(4.0, 16.0)
                .rel_cubic_to(5.654, 5.654, 7.0, 12.0, 7.0, 24.0)
                .rel_line_to(0.0, height - 76.0)
                .rel_cubic_to(0.0, 12.0, -1.346, 18.346, -7.0, 24.0),
            BracketKind::OpenCurly => {
                // Straight runs above and below the central cusp
                let run = height / 2.0 - 36.0;
                Path::starting_at(31.0, 15.0)
                    .rel_cubic_to(-7.9975, 0.11854, -11.0, 2.505, -11.0, 10.5)
                    .rel_line_to(0.0, run)
                    .rel_cubic_to(0.0, 8.0013, -2.9972, 12.0, -11.0, 12.0)
                    .rel_cubic_to(8.0028, 0.0, 11.0, 3.9987, 11.0, 12.0)
                    .rel_line_to(0.0, run)
                    .rel_cubic_to(0.0, 7.995, 3.0025, 10.381, 11.0, 10.5)
            }
        }
    }
}

/// A bracket whose height is assigned by its container
#[derive(Debug)]
pub struct BracketBox {
    kind: BracketKind,
    frame: Frame,
}

impl BracketBox {
    pub fn new(kind: BracketKind) -> Self {
        Self {
            kind,
            frame: Frame::default(),
        }
    }

    pub fn open_round() -> Self {
        Self::new(BracketKind::OpenRound)
    }

    pub fn close_round() -> Self {
        Self::new(BracketKind::CloseRound)
    }

    pub fn open_curly() -> Self {
        Self::new(BracketKind::OpenCurly)
    }

    pub fn bracket_kind(&self) -> BracketKind {
        self.kind
    }
}

impl MathBox for BracketBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Bracket
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, _ctx: &mut MeasureContext<'_>) {
        self.frame.width = self.kind.width();
        self.frame.baseline = self.frame.height / 2.0;
    }

    fn layout(&mut self) {}

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        canvas.draw_path(&self.kind.glyph(self.frame.height), transform);
    }

    fn height_is_intrinsic(&self) -> bool {
        false
    }

    fn baseline_ratio(&self) -> f32 {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use crate::render::PathCommand;
    use crate::testing::FixedMetrics;

    #[test]
    fn test_width_is_fixed_per_kind() {
        let metrics = FixedMetrics;
        let mut ctx = MeasureContext::new(&metrics);
        let mut round = BracketBox::open_round();
        let mut curly = BracketBox::open_curly();
        round.measure(&mut ctx);
        curly.measure(&mut ctx);
        assert_eq!(round.frame().width, 22.0);
        assert_eq!(curly.frame().width, 38.0);
    }

    #[test]
    fn test_keeps_assigned_height() {
        let metrics = FixedMetrics;
        let mut ctx = MeasureContext::new(&metrics);
        let mut bracket = BracketBox::close_round();
        bracket.frame_mut().height = 100.0;
        bracket.measure(&mut ctx);
        assert_eq!(bracket.frame().height, 100.0);
        assert_eq!(bracket.frame().baseline, 50.0);
        assert!(!bracket.height_is_intrinsic());
        assert_eq!(bracket.baseline_ratio(), 0.5);
    }

    #[test]
    fn test_round_glyph_spans_height_minus_margins() {
        let path = BracketKind::OpenRound.glyph(100.0);
        // 16 top margin, then 24 + (h - 76) + 24
        assert_eq!(path.current_point(), Point::new(18.0, 88.0));
        let path = BracketKind::CloseRound.glyph(100.0);
        assert_eq!(path.current_point(), Point::new(4.0, 88.0));
    }

    #[test]
    fn test_curly_cusp_is_midway() {
        let height = 120.0;
        let path = BracketKind::OpenCurly.glyph(height);
        let end = path.current_point();
        assert_eq!(end.x, 31.0);
        // Starts 15 below the top and ends 12 above the bottom
        assert!((end.y - (height - 12.0)).abs() < 1e-3);

        let cusp = match path.commands()[3] {
            PathCommand::CubicTo(_, _, _, _, x, y) => Point::new(x, y),
            ref other => panic!("expected the cusp curve, got {:?}", other),
        };
        assert_eq!(cusp.x, 9.0);
        assert!((cusp.y - (15.0 + height - 12.0) / 2.0).abs() < 1e-3);
    }
}
