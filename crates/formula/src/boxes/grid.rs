//! Grid box - rows of cells aligned into columns

use crate::layout::{BoxKind, Frame, MathBox, MeasureContext};
use crate::render::{Canvas, Transform};

/// Space added above the tallest baseline of a row
pub const GRID_CELL_PADDING: f32 = 12.0;

/// Extra height of a row and extra width of a column
const GRID_TRACK_PADDING: f32 = 2.0 * GRID_CELL_PADDING;

/// Cells arranged in rows; rows may have different lengths.
///
/// Each column is as wide as its widest cell over the rows that reach it.
/// Each row aligns the baselines of its cells.
#[derive(Debug, Default)]
pub struct GridBox {
    rows: Vec<Vec<Box<dyn MathBox>>>,
    row_baselines: Vec<f32>,
    row_heights: Vec<f32>,
    column_widths: Vec<f32>,
    frame: Frame,
}

impl GridBox {
    pub fn new(rows: Vec<Vec<Box<dyn MathBox>>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    pub fn row_baselines(&self) -> &[f32] {
        &self.row_baselines
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }
}

impl MathBox for GridBox {
    fn kind(&self) -> BoxKind {
        BoxKind::Grid
    }

    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    fn measure(&mut self, ctx: &mut MeasureContext<'_>) {
        self.row_baselines.clear();
        self.row_heights.clear();
        self.column_widths.clear();

        for row in &mut self.rows {
            let mut above = 0.0f32;
            let mut below = 0.0f32;
            for (column, cell) in row.iter_mut().enumerate() {
                cell.measure(ctx);
                let frame = cell.frame();
                above = above.max(frame.baseline);
                below = below.max(frame.descent());

                let width = frame.width + GRID_TRACK_PADDING;
                match self.column_widths.get_mut(column) {
                    Some(current) => *current = current.max(width),
                    None => self.column_widths.push(width),
                }
            }
            self.row_baselines.push(above + GRID_CELL_PADDING);
            self.row_heights.push(above + below + GRID_TRACK_PADDING);
        }

        self.frame.width = self.column_widths.iter().sum();
        self.frame.height = self.row_heights.iter().sum();
        self.frame.baseline = self.frame.height / 2.0;
        tracing::trace!(
            rows = self.rows.len(),
            columns = self.column_widths.len(),
            "measured grid"
        );
    }

    fn layout(&mut self) {
        let mut top = 0.0;
        for (i, row) in self.rows.iter_mut().enumerate() {
            let row_baseline = self.row_baselines[i];
            let mut left = 0.0;
            for (column, cell) in row.iter_mut().enumerate() {
                let column_width = self.column_widths[column];
                let frame = cell.frame_mut();
                frame.x = left + (column_width - frame.width) / 2.0;
                frame.y = top + row_baseline - frame.baseline;
                left += column_width;
                cell.layout();
            }
            top += self.row_heights[i];
        }
    }

    fn draw_content(&self, canvas: &mut dyn Canvas, transform: Transform) {
        for cell in self.rows.iter().flatten() {
            cell.draw(canvas, transform);
        }
    }

    fn children(&self) -> Vec<&dyn MathBox> {
        self.rows.iter().flatten().map(|c| c.as_ref()).collect()
    }
}
