//! Render Driver - formula text in, image file out
//!
//! Runs the pipeline in order: parse, validate and build, measure, layout,
//! draw into a [`DrawList`], then hand the result to the backend.

use crate::backend::{OutputFormat, RenderBackend};
use crate::builder::BoxBuilder;
use crate::error::FormulaResult;
use crate::layout::{LayoutTree, Rect};
use crate::model::Expression;
use crate::parser::parse_formula;
use crate::render::{Color, DrawList, RenderOutput};
use crate::settings::DrawerSettings;
use std::path::Path;

/// Summary of one successful render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub primitives: usize,
}

/// Drives a formula through layout and onto a backend
pub struct RenderDriver<'a, B: RenderBackend> {
    backend: &'a B,
    builder: BoxBuilder,
    stroke_width: f32,
    foreground: Color,
}

impl<'a, B: RenderBackend> RenderDriver<'a, B> {
    pub fn new(backend: &'a B, settings: &DrawerSettings) -> Self {
        Self {
            backend,
            builder: BoxBuilder::from_settings(&settings.layout),
            stroke_width: settings.stroke.width,
            foreground: settings.colors.foreground,
        }
    }

    pub fn backend(&self) -> &B {
        self.backend
    }

    /// Lay out `expr` and record its drawing calls
    pub fn render(&self, expr: &Expression) -> FormulaResult<RenderOutput> {
        let root = self.builder.build(expr)?;
        tracing::debug!(kind = ?root.kind(), "built box tree");

        let tree = LayoutTree::new(root).measure(self.backend).layout();
        let mut list = DrawList::new(self.stroke_width, self.foreground);
        tree.draw(&mut list);

        let frame = tree.frame();
        let bounds = Rect::new(0.0, 0.0, frame.width, frame.height);
        tracing::debug!(primitives = list.primitives().len(), "drew formula");
        Ok(list.finish(bounds, frame.baseline))
    }

    /// Render an already parsed expression to `path`
    pub fn draw_expression(&self, expr: &Expression, path: &Path) -> FormulaResult<RenderReport> {
        let output = self.render(expr)?;
        let (width, height) = pixel_extent(&output.bounds);

        let mut surface = self.backend.create_canvas(width, height)?;
        self.backend.paint(&mut surface, &output)?;

        let format = OutputFormat::from_path(path);
        self.backend.export_image(&surface, path, format)?;
        tracing::info!(path = %path.display(), width, height, ?format, "exported formula");

        Ok(RenderReport {
            width,
            height,
            format,
            primitives: output.primitives.len(),
        })
    }

    /// Parse `input` and render it to `path`
    pub fn draw_formula(&self, input: &str, path: &Path) -> FormulaResult<RenderReport> {
        let expr = parse_formula(input)?;
        tracing::debug!(input, "parsed formula");
        self.draw_expression(&expr, path)
    }
}

/// Root extent rounded up to whole pixels, at least 1x1
pub fn pixel_extent(bounds: &Rect) -> (u32, u32) {
    (
        bounds.width().ceil().max(1.0) as u32,
        bounds.height().ceil().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use crate::layout::{Size, TextMetrics};
    use crate::testing::FixedMetrics;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Backend that records what it was asked to do
    #[derive(Default)]
    struct RecordingBackend {
        exported: RefCell<Vec<(PathBuf, OutputFormat, u32, u32)>>,
    }

    impl TextMetrics for RecordingBackend {
        fn measure_text(&self, text: &str) -> Size {
            FixedMetrics.measure_text(text)
        }
    }

    impl RenderBackend for RecordingBackend {
        type Surface = (u32, u32, usize);

        fn create_canvas(&self, width: u32, height: u32) -> FormulaResult<Self::Surface> {
            Ok((width, height, 0))
        }

        fn paint(&self, surface: &mut Self::Surface, output: &RenderOutput) -> FormulaResult<()> {
            surface.2 += output.primitives.len();
            Ok(())
        }

        fn export_image(
            &self,
            surface: &Self::Surface,
            path: &Path,
            format: OutputFormat,
        ) -> FormulaResult<()> {
            self.exported
                .borrow_mut()
                .push((path.to_path_buf(), format, surface.0, surface.1));
            Ok(())
        }
    }

    #[test]
    fn test_draw_formula_exports_root_extent() {
        let backend = RecordingBackend::default();
        let driver = RenderDriver::new(&backend, &DrawerSettings::default());

        let report = driver.draw_formula("x", Path::new("out.bmp")).unwrap();
        assert_eq!((report.width, report.height), (22, 60));
        assert_eq!(report.format, OutputFormat::Bmp);
        assert_eq!(report.primitives, 1);
        assert_eq!(
            backend.exported.borrow().as_slice(),
            &[(PathBuf::from("out.bmp"), OutputFormat::Bmp, 22, 60)]
        );
    }

    #[test]
    fn test_parse_error_exports_nothing() {
        let backend = RecordingBackend::default();
        let driver = RenderDriver::new(&backend, &DrawerSettings::default());

        let err = driver.draw_formula("x +", Path::new("out.png")).unwrap_err();
        assert!(matches!(err, FormulaError::Parse(_)));
        assert!(backend.exported.borrow().is_empty());
    }

    #[test]
    fn test_ragged_block_exports_nothing() {
        let backend = RecordingBackend::default();
        let driver = RenderDriver::new(&backend, &DrawerSettings::default());

        let err = driver
            .draw_formula(r"\matrix{1, 2; 3, 4; 5, 6, 7}", Path::new("out.png"))
            .unwrap_err();
        assert!(matches!(err, FormulaError::Structural(_)));
        assert!(backend.exported.borrow().is_empty());
    }

    #[test]
    fn test_overly_deep_input_exports_nothing() {
        let backend = RecordingBackend::default();
        let driver = RenderDriver::new(&backend, &DrawerSettings::default());

        let nested = format!("{}x{}", "(".repeat(5_000), ")".repeat(5_000));
        let err = driver.draw_formula(&nested, Path::new("out.png")).unwrap_err();
        assert!(matches!(err, FormulaError::Parse(_)));

        let chain = vec!["x"; 1_000].join(" + ");
        let err = driver.draw_formula(&chain, Path::new("out.png")).unwrap_err();
        assert!(matches!(err, FormulaError::Structural(_)));
        assert!(backend.exported.borrow().is_empty());
    }

    #[test]
    fn test_stroke_width_from_settings() {
        let backend = RecordingBackend::default();
        let mut settings = DrawerSettings::default();
        settings.stroke.width = 5.0;
        let driver = RenderDriver::new(&backend, &settings);

        let output = driver
            .render(&Expression::fraction(Expression::literal("1"), Expression::literal("2")))
            .unwrap();
        let thickness = output.primitives.iter().find_map(|p| match p {
            crate::render::RenderPrimitive::Line { thickness, .. } => Some(*thickness),
            _ => None,
        });
        assert_eq!(thickness, Some(5.0));
    }

    #[test]
    fn test_pixel_extent_rounds_up() {
        assert_eq!(pixel_extent(&Rect::new(0.0, 0.0, 10.2, 3.0)), (11, 3));
        assert_eq!(pixel_extent(&Rect::new(0.0, 0.0, 0.0, 0.0)), (1, 1));
    }
}
