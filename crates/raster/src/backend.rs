//! Raster rendering backend

use crate::error::{RasterError, Result};
use crate::glyphs::GlyphPainter;
use crate::stroke::{stroke_line, stroke_path};
use formula::settings::DrawerSettings;
use formula::{
    Color, FormulaResult, OutputFormat, Rect, RenderBackend, RenderOutput, RenderPrimitive,
    Size, TextMetrics,
};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;
use text_engine::{FontDiscovery, ShapedRun, TextShaper};
use tiny_skia::Pixmap;

/// Horizontal padding added to every measured text run
pub const TEXT_PADDING: f32 = 12.0;

/// Largest surface the backend will allocate
const MAX_PIXELS: u64 = 1 << 28;

/// Measures with rustybuzz, paints glyphs with ab_glyph and strokes with tiny-skia
#[derive(Debug)]
pub struct RasterBackend {
    shaper: TextShaper,
    glyphs: Option<GlyphPainter>,
    font_size: f32,
    background: Color,
}

impl RasterBackend {
    /// Load the configured font and build a backend around it
    pub fn from_settings(settings: &DrawerSettings) -> Result<Self> {
        let discovery = FontDiscovery::new();
        let font = match &settings.font.path {
            Some(path) => discovery.load_path(path)?,
            None => discovery.load_family(&settings.font.family)?,
        };
        tracing::debug!(family = %font.family, size = settings.font.size, "formula font");

        let glyphs = GlyphPainter::from_font(&font)?;
        let shaper = TextShaper::new(font)?;
        Ok(Self {
            shaper,
            glyphs: Some(glyphs),
            font_size: settings.font.size,
            background: settings.colors.background,
        })
    }

    /// Backend without a font: text is measured by estimate and not painted
    pub fn estimating(settings: &DrawerSettings) -> Self {
        Self {
            shaper: TextShaper::estimating(),
            glyphs: None,
            font_size: settings.font.size,
            background: settings.colors.background,
        }
    }

    fn shape(&self, text: &str, font_size: f32) -> ShapedRun {
        match self.shaper.shape(text, font_size) {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!("Failed to shape {:?}, estimating instead: {}", text, e);
                TextShaper::estimating().shape(text, font_size).unwrap_or_else(|_| ShapedRun {
                    glyphs: Vec::new(),
                    width: 0.0,
                    font_size,
                    units_per_em: 1000,
                    ascender: 0.0,
                    descender: 0.0,
                    line_gap: 0.0,
                })
            }
        }
    }

    fn paint_text(&self, surface: &mut Pixmap, text: &str, bounds: Rect, scale: f32, color: Color) {
        let Some(glyphs) = &self.glyphs else {
            return;
        };
        let run = self.shape(text, self.font_size * scale);
        let x = bounds.x() + (bounds.width() - run.width) / 2.0;
        let baseline = bounds.y() + run.ascender;
        glyphs.paint_run(surface, &run, x, baseline, color);
    }
}

impl TextMetrics for RasterBackend {
    fn measure_text(&self, text: &str) -> Size {
        let run = self.shape(text, self.font_size);
        Size::new(run.width + TEXT_PADDING, run.height())
    }
}

impl RenderBackend for RasterBackend {
    type Surface = Pixmap;

    fn create_canvas(&self, width: u32, height: u32) -> FormulaResult<Pixmap> {
        if width as u64 * height as u64 > MAX_PIXELS {
            return Err(RasterError::SurfaceTooLarge { width, height }.into());
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::SurfaceTooLarge { width, height })?;
        let Color { r, g, b, a } = self.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        Ok(pixmap)
    }

    fn paint(&self, surface: &mut Pixmap, output: &RenderOutput) -> FormulaResult<()> {
        for primitive in &output.primitives {
            match primitive {
                RenderPrimitive::Text {
                    text,
                    bounds,
                    scale,
                    color,
                } => self.paint_text(surface, text, *bounds, *scale, *color),
                RenderPrimitive::Line {
                    start,
                    end,
                    thickness,
                    color,
                } => stroke_line(surface, *start, *end, *thickness, *color),
                RenderPrimitive::Path {
                    commands,
                    thickness,
                    color,
                } => stroke_path(surface, commands, *thickness, *color),
            }
        }
        Ok(())
    }

    fn export_image(&self, surface: &Pixmap, path: &Path, format: OutputFormat) -> FormulaResult<()> {
        let format = match format {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
        };
        DynamicImage::ImageRgba8(to_image(surface))
            .into_rgb8()
            .save_with_format(path, format)
            .map_err(RasterError::from)?;
        Ok(())
    }
}

/// Straight-alpha copy of `pixmap`
fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (target, source) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = source.demultiply();
        target.0 = [color.red(), color.green(), color.blue(), color.alpha()];
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula::{Expression, Point, RenderDriver};
    use tempfile::TempDir;

    fn backend() -> RasterBackend {
        RasterBackend::estimating(&DrawerSettings::default())
    }

    fn is_dark(surface: &Pixmap, x: u32, y: u32) -> bool {
        surface.pixel(x, y).is_some_and(|p| p.demultiply().red() < 128)
    }

    #[test]
    fn test_measure_adds_padding() {
        let size = backend().measure_text("x");
        assert!((size.width - (27.5 + TEXT_PADDING)).abs() < 1e-4);
        assert_eq!(size.height, 50.0);
    }

    #[test]
    fn test_canvas_is_background() {
        let surface = to_image(&backend().create_canvas(3, 2).unwrap());
        assert_eq!(surface.dimensions(), (3, 2));
        assert!(surface.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        assert!(backend().create_canvas(1 << 16, 1 << 16).is_err());
    }

    #[test]
    fn test_paint_line() {
        let backend = backend();
        let mut surface = backend.create_canvas(40, 20).unwrap();
        let output = RenderOutput::new(
            vec![RenderPrimitive::Line {
                start: Point::new(4.0, 10.0),
                end: Point::new(36.0, 10.0),
                thickness: 3.0,
                color: Color::BLACK,
            }],
            Rect::new(0.0, 0.0, 40.0, 20.0),
            10.0,
        );
        backend.paint(&mut surface, &output).unwrap();
        assert!(is_dark(&surface, 20, 10));
        assert!(!is_dark(&surface, 20, 2));
        assert!(!is_dark(&surface, 1, 10));
    }

    #[test]
    fn test_paint_bracket_path() {
        let backend = backend();
        let mut surface = backend.create_canvas(40, 60).unwrap();
        let output = RenderOutput::new(
            vec![RenderPrimitive::Path {
                commands: vec![
                    formula::PathCommand::MoveTo(20.0, 5.0),
                    formula::PathCommand::CubicTo(10.0, 20.0, 10.0, 40.0, 20.0, 55.0),
                ],
                thickness: 3.0,
                color: Color::BLACK,
            }],
            Rect::new(0.0, 0.0, 40.0, 60.0),
            30.0,
        );
        backend.paint(&mut surface, &output).unwrap();
        assert!(is_dark(&surface, 12, 29));
        assert!(!is_dark(&surface, 35, 30));
    }

    #[test]
    fn test_fraction_divider_lands_under_numerator() {
        let backend = backend();
        let settings = DrawerSettings::default();
        let driver = RenderDriver::new(&backend, &settings);

        let expr = Expression::fraction(Expression::literal("1"), Expression::literal("2"));
        let output = driver.render(&expr).unwrap();
        let mut surface = backend
            .create_canvas(output.bounds.width().ceil() as u32, output.bounds.height().ceil() as u32)
            .unwrap();
        backend.paint(&mut surface, &output).unwrap();

        // Numerator is 50 high, so the divider sits on y = 50
        let centre = (output.bounds.width() / 2.0) as u32;
        assert!(is_dark(&surface, centre, 50));
        assert!(!is_dark(&surface, centre, 45));
    }

    #[test]
    fn test_export_formats() {
        let temp_dir = TempDir::new().unwrap();
        let backend = backend();
        let surface = backend.create_canvas(8, 6).unwrap();

        for name in ["out.png", "out.jpg", "out.bmp", "out"] {
            let path = temp_dir.path().join(name);
            backend
                .export_image(&surface, &path, OutputFormat::from_path(&path))
                .unwrap();
            let image = image::ImageReader::open(&path)
                .unwrap()
                .with_guessed_format()
                .unwrap()
                .decode()
                .unwrap();
            assert_eq!((image.width(), image.height()), (8, 6));
        }
    }

    #[test]
    fn test_driver_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let backend = backend();
        let driver = RenderDriver::new(&backend, &DrawerSettings::default());
        let path = temp_dir.path().join("formula.png");

        let report = driver.draw_formula(r"(a + b)^2", &path).unwrap();
        assert!(path.exists());
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (report.width, report.height));
    }
}
