use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::error::InitializationError;
use crate::paint::Color;

use super::GlyphCanvas;

/// Pixel bounds of a laid-out string, relative to the layout origin
/// (top of the line box, +Y down).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl TextBounds {
    #[inline]
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    #[inline]
    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }
}

/// Lays out and rasterizes single-line text with one font.
pub struct TextRasterizer {
    font: fontdue::Font,
    layout: Layout<()>,
}

impl TextRasterizer {
    /// Parses a TrueType or OpenType font from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InitializationError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| InitializationError::Font(e.to_string()))?;
        Ok(Self {
            font,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        })
    }

    /// Computes the ink bounds of `text` at `px`.
    ///
    /// Returns `None` for strings without visible glyphs.
    pub fn measure(&mut self, text: &str, px: f32) -> Option<TextBounds> {
        self.lay_out(text, px);

        self.layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .fold(None, |acc: Option<TextBounds>, g| {
                let b = TextBounds {
                    min_x: g.x,
                    min_y: g.y,
                    max_x: g.x + g.width as f32,
                    max_y: g.y + g.height as f32,
                };
                Some(match acc {
                    None => b,
                    Some(a) => TextBounds {
                        min_x: a.min_x.min(b.min_x),
                        min_y: a.min_y.min(b.min_y),
                        max_x: a.max_x.max(b.max_x),
                        max_y: a.max_y.max(b.max_y),
                    },
                })
            })
    }

    /// Rasterizes `text` into `canvas`, horizontally centered.
    ///
    /// `top` is the layout-space y that maps to canvas row 0, so every string
    /// drawn with the same `top` shares a baseline.
    pub fn draw_centered(
        &mut self,
        canvas: &mut GlyphCanvas,
        text: &str,
        px: f32,
        top: f32,
        color: Color,
    ) {
        let Some(bounds) = self.measure(text, px) else { return };

        let dx = ((canvas.width() as f32 - bounds.width()) * 0.5 - bounds.min_x).round();
        let dy = -top.floor();

        // `measure` left the layout populated for `text`.
        let glyphs: Vec<_> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y))
            .collect();

        for (key, x, y) in glyphs {
            let (metrics, bitmap) = self.font.rasterize_config(key);
            if metrics.width == 0 || metrics.height == 0 {
                continue;
            }
            canvas.blend_coverage(
                (x + dx) as i32,
                (y + dy) as i32,
                metrics.width,
                metrics.height,
                &bitmap,
                color,
            );
        }
    }

    fn lay_out(&mut self, text: &str, px: f32) {
        self.layout.reset(&LayoutSettings::default());
        self.layout
            .append(&[&self.font], &TextStyle::new(text, px, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::system_rasterizer;

    #[test]
    fn garbage_bytes_are_a_font_error() {
        let err = TextRasterizer::from_bytes(b"not a font").err().unwrap();
        assert!(matches!(err, InitializationError::Font(_)));
    }

    #[test]
    fn bounds_dimensions() {
        let b = TextBounds { min_x: 1.0, min_y: -2.0, max_x: 11.0, max_y: 6.0 };
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 8.0);
    }

    #[test]
    fn widest_sample_fits_every_rate() {
        let Some(mut r) = system_rasterizer() else { return };
        let widest = r.measure("999 fps", 24.0).unwrap();
        for rate in [1, 7, 42, 60, 111, 500] {
            let b = r.measure(&format!("{rate} fps"), 24.0).unwrap();
            assert!(b.width() <= widest.width() + 1.0, "{rate} fps is wider");
        }
    }

    #[test]
    fn whitespace_measures_nothing() {
        let Some(mut r) = system_rasterizer() else { return };
        assert!(r.measure("   ", 24.0).is_none());
    }

    #[test]
    fn drawing_puts_ink_on_canvas() {
        let Some(mut r) = system_rasterizer() else { return };
        let b = r.measure("999 fps", 24.0).unwrap();
        let mut canvas = GlyphCanvas::new(b.width().ceil() as u32, b.height().ceil() as u32);

        r.draw_centered(&mut canvas, "60 fps", 24.0, b.min_y, Color::from_premul(1.0, 1.0, 1.0, 1.0));
        assert!(canvas.pixels().chunks(4).any(|px| px[3] > 0));
    }
}
