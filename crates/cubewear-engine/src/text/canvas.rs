use crate::paint::Color;

const BYTES_PER_PIXEL: usize = 4;

/// Premultiplied RGBA8 raster surface, row-major, top row first.
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GlyphCanvas {
    /// Creates a transparent canvas. Dimensions are clamped to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * BYTES_PER_PIXEL as u32
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Erases every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Returns the RGBA bytes at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[i..i + BYTES_PER_PIXEL]);
        Some(out)
    }

    /// Composites an 8-bit coverage mask tinted with `color` at `(x, y)`.
    ///
    /// Uses source-over with premultiplied alpha. Parts of the mask outside the
    /// canvas are clipped.
    pub fn blend_coverage(
        &mut self,
        x: i32,
        y: i32,
        mask_width: usize,
        mask_height: usize,
        coverage: &[u8],
        color: Color,
    ) {
        debug_assert!(coverage.len() >= mask_width * mask_height);

        for my in 0..mask_height {
            let py = y + my as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for mx in 0..mask_width {
                let px = x + mx as i32;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }

                let cov = coverage[my * mask_width + mx] as f32 / 255.0;
                if cov <= 0.0 {
                    continue;
                }

                let src = color.with_coverage(cov);
                let i = self.index(px as u32, py as u32);
                let dst = &mut self.pixels[i..i + BYTES_PER_PIXEL];
                let keep = 1.0 - src[3];
                for c in 0..BYTES_PER_PIXEL {
                    let d = dst[c] as f32 / 255.0;
                    dst[c] = to_u8(src[c] + d * keep);
                }
            }
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Color {
        Color::from_premul(1.0, 1.0, 1.0, 1.0)
    }

    #[test]
    fn new_canvas_is_transparent() {
        let c = GlyphCanvas::new(4, 3);
        assert_eq!(c.pixels().len(), 4 * 3 * 4);
        assert_eq!(c.bytes_per_row(), 16);
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_size_is_clamped() {
        let c = GlyphCanvas::new(0, 0);
        assert_eq!((c.width(), c.height()), (1, 1));
    }

    #[test]
    fn full_coverage_writes_color() {
        let mut c = GlyphCanvas::new(2, 2);
        c.blend_coverage(1, 0, 1, 1, &[255], white());
        assert_eq!(c.pixel(1, 0), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn partial_coverage_stays_premultiplied() {
        let mut c = GlyphCanvas::new(1, 1);
        c.blend_coverage(0, 0, 1, 1, &[128], Color::from_straight(1.0, 0.0, 0.0, 1.0));
        let [r, g, b, a] = c.pixel(0, 0).unwrap();
        assert_eq!(r, a);
        assert_eq!((g, b), (0, 0));
        assert!((127..=129).contains(&a));
    }

    #[test]
    fn mask_is_clipped_at_edges() {
        let mut c = GlyphCanvas::new(2, 2);
        c.blend_coverage(-1, -1, 3, 3, &[255; 9], white());
        assert!(c.pixels().iter().all(|&b| b == 255));

        let mut c = GlyphCanvas::new(2, 2);
        c.blend_coverage(5, 5, 2, 2, &[255; 4], white());
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_erases() {
        let mut c = GlyphCanvas::new(3, 1);
        c.blend_coverage(0, 0, 3, 1, &[255, 200, 10], white());
        c.clear();
        assert!(c.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_out_of_bounds() {
        let c = GlyphCanvas::new(2, 2);
        assert!(c.pixel(2, 0).is_none());
        assert!(c.pixel(0, 2).is_none());
    }
}
