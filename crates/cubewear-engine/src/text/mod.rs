//! CPU-side text rasterization for the frame-rate overlay.
//!
//! Text is laid out and rasterized with fontdue into a `GlyphCanvas`, a
//! premultiplied RGBA8 bitmap that the overlay uploads as a GPU texture.

mod canvas;
mod rasterizer;

pub use canvas::GlyphCanvas;
pub use rasterizer::{TextBounds, TextRasterizer};
