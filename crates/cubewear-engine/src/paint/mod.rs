//! Color values shared by the cube pass, the overlay text and the clear color.

pub mod color;

pub use color::Color;
