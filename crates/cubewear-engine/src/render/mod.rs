//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (programs, buffers, textures) for one
//! surface epoch and record draws into a caller-provided render pass.
//!
//! Convention:
//! - the cube is drawn first, depth tested and depth writing
//! - the overlay is drawn last in screen pixels (bottom-left origin, +Y up)
//!   and leaves depth untouched

mod common;
mod ctx;
mod cube;
mod mesh;
mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub mod overlay;

pub use ctx::{RenderCtx, RenderTarget};
pub use cube::CubeRenderer;
pub use mesh::{CubeMesh, CUBE_VERTEX_COUNT};
pub use overlay::{FrameRateMeter, FrameRateOverlay};
pub use shader::{ProgramDesc, SampledTexture, ShaderProgram};
