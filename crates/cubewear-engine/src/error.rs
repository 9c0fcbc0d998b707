//! Error types surfaced by the rendering core.
//!
//! Initialization failures are fatal for the current surface epoch: the host
//! must not call `on_frame` until a new surface has been created successfully.
//! Frame errors are recoverable; the frame is skipped.

use std::io;
use std::path::PathBuf;

/// Failure while creating GPU resources for a surface.
#[derive(Debug, thiserror::Error)]
pub enum InitializationError {
    /// A shader module failed WGSL validation.
    #[error("shader `{label}` failed to compile: {message}")]
    ShaderCompile { label: String, message: String },

    /// The render pipeline could not be built from a compiled module.
    #[error("shader `{label}` failed to link: {message}")]
    ShaderLink { label: String, message: String },

    #[error(transparent)]
    SurfaceConfig(#[from] SurfaceConfigError),

    #[error("failed to read asset `{}`", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("font error: {0}")]
    Font(String),

    #[error("device error: {0}")]
    Device(String),
}

/// No acceptable display configuration exists for the surface.
///
/// The core needs both a color format and a depth format it can render into.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SurfaceConfigError {
    #[error("surface reports no supported color formats")]
    NoSurfaceFormat,

    #[error("adapter cannot render to depth format {0:?}")]
    NoDepthFormat(wgpu::TextureFormat),
}

/// Per-frame failure. The frame is skipped and nothing is presented.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidSurfaceDimensions { width: u32, height: u32 },

    #[error("no surface resources; on_surface_created has not succeeded")]
    SurfaceNotReady,
}
