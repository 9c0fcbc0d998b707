//! Cubewear engine crate.
//!
//! Rendering core of a watch face that shows a rotating, lit cube with a
//! self-measuring frame-rate overlay, plus the GPU device layer and a desktop
//! host runtime that drives it.

pub mod assets;
pub mod config;
pub mod device;
pub mod error;
pub mod face;
pub mod logging;
pub mod math;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;

pub use assets::{AssetSource, DirAssets, EmbeddedAssets};
pub use config::{CameraConfig, OverlayConfig, WatchFaceConfig};
pub use error::{FrameError, InitializationError, SurfaceConfigError};
pub use face::{FrameOutcome, Redraw, WatchFace};
