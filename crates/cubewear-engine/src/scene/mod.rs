//! Camera, projection and per-frame cube transforms.
//!
//! `RenderContext` owns the projection and view matrices (rebuilt only on
//! resize) and produces fresh model-view and model-view-projection matrices
//! for every frame. The rotation angle comes from a `RotationPolicy` chosen by
//! the host-reported display mode.

mod render_context;
mod rotation;

pub use render_context::{FrameMatrices, RenderContext};
pub use rotation::{
    policy_for, AmbientRotationPolicy, DisplayMode, InteractiveRotationPolicy, RotationPolicy,
};
