//! Matrix helpers for the watch-face camera and overlay.
//!
//! All matrices are column-major `glam::Mat4` and target the wgpu clip space
//! (right handed, depth in `[0, 1]`).

mod matrix;

pub use matrix::{
    compose_mvp, frustum, look_at, ortho, rotation_degrees, translation, Matrix4,
};
