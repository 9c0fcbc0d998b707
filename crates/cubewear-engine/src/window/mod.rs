//! Desktop host runtime.
//!
//! Owns the `winit` EventLoop and the watch window, wires them to the GPU
//! layer, and plays the role of the platform watch-face service: it forwards
//! surface, visibility, ambient and time events to a `WatchFace`.

mod runtime;

pub use runtime::{AmbientTick, HostCommand, Runtime, RuntimeConfig};
