//! Host-facing watch-face driver.
//!
//! `WatchFace` is the seam between a hosting service (the desktop runtime in
//! `window`, or a platform watch-face service) and the rendering core. The
//! host owns the surface and the event loop; the face owns the renderers for
//! the current surface and decides when it wants to be redrawn.

mod watch_face;

pub use watch_face::{FrameOutcome, Redraw, WatchFace};
