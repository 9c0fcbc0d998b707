//! Time subsystem.
//!
//! Two independent time sources feed every frame:
//! - a monotonic clock for frame-rate sampling (`MonotonicClock`)
//! - a wall-clock calendar for the cube rotation (`Calendar`)
//!
//! They are never derived from one another; the calendar may jump when the
//! time zone changes while monotonic time keeps advancing.

mod calendar;
mod monotonic;

pub use calendar::{Calendar, ClockReading};
pub use monotonic::{FrameInstant, FrameTime, MonotonicClock};
