use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Monotonic frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the clock origin. Never goes backwards.
    pub now: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Both time sources for a single frame.
///
/// `wall` drives the cube rotation, `monotonic` drives frame-rate sampling.
#[derive(Debug, Copy, Clone)]
pub struct FrameInstant {
    pub wall: DateTime<Utc>,
    pub monotonic: Duration,
}

impl FrameInstant {
    #[inline]
    pub fn new(wall: DateTime<Utc>, monotonic: Duration) -> Self {
        Self { wall, monotonic }
    }
}

/// Monotonic clock producing `FrameTime` snapshots.
///
/// One clock per surface (or per loop). Timestamps are measured from the
/// clock's origin so they can be handed to components that only understand
/// durations.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    frame_index: u64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose origin is `origin`.
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            frame_index: 0,
        }
    }

    /// Elapsed monotonic time without advancing the frame counter.
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }

    /// Restarts the frame counter.
    ///
    /// The origin is kept so timestamps stay monotonic across a surface
    /// re-creation.
    pub fn reset(&mut self) {
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let ft = FrameTime {
            now: self.elapsed(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
