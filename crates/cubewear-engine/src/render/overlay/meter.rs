use std::time::Duration;

/// Length of one frame-rate sampling window.
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Per-second frame counter.
///
/// Every `tick` counts one rendered frame. The first tick that lands strictly
/// more than one window after the window start closes the window: the count,
/// including that tick, becomes the new displayed rate (if different), and the
/// same tick opens the next window with a count of 1.
///
/// The displayed rate can therefore change at most once per window no matter
/// how fast frames arrive.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    window_start: Duration,
    count: u32,
    shown: u32,
    updates: u64,
}

impl FrameRateMeter {
    /// Starts the first window at monotonic time `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            window_start: now,
            count: 0,
            shown: 0,
            updates: 0,
        }
    }

    /// Counts one frame at monotonic time `now`.
    ///
    /// Returns the new rate when the displayed value changed.
    pub fn tick(&mut self, now: Duration) -> Option<u32> {
        self.count = self.count.saturating_add(1);

        let elapsed = now.saturating_sub(self.window_start);
        if elapsed <= SAMPLE_WINDOW {
            return None;
        }

        let measured = self.count;
        self.count = 1;
        self.window_start = now;

        if measured == self.shown {
            return None;
        }

        self.shown = measured;
        self.updates += 1;
        Some(measured)
    }

    /// Restarts sampling at `now` without forgetting the displayed rate.
    pub fn restart(&mut self, now: Duration) {
        self.window_start = now;
        self.count = 0;
    }

    /// Rate currently displayed (0 before the first window closes).
    #[inline]
    pub fn shown(&self) -> u32 {
        self.shown
    }

    /// Number of times the displayed rate changed.
    #[inline]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Frames counted in the open window.
    #[inline]
    pub fn pending(&self) -> u32 {
        self.count
    }
}
