use crate::time::ClockReading;

/// Host-reported display state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DisplayMode {
    /// Full-power display; frames are requested continuously while visible.
    #[default]
    Interactive,
    /// Low-power always-on display; the host paces redraws.
    Ambient,
}

impl DisplayMode {
    #[inline]
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient { Self::Ambient } else { Self::Interactive }
    }

    #[inline]
    pub fn is_ambient(self) -> bool {
        self == Self::Ambient
    }
}

/// Maps a clock reading to a cube rotation in degrees.
///
/// The shipped policies are placeholders: the cube turns once per minute
/// (interactive) or once per hour (ambient). Neither shows the actual time.
pub trait RotationPolicy {
    fn rotation_degrees(&self, reading: &ClockReading) -> f32;
}

/// One revolution per minute, driven by seconds.
#[derive(Debug, Copy, Clone, Default)]
pub struct InteractiveRotationPolicy;

impl RotationPolicy for InteractiveRotationPolicy {
    fn rotation_degrees(&self, reading: &ClockReading) -> f32 {
        (reading.seconds / 60.0) * 360.0
    }
}

/// One revolution per hour, driven by minutes.
#[derive(Debug, Copy, Clone, Default)]
pub struct AmbientRotationPolicy;

impl RotationPolicy for AmbientRotationPolicy {
    fn rotation_degrees(&self, reading: &ClockReading) -> f32 {
        (reading.minutes / 60.0) * 360.0
    }
}

/// Returns the rotation policy for `mode`.
pub fn policy_for(mode: DisplayMode) -> &'static dyn RotationPolicy {
    match mode {
        DisplayMode::Interactive => &InteractiveRotationPolicy,
        DisplayMode::Ambient => &AmbientRotationPolicy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(minutes: f32, seconds: f32) -> ClockReading {
        ClockReading {
            hours: 0.0,
            minutes,
            seconds,
        }
    }

    #[test]
    fn interactive_follows_seconds() {
        let p = policy_for(DisplayMode::Interactive);
        assert_eq!(p.rotation_degrees(&reading(12.25, 15.0)), 90.0);
        assert_eq!(p.rotation_degrees(&reading(40.0, 30.0)), 180.0);
    }

    #[test]
    fn ambient_follows_minutes() {
        let p = policy_for(DisplayMode::Ambient);
        assert_eq!(p.rotation_degrees(&reading(15.0, 0.0)), 90.0);
        assert_eq!(p.rotation_degrees(&reading(45.0, 59.0)), 270.0);
    }

    #[test]
    fn angle_is_monotonic_within_a_period() {
        let p = policy_for(DisplayMode::Interactive);
        let mut last = -1.0f32;
        for step in 0..600 {
            let s = step as f32 * 0.1;
            let angle = p.rotation_degrees(&reading(0.0, s));
            assert!(angle >= last, "angle went backwards at {s}s");
            assert!((0.0..360.0).contains(&angle));
            last = angle;
        }
    }

    #[test]
    fn ambient_angle_is_monotonic_within_an_hour() {
        let p = policy_for(DisplayMode::Ambient);
        let mut last = -1.0f32;
        for minute in 0..60 {
            let angle = p.rotation_degrees(&reading(minute as f32 + 0.5, 30.0));
            assert!(angle >= last);
            last = angle;
        }
    }

    #[test]
    fn display_mode_from_flag() {
        assert_eq!(DisplayMode::from_ambient(true), DisplayMode::Ambient);
        assert!(!DisplayMode::from_ambient(false).is_ambient());
    }
}
