use chrono::{DateTime, FixedOffset, Local, Offset, Timelike, Utc};

/// Fractional clock-face reading.
///
/// Each field includes the fraction carried from the smaller units, so
/// `minutes = 30.5` means half past the thirtieth minute.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClockReading {
    /// Hours on a 12-hour dial, in `[0, 12)`.
    pub hours: f32,
    /// Minutes within the hour, in `[0, 60)`.
    pub minutes: f32,
    /// Seconds within the minute, in `[0, 60)`.
    pub seconds: f32,
}

/// Wall-clock calendar with an explicit time zone.
///
/// The time zone only changes through `set_time_zone`; nothing global is
/// consulted while reading.
#[derive(Debug, Clone)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Calendar in the host's current local time zone.
    pub fn local() -> Self {
        Self::new(Self::local_offset())
    }

    /// The host's current local UTC offset.
    pub fn local_offset() -> FixedOffset {
        *Local::now().offset()
    }

    #[inline]
    pub fn time_zone(&self) -> FixedOffset {
        self.offset
    }

    /// Applies a time zone change. Returns `true` if the offset differs.
    pub fn set_time_zone(&mut self, offset: FixedOffset) -> bool {
        if self.offset == offset {
            return false;
        }
        log::debug!("time zone changed: {} -> {}", self.offset, offset);
        self.offset = offset;
        true
    }

    /// Reads the clock face for `now` in this calendar's time zone.
    pub fn read(&self, now: DateTime<Utc>) -> ClockReading {
        let local = now.with_timezone(&self.offset);

        // Leap seconds report nanosecond >= 1e9; fold them into the last second.
        let millis = (local.nanosecond() / 1_000_000).min(999);
        let seconds = local.second() as f32 + millis as f32 / 1000.0;
        let minutes = local.minute() as f32 + seconds / 60.0;
        let hours = (local.hour() % 12) as f32 + minutes / 60.0;

        ClockReading {
            hours,
            minutes,
            seconds,
        }
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, s).unwrap()
            + chrono::Duration::milliseconds(ms as i64)
    }

    #[test]
    fn reading_carries_fractions() {
        let cal = Calendar::utc();
        let r = cal.read(at(15, 30, 30, 500));
        assert!((r.seconds - 30.5).abs() < 1e-4);
        assert!((r.minutes - (30.0 + 30.5 / 60.0)).abs() < 1e-4);
        assert!((r.hours - (3.0 + r.minutes / 60.0)).abs() < 1e-4);
    }

    #[test]
    fn time_zone_shifts_hours_only_for_whole_hour_offsets() {
        let mut cal = Calendar::utc();
        let now = at(10, 20, 5, 0);
        let before = cal.read(now);

        assert!(cal.set_time_zone(FixedOffset::east_opt(3600).unwrap()));
        let after = cal.read(now);

        assert_eq!(before.minutes, after.minutes);
        assert_eq!(before.seconds, after.seconds);
        assert!((after.hours - before.hours - 1.0).abs() < 1e-4);
    }

    #[test]
    fn half_hour_zone_moves_minutes() {
        let mut cal = Calendar::utc();
        cal.set_time_zone(FixedOffset::east_opt(5 * 3600 + 1800).unwrap());
        let r = cal.read(at(0, 0, 0, 0));
        assert!((r.minutes - 30.0).abs() < 1e-4);
    }

    #[test]
    fn setting_same_zone_reports_no_change() {
        let mut cal = Calendar::utc();
        assert!(!cal.set_time_zone(FixedOffset::east_opt(0).unwrap()));
    }

    #[test]
    fn readings_stay_in_range() {
        let cal = Calendar::utc();
        let r = cal.read(at(23, 59, 59, 0));
        assert!(r.hours < 12.0);
        assert!(r.minutes < 60.0);
        assert!(r.seconds < 60.0);
    }
}
