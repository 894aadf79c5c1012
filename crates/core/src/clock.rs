//! A single tracked time zone and the display rules applied to it.

use chrono::{DateTime, Duration, Local, NaiveDateTime, Timelike, Utc};

use crate::offset::UtcOffset;

/// Session-wide display options, persisted alongside the clock list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Render `HH:MM:SS` instead of `H:MM:SSam/pm`.
    pub use_24h: bool,
    /// Append a three-letter weekday abbreviation.
    pub show_weekday: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            use_24h: false,
            show_weekday: true,
        }
    }
}

/// One tracked clock: a unique label plus its distance from UTC.
#[derive(Debug, Clone)]
pub struct Clock {
    /// User-chosen identity, unique within a registry.
    pub label: String,
    /// Where the clock sits relative to UTC.
    pub offset: UtcOffset,
    /// Most recently rendered line, kept for display diffing.
    pub last_display: String,
}

impl Clock {
    /// Create a clock with an empty display cache.
    pub fn new(label: impl Into<String>, offset: UtcOffset) -> Self {
        Self {
            label: label.into(),
            offset,
            last_display: String::new(),
        }
    }

    /// Format this clock for the given instant.
    ///
    /// 24-hour mode zero-pads (`09:05:00`); 12-hour mode drops the leading
    /// zero, renders the 0 hour as `12`, and uses a lowercase meridiem
    /// (`9:05:00am`). The weekday suffix is separated by a single space.
    pub fn render(&self, now: DateTime<Utc>, settings: &DisplaySettings) -> String {
        let instant = self.resolve(now);
        let time = if settings.use_24h {
            instant.format("%H:%M:%S").to_string()
        } else {
            let (is_pm, hour) = instant.hour12();
            let meridiem = if is_pm { "pm" } else { "am" };
            format!(
                "{}:{:02}:{:02}{}",
                hour,
                instant.minute(),
                instant.second(),
                meridiem
            )
        };
        if settings.show_weekday {
            format!("{}: {} {}", self.label, time, instant.format("%a"))
        } else {
            format!("{}: {}", self.label, time)
        }
    }

    /// Wall time this clock shows at `now`, rounded to the whole second.
    ///
    /// Parsed offsets are bounded, but `Hours` values can also arrive raw
    /// (deserialization, direct construction), so the shift is applied with
    /// checked arithmetic and falls back to UTC rather than panicking
    /// mid-render.
    fn resolve(&self, now: DateTime<Utc>) -> NaiveDateTime {
        match self.offset {
            UtcOffset::Local => now.with_timezone(&Local).naive_local(),
            UtcOffset::Hours(hours) => Duration::try_seconds((hours * 3600.0).round() as i64)
                .and_then(|shift| now.naive_utc().checked_add_signed(shift))
                .unwrap_or_else(|| now.naive_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        // 2024-01-15 is a Monday.
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    fn settings(use_24h: bool, show_weekday: bool) -> DisplaySettings {
        DisplaySettings {
            use_24h,
            show_weekday,
        }
    }

    #[test]
    fn renders_24h_zero_padded() {
        let clock = Clock::new("utc", UtcOffset::Hours(0.0));
        assert_eq!(
            clock.render(instant(9, 5, 3), &settings(true, false)),
            "utc: 09:05:03"
        );
    }

    #[test]
    fn renders_12h_without_leading_zero() {
        let clock = Clock::new("utc", UtcOffset::Hours(0.0));
        assert_eq!(
            clock.render(instant(9, 5, 3), &settings(false, false)),
            "utc: 9:05:03am"
        );
        assert_eq!(
            clock.render(instant(21, 5, 3), &settings(false, false)),
            "utc: 9:05:03pm"
        );
    }

    #[test]
    fn renders_midnight_and_noon_as_twelve() {
        let clock = Clock::new("utc", UtcOffset::Hours(0.0));
        assert_eq!(
            clock.render(instant(0, 0, 0), &settings(false, false)),
            "utc: 12:00:00am"
        );
        assert_eq!(
            clock.render(instant(12, 0, 0), &settings(false, false)),
            "utc: 12:00:00pm"
        );
    }

    #[test]
    fn appends_weekday_abbreviation() {
        let clock = Clock::new("utc", UtcOffset::Hours(0.0));
        assert_eq!(
            clock.render(instant(9, 0, 0), &settings(true, true)),
            "utc: 09:00:00 Mon"
        );
    }

    #[test]
    fn applies_fractional_offsets() {
        let clock = Clock::new("nfl", UtcOffset::Hours(-3.5));
        assert_eq!(
            clock.render(instant(12, 0, 0), &settings(true, false)),
            "nfl: 08:30:00"
        );
        let clock = Clock::new("tokyo", UtcOffset::Hours(9.0));
        assert_eq!(
            clock.render(instant(20, 0, 0), &settings(true, true)),
            // +9 crosses midnight into Tuesday.
            "tokyo: 05:00:00 Tue"
        );
    }

    #[test]
    fn extreme_offsets_render_without_panicking() {
        // Out-of-range shifts fall back to the unshifted UTC instant.
        let now = instant(12, 0, 0);
        for hours in [9e15, -9e15, f64::INFINITY, f64::NAN] {
            let clock = Clock::new("far", UtcOffset::Hours(hours));
            assert_eq!(
                clock.render(now, &settings(true, false)),
                "far: 12:00:00"
            );
        }
    }

    #[test]
    fn local_offset_matches_host_wall_time() {
        let now = instant(12, 0, 0);
        let clock = Clock::new("local", UtcOffset::Local);
        let expected = now.with_timezone(&Local).naive_local();
        assert_eq!(
            clock.render(now, &settings(true, false)),
            format!("local: {}", expected.format("%H:%M:%S"))
        );
    }
}
