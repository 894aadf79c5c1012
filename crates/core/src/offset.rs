//! UTC offset model and the text parser behind clock entry.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest accepted magnitude, in hours. Far beyond any real-world zone,
/// but keeps arithmetic on the resulting instant well inside chrono's
/// representable range.
pub const MAX_OFFSET_HOURS: f64 = 10_000.0;

/// Error produced when an offset expression cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetParseError {
    /// The input was empty (possibly after stripping a sign).
    #[error("offset is empty")]
    Empty,
    /// The input was not `local`, `H:MM`, or a decimal number of hours.
    #[error("unrecognised offset `{0}`")]
    Invalid(String),
    /// The value was non-finite or beyond [`MAX_OFFSET_HOURS`].
    #[error("offset `{0}` is out of range")]
    OutOfRange(String),
}

/// A clock's distance from UTC: the host's local time, or a fixed number
/// of hours (fractional down to the minute, e.g. `-3.5` for UTC-3:30).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UtcOffset {
    /// Follow the host's local wall time.
    Local,
    /// Fixed signed hours from UTC.
    Hours(f64),
}

impl UtcOffset {
    /// Parse a user-entered offset expression.
    ///
    /// Accepts case-insensitive `local`, an optional leading `+`/`-` sign,
    /// and either `H:MM` (minutes become a fraction of an hour) or a plain
    /// decimal number of hours. Users think in both units, so `-5.5` and
    /// `-5:30` parse to the same value.
    pub fn parse(text: &str) -> Result<Self, OffsetParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(OffsetParseError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(UtcOffset::Local);
        }

        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if rest.is_empty() {
            return Err(OffsetParseError::Empty);
        }

        let invalid = || OffsetParseError::Invalid(text.trim().to_string());
        let hours = match rest.split_once(':') {
            Some((hour_part, minute_part)) => {
                // The sign was stripped up front; a signed hour or minute
                // part here is malformed, not a nested negation.
                if hour_part.starts_with(['+', '-']) || minute_part.starts_with(['+', '-']) {
                    return Err(invalid());
                }
                let hours: f64 = hour_part.parse().map_err(|_| invalid())?;
                let minutes: f64 = minute_part.parse().map_err(|_| invalid())?;
                hours + minutes / 60.0
            }
            None => rest.parse().map_err(|_| invalid())?,
        };
        Self::from_hours(sign * hours)
            .map_err(|_| OffsetParseError::OutOfRange(text.trim().to_string()))
    }

    /// Build a fixed offset, rejecting non-finite values and magnitudes
    /// beyond [`MAX_OFFSET_HOURS`].
    pub fn from_hours(hours: f64) -> Result<Self, OffsetParseError> {
        if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
            return Err(OffsetParseError::OutOfRange(hours.to_string()));
        }
        Ok(UtcOffset::Hours(hours))
    }

    /// Signed hours from UTC, or `None` for the local sentinel.
    pub fn as_hours(&self) -> Option<f64> {
        match self {
            UtcOffset::Local => None,
            UtcOffset::Hours(hours) => Some(*hours),
        }
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtcOffset::Local => write!(f, "local"),
            UtcOffset::Hours(hours) => write!(f, "{hours:+}"),
        }
    }
}

// Persisted as `"local" | number` in the config document.
impl Serialize for UtcOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UtcOffset::Local => serializer.serialize_str("local"),
            UtcOffset::Hours(hours) => serializer.serialize_f64(*hours),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OffsetRepr {
    Text(String),
    Hours(f64),
}

impl<'de> Deserialize<'de> for UtcOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match OffsetRepr::deserialize(deserializer)? {
            OffsetRepr::Text(text) => UtcOffset::parse(&text).map_err(serde::de::Error::custom),
            OffsetRepr::Hours(hours) => {
                UtcOffset::from_hours(hours).map_err(serde::de::Error::custom)
            }
        }
    }
}
