//! Microsecond-precision instants on a UTC timeline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// A point in time, stored as microseconds since the Unix epoch (UTC).
///
/// Instants are totally ordered. [`Instant::MIN`] and [`Instant::MAX`] stand
/// for the beginning and the end of time and are used as the bounds of
/// intervals that were never given explicit endpoints.
///
/// # Examples
///
/// ```
/// use spatio_types::time::Instant;
///
/// let launch: Instant = "2012-03-15T10:00:00Z".parse().unwrap();
/// let later = launch.add_seconds(90.0);
/// assert!(later > launch);
/// assert_eq!(later.seconds_since(launch), 90.0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Instant(i64);

impl Instant {
    /// The beginning of time.
    pub const MIN: Instant = Instant(i64::MIN);

    /// The end of time.
    pub const MAX: Instant = Instant(i64::MAX);

    /// The Unix epoch, 1970-01-01T00:00:00Z.
    pub const EPOCH: Instant = Instant(0);

    /// Create an instant from microseconds since the Unix epoch.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Create an instant from whole seconds since the Unix epoch.
    #[inline]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds.saturating_mul(1_000_000))
    }

    /// Microseconds since the Unix epoch.
    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    /// Current system time.
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Whether this instant is one of the unbounded sentinels.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        *self == Self::MIN || *self == Self::MAX
    }

    /// Offset this instant by a (possibly negative) number of seconds.
    ///
    /// The result saturates at [`Instant::MIN`] and [`Instant::MAX`].
    pub fn add_seconds(self, seconds: f64) -> Self {
        if !seconds.is_finite() {
            return if seconds > 0.0 { Self::MAX } else { Self::MIN };
        }
        let delta = (seconds * MICROS_PER_SECOND).round();
        if delta >= i64::MAX as f64 {
            return Self::MAX;
        }
        if delta <= i64::MIN as f64 {
            return Self::MIN;
        }
        Self(self.0.saturating_add(delta as i64))
    }

    /// Signed number of seconds from `earlier` to `self`.
    pub fn seconds_since(self, earlier: Instant) -> f64 {
        (self.0 as i128 - earlier.0 as i128) as f64 / MICROS_PER_SECOND
    }

    /// Convert to a `chrono` UTC datetime, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_micros(self.0)
    }
}

impl From<SystemTime> for Instant {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(after) => Self(i64::try_from(after.as_micros()).unwrap_or(i64::MAX)),
            Err(before) => {
                let micros = i64::try_from(before.duration().as_micros()).unwrap_or(i64::MAX);
                Self(-micros)
            }
        }
    }
}

impl From<Instant> for SystemTime {
    fn from(t: Instant) -> Self {
        if t.0 >= 0 {
            UNIX_EPOCH + Duration::from_micros(t.0 as u64)
        } else {
            UNIX_EPOCH - Duration::from_micros(t.0.unsigned_abs())
        }
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(t: DateTime<Utc>) -> Self {
        Self(t.timestamp_micros())
    }
}

impl FromStr for Instant {
    type Err = chrono::ParseError;

    /// Parse an RFC 3339 / ISO 8601 timestamp such as `2012-03-15T10:00:00Z`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = DateTime::parse_from_rfc3339(s.trim())?;
        Ok(Self(t.timestamp_micros()))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MIN => write!(f, "-inf"),
            Self::MAX => write!(f, "+inf"),
            _ => match self.to_datetime() {
                Some(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                None => write!(f, "{}us", self.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TS: &str = "2012-03-15T10:00:00Z";

    #[test]
    fn test_parse_and_display() {
        let t: Instant = TEST_TS.parse().unwrap();
        assert_eq!(t.as_micros(), 1_331_805_600_000_000);
        assert_eq!(t.to_string(), TEST_TS);
    }

    #[test]
    fn test_parse_with_offset() {
        let utc: Instant = TEST_TS.parse().unwrap();
        let shifted: Instant = "2012-03-15T12:00:00+02:00".parse().unwrap();
        assert_eq!(utc, shifted);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not a date".parse::<Instant>().is_err());
    }

    #[test]
    fn test_seconds_arithmetic() {
        let t = Instant::from_unix_seconds(100);
        assert_eq!(t.add_seconds(1.5).as_micros(), 101_500_000);
        assert_eq!(t.add_seconds(-0.25).seconds_since(t), -0.25);
    }

    #[test]
    fn test_add_seconds_saturates() {
        assert_eq!(Instant::MAX.add_seconds(10.0), Instant::MAX);
        assert_eq!(Instant::MIN.add_seconds(-10.0), Instant::MIN);
        assert_eq!(Instant::EPOCH.add_seconds(f64::INFINITY), Instant::MAX);
    }

    #[test]
    fn test_sentinels_order_and_display() {
        let t: Instant = TEST_TS.parse().unwrap();
        assert!(Instant::MIN < t && t < Instant::MAX);
        assert!(Instant::MIN.is_unbounded());
        assert_eq!(Instant::MAX.to_string(), "+inf");
    }

    #[test]
    fn test_system_time_conversion() {
        let before = UNIX_EPOCH - Duration::from_secs(5);
        let t = Instant::from(before);
        assert_eq!(t.as_micros(), -5_000_000);
        assert_eq!(SystemTime::from(t), before);
    }
}
