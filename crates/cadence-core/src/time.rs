use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Non-negative span of composition time, stored as fractional milliseconds.
///
/// Effect delays and durations are always `Duration`s.
/// Deserializing a negative or NaN value is an error rather than a clamp.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Duration {
    millis: f64,
}

impl Duration {
    /// Create a duration from milliseconds. Negative and NaN inputs clamp to zero.
    pub fn from_millis(ms: f64) -> Self {
        Self {
            millis: if ms.is_nan() { 0.0 } else { ms.max(0.0) },
        }
    }

    /// Create a duration from seconds.
    pub fn from_seconds(s: f64) -> Self {
        Self::from_millis(s * 1000.0)
    }

    /// Create a zero duration.
    pub fn zero() -> Self {
        Self { millis: 0.0 }
    }

    /// Get duration as milliseconds.
    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Get duration as seconds.
    pub fn as_seconds(&self) -> f64 {
        self.millis / 1000.0
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0.0
    }

    /// The longer of two durations.
    pub fn max(self, other: Duration) -> Duration {
        if other.millis > self.millis {
            other
        } else {
            self
        }
    }

    /// Convert to a std duration for real-time waits.
    pub fn to_std(&self) -> std::time::Duration {
        std::time::Duration::from_nanos((self.millis * 1_000_000.0).round() as u64)
    }
}

impl TryFrom<f64> for Duration {
    type Error = String;

    fn try_from(ms: f64) -> Result<Self, Self::Error> {
        if ms.is_nan() || ms < 0.0 {
            return Err(format!("duration must be a non-negative number of ms, got {}", ms));
        }
        Ok(Self { millis: ms })
    }
}

impl From<Duration> for f64 {
    fn from(duration: Duration) -> f64 {
        duration.millis
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_millis(self.millis + rhs.millis)
    }
}

impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_millis(self.millis - rhs.millis)
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;
    fn mul(self, rhs: f64) -> Duration {
        Duration::from_millis(self.millis * rhs)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis < 1000.0 {
            write!(f, "{:.0}ms", self.millis)
        } else {
            write!(f, "{:.2}s", self.as_seconds())
        }
    }
}

/// A position on the logical timeline, in milliseconds.
///
/// Unlike [`Duration`] this is signed: playing backwards can move an effect's
/// current time below zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalTime {
    millis: f64,
}

impl LogicalTime {
    pub fn from_millis(ms: f64) -> Self {
        Self { millis: ms }
    }

    /// The start of the timeline.
    pub fn zero() -> Self {
        Self { millis: 0.0 }
    }

    pub fn as_millis(&self) -> f64 {
        self.millis
    }

    /// Move along the timeline by a signed number of milliseconds.
    pub fn offset_by(self, delta_ms: f64) -> LogicalTime {
        LogicalTime::from_millis(self.millis + delta_ms)
    }

    /// Signed distance from `self` to `other` in milliseconds.
    pub fn millis_to(&self, other: &LogicalTime) -> f64 {
        other.millis - self.millis
    }
}

impl Default for LogicalTime {
    fn default() -> Self {
        LogicalTime::zero()
    }
}

impl From<Duration> for LogicalTime {
    fn from(d: Duration) -> Self {
        LogicalTime::from_millis(d.as_millis())
    }
}

impl Add<Duration> for LogicalTime {
    type Output = LogicalTime;
    fn add(self, rhs: Duration) -> LogicalTime {
        LogicalTime::from_millis(self.millis + rhs.as_millis())
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.millis < 0.0 { "-" } else { "" };
        let total_ms = self.millis.abs() as u64;
        let minutes = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        write!(f, "{}{:02}:{:02}.{:03}", sign, minutes, secs, ms)
    }
}
