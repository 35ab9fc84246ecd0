//! Worked-time durations.
//!
//! This module defines [`WorkDuration`], the duration type used for all
//! normal/extra/discount hour values. Durations are held as whole seconds so
//! that monthly aggregation never compounds rounding error; the two-decimal
//! hour figures shown on reports are derived at the edge with
//! [`WorkDuration::as_hours`].

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// A non-negative worked duration with second precision.
///
/// Serializes as an `"HH:MM:SS"` string and deserializes from either that
/// string or a `{hours, minutes, seconds}` map, matching the two shapes the
/// punch storage layer produces for interval values.
///
/// # Example
///
/// ```
/// use punch_engine::models::WorkDuration;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let elapsed = WorkDuration::from_hms(9, 30, 0);
/// assert_eq!(elapsed.to_string(), "09:30:00");
/// assert_eq!(elapsed.as_hours(), Decimal::from_str("9.50").unwrap());
/// assert_eq!("09:30:00".parse::<WorkDuration>().unwrap(), elapsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WorkDuration(i64);

impl WorkDuration {
    /// The zero duration.
    pub const ZERO: WorkDuration = WorkDuration(0);

    /// Creates a duration from a whole number of seconds.
    ///
    /// Negative inputs are clamped to zero; callers that need to reject
    /// negative spans validate ordering before construction (see
    /// [`WorkDuration::between`]).
    pub fn from_seconds(seconds: i64) -> Self {
        WorkDuration(seconds.max(0))
    }

    /// Creates a duration from hour, minute and second components.
    pub fn from_hms(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self::from_seconds(hours * 3600 + minutes * 60 + seconds)
    }

    /// Returns the span from `start` to `end`, or `None` when `end` is not
    /// strictly after `start`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        let seconds = (end - start).num_seconds();
        if seconds > 0 {
            Some(WorkDuration(seconds))
        } else {
            None
        }
    }

    /// Returns the duration in whole seconds.
    pub fn as_seconds(&self) -> i64 {
        self.0
    }

    /// Returns true when the duration is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the duration as decimal hours rounded to two places.
    pub fn as_hours(&self) -> Decimal {
        (Decimal::from(self.0) / Decimal::from(3600)).round_dp(2)
    }

    /// Returns the smaller of two durations.
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    /// Returns the amount by which this duration exceeds `other`, or zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        WorkDuration((self.0 - other.0).max(0))
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl FromStr for WorkDuration {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidTime {
            value: s.to_string(),
            expected: "HH:MM:SS".to_string(),
        };

        let mut parts = s.split(':');
        let hours: i64 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minutes: i64 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let seconds: i64 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;

        if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
            return Err(invalid());
        }

        Ok(WorkDuration::from_hms(hours, minutes, seconds))
    }
}

impl Add for WorkDuration {
    type Output = WorkDuration;

    fn add(self, rhs: Self) -> Self::Output {
        WorkDuration(self.0 + rhs.0)
    }
}

impl AddAssign for WorkDuration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for WorkDuration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(WorkDuration::ZERO, Add::add)
    }
}

impl Serialize for WorkDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// The two wire shapes an interval value may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Text(String),
    Parts {
        #[serde(default)]
        hours: i64,
        #[serde(default)]
        minutes: i64,
        #[serde(default)]
        seconds: i64,
    },
}

impl<'de> Deserialize<'de> for WorkDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match DurationRepr::deserialize(deserializer)? {
            DurationRepr::Text(text) => text.parse().map_err(|e: EngineError| D::Error::custom(e.to_string())),
            DurationRepr::Parts {
                hours,
                minutes,
                seconds,
            } => Ok(WorkDuration::from_hms(hours, minutes, seconds)),
        }
    }
}
