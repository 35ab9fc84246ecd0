//! Elapsed time and normal/extra/discount hour splitting.
//!
//! Given a matched entry/exit pair and the shift's schedule rule, this
//! module computes the elapsed worked time and splits it against the
//! scheduled-end threshold. The threshold is taken from the schedule table,
//! never from inline conditionals.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::config::ScheduleRule;
use crate::error::{EngineError, EngineResult};
use crate::models::{HoursBreakdown, WorkDuration};

/// Justification label attached when extra hours are non-zero.
pub const OVERTIME_LABEL: &str = "overtime";

/// Returns the scheduled end instant for an entry under a schedule rule.
///
/// The rule's `end_hour` counts hours from midnight of the entry date, so
/// values above 24 land on the following day: an entry on June 19 under the
/// 24x72 rule (`end_hour: 31`) is scheduled to end June 20 at 07:00.
///
/// # Example
///
/// ```
/// use chrono::NaiveDateTime;
/// use punch_engine::calculation::scheduled_end;
/// use punch_engine::config::{ScheduleRule, ShiftClass};
///
/// let rule = ScheduleRule { pairing: ShiftClass::Standard, end_hour: 17 };
/// let entry = NaiveDateTime::parse_from_str("2025-06-19 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let end = scheduled_end(entry, rule);
/// assert_eq!(end.to_string(), "2025-06-19 17:00:00");
/// ```
pub fn scheduled_end(entry: NaiveDateTime, rule: ScheduleRule) -> NaiveDateTime {
    let midnight = entry.date().and_hms_opt(0, 0, 0).unwrap_or(entry);
    midnight + Duration::hours(i64::from(rule.end_hour))
}

/// Splits the time worked between an entry and an exit into hour components.
///
/// - `total` is the elapsed time (strictly positive, or the call fails).
/// - `normal` is elapsed time capped at the scheduled threshold.
/// - `extra` is elapsed time beyond the threshold, labelled
///   [`OVERTIME_LABEL`] when non-zero.
/// - `discount` is scheduled time left unworked.
///
/// # Errors
///
/// Returns [`EngineError::ExitBeforeEntry`] when `exit` is not strictly
/// after `entry`. Negative elapsed time is never clamped.
///
/// # Example
///
/// ```
/// use chrono::NaiveDateTime;
/// use punch_engine::calculation::split_hours;
/// use punch_engine::config::{ScheduleRule, ShiftClass};
/// use punch_engine::models::WorkDuration;
///
/// let rule = ScheduleRule { pairing: ShiftClass::Standard, end_hour: 17 };
/// let entry = NaiveDateTime::parse_from_str("2025-06-19 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let exit = NaiveDateTime::parse_from_str("2025-06-19 19:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
///
/// let hours = split_hours(entry, exit, rule).unwrap();
/// assert_eq!(hours.normal, WorkDuration::from_hms(9, 0, 0));
/// assert_eq!(hours.extra, WorkDuration::from_hms(2, 0, 0));
/// ```
pub fn split_hours(
    entry: NaiveDateTime,
    exit: NaiveDateTime,
    rule: ScheduleRule,
) -> EngineResult<HoursBreakdown> {
    let elapsed =
        WorkDuration::between(entry, exit).ok_or(EngineError::ExitBeforeEntry { entry, exit })?;

    let threshold_seconds = (scheduled_end(entry, rule) - entry).num_seconds();
    let threshold = WorkDuration::from_seconds(threshold_seconds);

    let normal = elapsed.min(threshold);
    let extra = elapsed.saturating_sub(threshold);
    let discount = threshold.saturating_sub(elapsed);
    let justification = (!extra.is_zero()).then(|| OVERTIME_LABEL.to_string());

    Ok(HoursBreakdown {
        total: elapsed,
        normal,
        extra,
        discount,
        justification,
    })
}

/// Parses an `HH:MM` wall-clock string, as used by the correction endpoint.
pub fn parse_clock(value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| EngineError::InvalidTime {
        value: value.to_string(),
        expected: "HH:MM".to_string(),
    })
}
