//! SLA deadline computation over business hours.
//!
//! [`compute_deadline`] walks forward from a start instant one calendar day at
//! a time, consuming only minutes inside the configured working window and
//! skipping holidays and non-working weekdays. All date, weekday, and
//! wall-clock lookups happen in the requested timezone.
//!
//! The walk is bounded: a calendar that can never satisfy the SLA (no working
//! days at all, every day a holiday, close before open everywhere) fails with
//! [`SlaError::ExceededIterationLimit`] instead of looping.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::business_hours::{BusinessHours, Calendar};
use crate::calendar::{next_day, parse_time_of_day, parse_timezone, weekday_name};
use crate::error::{Result, SlaError};

/// Compute the instant by which `sla_minutes` of working time will have elapsed.
///
/// # Arguments
///
/// * `start` — The instant the SLA clock starts
/// * `sla_minutes` — Required working time in whole minutes
/// * `business_hours` — The business-hours record
/// * `timezone` — IANA zone in which the working hours and holidays apply
///
/// When `business_hours.always_open` is set the result is `start + sla_minutes`
/// and `timezone` is not consulted.
///
/// # Errors
///
/// - [`SlaError::InvalidDuration`] if `sla_minutes <= 0`
/// - [`SlaError::InvalidTimezone`] if `timezone` is not a known IANA zone
/// - [`SlaError::InvalidConfiguration`] if the hours or holidays cannot be decoded
/// - [`SlaError::InvalidTimeFormat`] if a visited weekday's open/close is not `HH:MM`
/// - [`SlaError::ExceededIterationLimit`] if the calendar cannot satisfy the SLA,
///   including when the walk would step past the last representable date
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc, Weekday};
/// use sla_engine::{compute_deadline, BusinessHours, WorkingHours};
///
/// let bh = BusinessHours::from_schedule(
///     [(Weekday::Mon, WorkingHours::new("09:00", "17:00"))],
///     Vec::new(),
/// );
/// // Monday, March 16 2026, 08:00 UTC: the clock starts at 09:00
/// let start = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap();
/// let deadline = compute_deadline(start, 60, &bh, "UTC").unwrap();
/// assert_eq!(deadline, Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap());
/// ```
pub fn compute_deadline(
    start: DateTime<Utc>,
    sla_minutes: i64,
    business_hours: &BusinessHours,
    timezone: &str,
) -> Result<DateTime<Utc>> {
    if sla_minutes <= 0 {
        return Err(SlaError::InvalidDuration(format!(
            "expected a positive number of minutes, got {sla_minutes}"
        )));
    }

    if business_hours.always_open {
        return chrono::Duration::try_minutes(sla_minutes)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(|| {
                SlaError::InvalidDatetime(format!(
                    "{start} + {sla_minutes} minutes is out of range"
                ))
            });
    }

    let tz = parse_timezone(timezone)?;
    let calendar = business_hours.decode()?;

    walk_working_time(start.with_timezone(&tz), sla_minutes, &calendar, &tz)
        .map(|deadline| deadline.with_timezone(&Utc))
}

/// A deadline computation request: when the clock starts and how much
/// working time it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRequest {
    pub start: DateTime<Utc>,
    pub sla_minutes: i64,
}

impl DeadlineRequest {
    pub fn new(start: DateTime<Utc>, sla_minutes: i64) -> Self {
        Self { start, sla_minutes }
    }

    /// The deadline under `business_hours` in `timezone`.
    pub fn deadline_in(
        &self,
        business_hours: &BusinessHours,
        timezone: &str,
    ) -> Result<DateTime<Utc>> {
        compute_deadline(self.start, self.sla_minutes, business_hours, timezone)
    }

    /// The deadline in the record's own timezone, or UTC if it has none.
    pub fn deadline(&self, business_hours: &BusinessHours) -> Result<DateTime<Utc>> {
        let timezone = business_hours.timezone.as_deref().unwrap_or("UTC");
        self.deadline_in(business_hours, timezone)
    }
}

/// Transient walk state; lives for one computation.
struct Cursor {
    at: DateTime<Tz>,
    remaining: i64,
    iterations: u64,
}

/// Day-steps allowed for `sla_minutes`: 24 per started hour, plus one.
fn iteration_budget(sla_minutes: i64) -> u64 {
    let hours = (sla_minutes.saturating_add(59) / 60).unsigned_abs();
    hours.saturating_mul(24).saturating_add(1)
}

fn walk_working_time(
    start: DateTime<Tz>,
    sla_minutes: i64,
    calendar: &Calendar,
    tz: &Tz,
) -> Result<DateTime<Tz>> {
    let max_iterations = iteration_budget(sla_minutes);
    let mut cursor = Cursor {
        at: start,
        remaining: sla_minutes,
        iterations: 0,
    };

    debug!(
        start = %cursor.at,
        timezone = %tz,
        sla_minutes,
        max_iterations,
        "computing SLA deadline"
    );

    // The last representable calendar day is as unreachable as an exhausted budget.
    let step = |from: &DateTime<Tz>| {
        next_day(from, tz).map_err(|e| {
            warn!(sla_minutes, max_iterations, error = %e, "SLA deadline walk left the calendar");
            SlaError::ExceededIterationLimit(max_iterations)
        })
    };

    while cursor.remaining > 0 {
        cursor.iterations += 1;
        if cursor.iterations > max_iterations {
            warn!(
                sla_minutes,
                max_iterations,
                remaining = cursor.remaining,
                "SLA deadline not reached within iteration limit"
            );
            return Err(SlaError::ExceededIterationLimit(max_iterations));
        }

        trace!(at = %cursor.at, remaining = cursor.remaining, iteration = cursor.iterations);

        let date = cursor.at.date_naive();
        if calendar.is_holiday(date) {
            cursor.at = step(&cursor.at)?;
            continue;
        }

        let weekday = cursor.at.weekday();
        let Some(hours) = calendar.hours_for(weekday) else {
            cursor.at = step(&cursor.at)?;
            continue;
        };

        let open = parse_time_of_day(date, &hours.open, tz).map_err(|e| {
            with_context(e, format!("open time '{}' for {}", hours.open, weekday_name(weekday)))
        })?;
        let close = parse_time_of_day(date, &hours.close, tz).map_err(|e| {
            with_context(e, format!("close time '{}' for {}", hours.close, weekday_name(weekday)))
        })?;

        if cursor.at < open {
            cursor.at = open;
        }

        // Past close: step from the day's opening, not the cursor.
        if cursor.at > close {
            cursor.at = step(&open)?;
            continue;
        }

        let minutes_left_today = (close - cursor.at).num_minutes();
        if minutes_left_today >= cursor.remaining {
            return Ok(cursor.at + chrono::Duration::minutes(cursor.remaining));
        }

        cursor.remaining -= minutes_left_today;
        cursor.at = step(&open)?;
    }

    Ok(cursor.at)
}

fn with_context(err: SlaError, context: String) -> SlaError {
    match err {
        SlaError::InvalidTimeFormat(_) => {
            SlaError::InvalidTimeFormat(format!("invalid {context}: expected HH:MM"))
        }
        SlaError::InvalidDatetime(msg) => SlaError::InvalidDatetime(format!("{context}: {msg}")),
        other => other,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
