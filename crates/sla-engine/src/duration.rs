//! Compact SLA duration expressions such as `"30m"`, `"4h"`, or `"1d2h30m"`.
//!
//! Units count working time: `d` is 24 hours of working minutes, not a
//! calendar day.

use crate::error::{Result, SlaError};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Parse an SLA duration expression into whole minutes.
///
/// Accepts one or more `<number><unit>` components with units `d`, `h`, `m`
/// (case-insensitive), each unit at most once, in any order. Surrounding
/// whitespace is ignored.
///
/// # Errors
///
/// Returns [`SlaError::InvalidDuration`] for empty input, a unit without a
/// number, a trailing number without a unit, unknown or repeated units,
/// overflow, or a total of zero minutes.
///
/// # Examples
///
/// ```
/// use sla_engine::parse_sla_duration;
///
/// assert_eq!(parse_sla_duration("2h30m").unwrap(), 150);
/// assert_eq!(parse_sla_duration("1d").unwrap(), 1440);
/// assert!(parse_sla_duration("90").is_err());
/// ```
pub fn parse_sla_duration(s: &str) -> Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SlaError::InvalidDuration("empty duration".to_string()));
    }

    let mut total: i64 = 0;
    let mut seen = [false; 3];
    let mut num_buf = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            num_buf.push(ch);
            continue;
        }

        if num_buf.is_empty() {
            return Err(SlaError::InvalidDuration(format!(
                "expected number before '{ch}' in '{s}'"
            )));
        }
        let n: i64 = num_buf
            .parse()
            .map_err(|_| SlaError::InvalidDuration(format!("invalid number in '{s}'")))?;
        num_buf.clear();

        let (slot, per_unit) = match ch.to_ascii_lowercase() {
            'd' => (0, MINUTES_PER_DAY),
            'h' => (1, MINUTES_PER_HOUR),
            'm' => (2, 1),
            _ => {
                return Err(SlaError::InvalidDuration(format!(
                    "unknown unit '{ch}' in '{s}'"
                )));
            }
        };
        if std::mem::replace(&mut seen[slot], true) {
            return Err(SlaError::InvalidDuration(format!(
                "unit '{ch}' repeated in '{s}'"
            )));
        }

        total = n
            .checked_mul(per_unit)
            .and_then(|minutes| total.checked_add(minutes))
            .ok_or_else(|| SlaError::InvalidDuration(format!("'{s}' is too large")))?;
    }

    // Trailing number without unit
    if !num_buf.is_empty() {
        return Err(SlaError::InvalidDuration(format!(
            "number without unit at end of '{s}'"
        )));
    }

    if total == 0 {
        return Err(SlaError::InvalidDuration(format!(
            "'{s}' is zero minutes"
        )));
    }

    Ok(total)
}

/// Render minutes back into the compact form, e.g. `150` → `"2h30m"`.
pub fn format_sla_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return "0m".to_string();
    }

    let days = minutes / MINUTES_PER_DAY;
    let hours = (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let mins = minutes % MINUTES_PER_HOUR;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if mins > 0 {
        out.push_str(&format!("{mins}m"));
    }
    out
}
