//! Timezone-aware calendar helpers used by the deadline walk.
//!
//! Every function here reconstructs instants from year/month/day and
//! wall-clock components in the target zone instead of adding fixed
//! durations, so a 23-hour or 25-hour DST day still counts as exactly one
//! calendar day.
//!
//! # Wall-clock resolution
//!
//! Local times that do not map to exactly one instant are resolved as:
//!
//! - **Gap** (spring forward): the wall-clock time is read with the offset in
//!   force before the transition, so 02:30 in a 02:00→03:00 gap becomes 03:30.
//! - **Overlap** (fall back): the earlier of the two instants.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Weekday};
use chrono_tz::Tz;

use crate::error::{Result, SlaError};

/// Resolve an IANA timezone name (e.g. `"America/New_York"`) into a [`Tz`].
///
/// # Errors
///
/// Returns [`SlaError::InvalidTimezone`] wrapping the resolution error.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|e| SlaError::InvalidTimezone(format!("'{s}': {e}")))
}

/// The full English name of a weekday, as used for working-hours keys.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full English weekday name. Matching is exact: `"monday"` and
/// `"Mon"` are not weekday keys.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "Monday" => Some(Weekday::Mon),
        "Tuesday" => Some(Weekday::Tue),
        "Wednesday" => Some(Weekday::Wed),
        "Thursday" => Some(Weekday::Thu),
        "Friday" => Some(Weekday::Fri),
        "Saturday" => Some(Weekday::Sat),
        "Sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Midnight of the calendar day after `t`'s calendar day in `tz`.
///
/// # Errors
///
/// Returns [`SlaError::InvalidDatetime`] if the next day is outside chrono's
/// representable range.
pub fn next_day(t: &DateTime<Tz>, tz: &Tz) -> Result<DateTime<Tz>> {
    let date = t.with_timezone(tz).date_naive();
    let next = date
        .succ_opt()
        .ok_or_else(|| SlaError::InvalidDatetime(format!("no calendar day after {date}")))?;

    resolve_local(tz, next.and_time(NaiveTime::MIN)).ok_or_else(|| {
        SlaError::InvalidDatetime(format!("cannot place midnight of {next} in {tz}"))
    })
}

/// Combine `date` with a 24-hour `"HH:MM"` time in `tz`.
///
/// Hours must be `00`-`23` and minutes `00`-`59`, both exactly two digits.
/// Seconds, AM/PM markers, and single-digit hours are rejected.
///
/// # Errors
///
/// Returns [`SlaError::InvalidTimeFormat`] if `s` is not `HH:MM`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sla_engine::calendar::{parse_time_of_day, parse_timezone};
///
/// let tz = parse_timezone("UTC").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
/// let open = parse_time_of_day(date, "09:30", &tz).unwrap();
/// assert_eq!(open.to_rfc3339(), "2026-03-16T09:30:00+00:00");
///
/// assert!(parse_time_of_day(date, "9:30", &tz).is_err());
/// ```
pub fn parse_time_of_day(date: NaiveDate, s: &str, tz: &Tz) -> Result<DateTime<Tz>> {
    let time = parse_hh_mm(s).ok_or_else(|| {
        SlaError::InvalidTimeFormat(format!("'{s}' is not a 24-hour HH:MM time"))
    })?;

    resolve_local(tz, date.and_time(time)).ok_or_else(|| {
        SlaError::InvalidDatetime(format!("cannot place {date} {s} in {tz}"))
    })
}

/// Strict `HH:MM` parser. `NaiveTime::parse_from_str` accepts single-digit
/// hours, so the shape is checked byte by byte.
fn parse_hh_mm(s: &str) -> Option<NaiveTime> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }

    let digit = |b: u8| b.is_ascii_digit().then(|| u32::from(b - b'0'));
    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Map a wall-clock datetime in `tz` to a single instant (see module docs).
fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            // No zone has a gap longer than a day, so a day earlier is
            // always on the far side of the transition.
            let before = naive.checked_sub_signed(chrono::Duration::days(1))?;
            let offset = tz.offset_from_local_datetime(&before).earliest()?.fix();
            let shift = chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
            Some(tz.from_utc_datetime(&naive.checked_sub_signed(shift)?))
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parse_timezone tests ────────────────────────────────────────────

    #[test]
    fn test_parse_timezone_valid() {
        let tz = parse_timezone("America/New_York").unwrap();
        assert_eq!(tz, Tz::America__New_York);
    }

    #[test]
    fn test_parse_timezone_invalid() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, SlaError::InvalidTimezone(_)));
        assert!(err.to_string().contains("Mars/Olympus_Mons"), "got: {err}");
    }

    // ── weekday names ───────────────────────────────────────────────────

    #[test]
    fn test_weekday_names_round_trip() {
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(parse_weekday(weekday_name(weekday)), Some(weekday));
        }
    }

    #[test]
    fn test_parse_weekday_is_exact() {
        assert_eq!(parse_weekday("monday"), None);
        assert_eq!(parse_weekday("Mon"), None);
        assert_eq!(parse_weekday(" Monday"), None);
    }

    // ── next_day tests ──────────────────────────────────────────────────

    #[test]
    fn test_next_day_is_midnight() {
        let tz = Tz::UTC;
        let t = tz.with_ymd_and_hms(2026, 3, 16, 15, 42, 10).unwrap();
        let next = next_day(&t, &tz).unwrap();
        assert_eq!(next, tz.with_ymd_and_hms(2026, 3, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_day_crosses_month_and_year() {
        let tz = Tz::UTC;
        let feb = tz.with_ymd_and_hms(2028, 2, 28, 23, 59, 0).unwrap();
        assert_eq!(next_day(&feb, &tz).unwrap().date_naive(), date(2028, 2, 29));

        let nye = tz.with_ymd_and_hms(2026, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(next_day(&nye, &tz).unwrap().date_naive(), date(2027, 1, 1));
    }

    #[test]
    fn test_next_day_spring_forward_is_23_hours() {
        // March 8, 2026: US spring forward (2:00 AM → 3:00 AM)
        let tz = Tz::America__New_York;
        let sunday = tz.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();
        let monday = next_day(&sunday, &tz).unwrap();
        assert_eq!(monday.date_naive(), date(2026, 3, 9));
        assert_eq!(monday.hour(), 0);
        assert_eq!((monday - sunday).num_hours(), 23);
    }

    #[test]
    fn test_next_day_fall_back_is_25_hours() {
        // November 1, 2026: US fall back (2:00 AM → 1:00 AM)
        let tz = Tz::America__New_York;
        let sunday = tz.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();
        let monday = next_day(&sunday, &tz).unwrap();
        assert_eq!(monday.date_naive(), date(2026, 11, 2));
        assert_eq!((monday - sunday).num_hours(), 25);
    }

    #[test]
    fn test_next_day_uses_zone_calendar_day() {
        // 02:00 UTC on Tuesday is still Monday evening in New York.
        let tz = Tz::America__New_York;
        let t = Utc
            .with_ymd_and_hms(2026, 3, 17, 2, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let next = next_day(&t, &tz).unwrap();
        assert_eq!(next.date_naive(), date(2026, 3, 17));
        assert_eq!(next.weekday(), Weekday::Tue);
    }

    #[test]
    fn test_next_day_midnight_in_gap() {
        // Chile springs forward at local midnight: 2026-09-06 00:00 does not exist.
        let tz = Tz::America__Santiago;
        let saturday = tz.with_ymd_and_hms(2026, 9, 5, 12, 0, 0).unwrap();
        let next = next_day(&saturday, &tz).unwrap();
        assert_eq!(next.date_naive(), date(2026, 9, 6));
        assert_eq!(next.hour(), 1);
    }

    // ── parse_time_of_day tests ─────────────────────────────────────────

    #[test]
    fn test_parse_time_of_day_valid() {
        let tz = Tz::UTC;
        let t = parse_time_of_day(date(2026, 3, 16), "17:05", &tz).unwrap();
        assert_eq!(t, tz.with_ymd_and_hms(2026, 3, 16, 17, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_time_of_day_bounds() {
        let tz = Tz::UTC;
        assert!(parse_time_of_day(date(2026, 3, 16), "00:00", &tz).is_ok());
        assert!(parse_time_of_day(date(2026, 3, 16), "23:59", &tz).is_ok());
    }

    #[test]
    fn test_parse_time_of_day_rejects_malformed() {
        let tz = Tz::UTC;
        for bad in [
            "24:00", "9:30", "12:60", "9:30:00", "09:30:00", "9am", "09:30 PM", "", "0930",
            "ab:cd", "-1:30", " 09:30", "09.30", "１２:００",
        ] {
            let err = parse_time_of_day(date(2026, 3, 16), bad, &tz).unwrap_err();
            assert!(
                matches!(err, SlaError::InvalidTimeFormat(_)),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_time_of_day_in_zone() {
        // March 16 2026 is EDT (UTC-4), so 09:00 local = 13:00 UTC
        let tz = Tz::America__New_York;
        let t = parse_time_of_day(date(2026, 3, 16), "09:00", &tz).unwrap();
        assert_eq!(
            t.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 16, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_time_of_day_in_spring_forward_gap() {
        let tz = Tz::America__New_York;
        let t = parse_time_of_day(date(2026, 3, 8), "02:30", &tz).unwrap();
        assert_eq!(t.hour(), 3);
        assert_eq!(t.minute(), 30);
        assert_eq!(
            t.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_time_of_day_in_fall_back_overlap_takes_earlier() {
        // 01:30 happens twice on November 1, 2026; the EDT one comes first.
        let tz = Tz::America__New_York;
        let t = parse_time_of_day(date(2026, 11, 1), "01:30", &tz).unwrap();
        assert_eq!(
            t.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap()
        );
    }
}
