//! Business-hours configuration and its decoded calendar form.
//!
//! [`BusinessHours`] mirrors the stored record: the weekly schedule and the
//! holiday list arrive as encoded JSON payloads, exactly as persisted by the
//! surrounding helpdesk. [`BusinessHours::decode`] turns them into a
//! [`Calendar`] once per deadline computation.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::calendar::{parse_weekday, weekday_name};
use crate::error::{Result, SlaError};

/// Opening and closing time for one weekday, both `"HH:MM"` (24-hour).
///
/// A missing field decodes as `""` and is rejected when the weekday is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub close: String,
}

impl WorkingHours {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// A non-working calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `"YYYY-MM-DD"`, interpreted in the calculation's timezone.
    pub date: String,
}

impl Holiday {
    pub fn on(date: impl Into<String>) -> Self {
        Self {
            name: None,
            date: date.into(),
        }
    }

    pub fn named(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            date: date.into(),
        }
    }
}

/// A business-hours record as stored.
///
/// When `always_open` is set the remaining fields are ignored. `hours` is a
/// JSON object keyed by full English weekday name (`"Monday"`..`"Sunday"`);
/// weekdays without an entry are non-working days. `holidays` is a JSON array
/// of `{"date": "YYYY-MM-DD"}` entries. Either payload may be `null`.
///
/// # Examples
///
/// ```
/// use sla_engine::BusinessHours;
///
/// let bh: BusinessHours = serde_json::from_str(r#"{
///     "is_always_open": false,
///     "timezone": "Europe/Berlin",
///     "hours": { "Monday": { "open": "09:00", "close": "17:00" } },
///     "holidays": [ { "name": "Whit Monday", "date": "2026-05-25" } ]
/// }"#).unwrap();
///
/// let calendar = bh.decode().unwrap();
/// assert_eq!(calendar.holidays.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(default, alias = "is_always_open")]
    pub always_open: bool,
    /// IANA zone used by [`crate::DeadlineRequest::deadline`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub hours: Value,
    #[serde(default)]
    pub holidays: Value,
}

impl BusinessHours {
    /// A record that is open around the clock.
    pub fn always_open() -> Self {
        Self {
            always_open: true,
            ..Default::default()
        }
    }

    /// Build a record from a typed weekly schedule and holiday list.
    pub fn from_schedule(
        weekly: impl IntoIterator<Item = (Weekday, WorkingHours)>,
        holidays: impl IntoIterator<Item = Holiday>,
    ) -> Self {
        let hours: Map<String, Value> = weekly
            .into_iter()
            .map(|(weekday, wh)| {
                let mut entry = Map::new();
                entry.insert("open".to_string(), Value::String(wh.open));
                entry.insert("close".to_string(), Value::String(wh.close));
                (weekday_name(weekday).to_string(), Value::Object(entry))
            })
            .collect();

        let holidays: Vec<Value> = holidays
            .into_iter()
            .map(|holiday| {
                let mut entry = Map::new();
                if let Some(name) = holiday.name {
                    entry.insert("name".to_string(), Value::String(name));
                }
                entry.insert("date".to_string(), Value::String(holiday.date));
                Value::Object(entry)
            })
            .collect();

        Self {
            always_open: false,
            timezone: None,
            hours: Value::Object(hours),
            holidays: Value::Array(holidays),
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Decode the encoded schedule and holidays.
    ///
    /// Open/close strings are kept as-is; they are validated only when the
    /// deadline walk reaches their weekday.
    ///
    /// # Errors
    ///
    /// Returns [`SlaError::InvalidConfiguration`] if either payload does not
    /// have the expected shape or a holiday date is not `YYYY-MM-DD`.
    pub fn decode(&self) -> Result<Calendar> {
        let raw_hours = Option::<HashMap<String, WorkingHours>>::deserialize(&self.hours)
            .map_err(|e| SlaError::InvalidConfiguration(format!("working hours: {e}")))?
            .unwrap_or_default();

        let mut weekly = HashMap::with_capacity(raw_hours.len());
        for (key, hours) in raw_hours {
            match parse_weekday(&key) {
                Some(weekday) => {
                    weekly.insert(weekday, hours);
                }
                None => warn!(key = %key, "ignoring working hours for unknown weekday"),
            }
        }

        let holidays = Option::<Vec<Holiday>>::deserialize(&self.holidays)
            .map_err(|e| SlaError::InvalidConfiguration(format!("holidays: {e}")))?
            .unwrap_or_default();

        Ok(Calendar {
            weekly,
            holidays: HolidaySet::from_holidays(&holidays)?,
        })
    }
}

/// Set of holiday dates for constant-time membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet(HashSet<NaiveDate>);

impl HolidaySet {
    /// Duplicate dates collapse into one entry.
    ///
    /// Dates must be exactly `YYYY-MM-DD`; chrono alone would also take
    /// unpadded fields such as `"2026-3-7"`.
    pub fn from_holidays(holidays: &[Holiday]) -> Result<Self> {
        holidays
            .iter()
            .map(|holiday| parse_holiday_date(&holiday.date))
            .collect::<Result<HashSet<_>>>()
            .map(Self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_holiday_date(s: &str) -> Result<NaiveDate> {
    let invalid = |reason: &str| {
        SlaError::InvalidConfiguration(format!("holiday date '{s}': {reason}"))
    };

    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(invalid("expected YYYY-MM-DD"));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| invalid(&e.to_string()))
}

/// Decoded business hours: weekly schedule plus holiday lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    pub weekly: HashMap<Weekday, WorkingHours>,
    pub holidays: HolidaySet,
}

impl Calendar {
    pub fn hours_for(&self, weekday: Weekday) -> Option<&WorkingHours> {
        self.weekly.get(&weekday)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(date)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
