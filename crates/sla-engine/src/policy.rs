//! Deadlines for an SLA policy's response and resolution targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::business_hours::BusinessHours;
use crate::deadline::compute_deadline;
use crate::duration::parse_sla_duration;
use crate::error::Result;

/// The targets of an SLA policy as duration expressions (see
/// [`parse_sla_duration`]). Unset or blank targets are not tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaTargets {
    #[serde(default)]
    pub first_response_time: Option<String>,
    #[serde(default)]
    pub resolution_time: Option<String>,
    #[serde(default)]
    pub next_response_time: Option<String>,
}

/// Computed deadlines, one per configured target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlaDeadlines {
    pub first_response: Option<DateTime<Utc>>,
    pub resolution: Option<DateTime<Utc>>,
    pub next_response: Option<DateTime<Utc>>,
}

/// Compute a deadline for every configured target of a policy, all starting
/// at `start`.
///
/// # Errors
///
/// The first target whose expression or deadline fails short-circuits with
/// that error, in the order first response, resolution, next response.
pub fn compute_deadlines(
    start: DateTime<Utc>,
    targets: &SlaTargets,
    business_hours: &BusinessHours,
    timezone: &str,
) -> Result<SlaDeadlines> {
    let deadline_for = |target: &Option<String>| -> Result<Option<DateTime<Utc>>> {
        match target.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(expr) => {
                let minutes = parse_sla_duration(expr)?;
                compute_deadline(start, minutes, business_hours, timezone).map(Some)
            }
        }
    };

    Ok(SlaDeadlines {
        first_response: deadline_for(&targets.first_response_time)?,
        resolution: deadline_for(&targets.resolution_time)?,
        next_response: deadline_for(&targets.next_response_time)?,
    })
}
