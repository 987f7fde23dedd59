//! # sla-engine
//!
//! Deterministic SLA deadline computation over business-hours calendars.
//!
//! Given a start instant, a required amount of working time in minutes, and
//! a business-hours record (weekly open/close windows, holidays, timezone, or
//! "always open"), compute the instant at which that much working time will
//! have elapsed. Pure functions, no clock access, no I/O: safe to call from
//! any number of threads.
//!
//! ## Modules
//!
//! - [`deadline`] — The working-time walk: [`compute_deadline`], [`DeadlineRequest`]
//! - [`business_hours`] — Stored business-hours record and its decoded [`Calendar`]
//! - [`calendar`] — Timezone-aware day advance and `HH:MM` parsing
//! - [`duration`] — Compact SLA duration expressions (`"1d2h30m"`)
//! - [`policy`] — Deadlines for a policy's first-response/resolution/next-response targets
//! - [`error`] — Error types

pub mod business_hours;
pub mod calendar;
pub mod deadline;
pub mod duration;
pub mod error;
pub mod policy;

pub use business_hours::{BusinessHours, Calendar, Holiday, HolidaySet, WorkingHours};
pub use calendar::{next_day, parse_time_of_day, parse_timezone};
pub use deadline::{compute_deadline, DeadlineRequest};
pub use duration::{format_sla_duration, parse_sla_duration};
pub use error::SlaError;
pub use policy::{compute_deadlines, SlaDeadlines, SlaTargets};
