//! Error types for sla-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlaError {
    #[error("Invalid SLA duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid business hours configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Exceeded maximum iterations ({0}) - check business hours configuration")]
    ExceededIterationLimit(u64),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

pub type Result<T> = std::result::Result<T, SlaError>;
