use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::types::TimeSlot;

/// Engine-level rejection of a booking attempt. All of these are recoverable:
/// the caller refreshes availability and prompts the user to reselect.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", content = "detail")]
pub enum ValidationError {
    #[error("'{0}' is not a valid HH:MM time")]
    InvalidTimeFormat(String),
    #[error("{0} is not a working day")]
    NonWorkingDay(NaiveDate),
    #[error("slot {} {} is not available", .0.date, .0.time.format("%H:%M"))]
    SlotTaken(TimeSlot),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors surfaced by the booking backend. `Conflict` means the slot check
/// lost a race against another booking that landed after the engine's
/// pre-check ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("slot already taken by another booking")]
    Conflict,
    #[error("booking does not exist")]
    NotFound,
}

/// Malformed engine configuration. The only fatal condition in the crate:
/// the engine refuses to construct rather than misbehave per-call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("slot template is empty, no business hours configured")]
    EmptySlotTemplate,
    #[error("business-hour range ends before it starts: {start}-{end}")]
    InvalidBusinessHours { start: NaiveTime, end: NaiveTime },
    #[error("slot granularity must be a positive number of minutes")]
    ZeroGranularity,
    #[error("cannot parse business-hours range '{0}', expected HH:MM-HH:MM")]
    MalformedBusinessHours(String),
}
