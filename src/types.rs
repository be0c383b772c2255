use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Only `Scheduled` bookings occupy a slot. Cancelled bookings are retained
/// as history and never block re-booking of the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingBooking {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start_datetime: DateTime<Local>,
    pub status: BookingStatus,
}

/// A half-hour marker within business hours that may be offered for booking.
/// Identity is the minute-resolution time, rendered as fixed 24-hour `HH:MM`
/// on the wire, never a locale-formatted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

/// Unvalidated booking submission as it arrives over the wire. Ids are
/// optional here so that `validate_booking_request` can report exactly which
/// field is missing instead of failing at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub start_datetime: DateTime<Local>,
}

/// Validated booking submission. Constructed only by the engine once the
/// slot is confirmed free; the sole input to the booking write interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub service_id: Uuid,
    pub start_datetime: DateTime<Local>,
}

/// Half-open local-time range for the booking read interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Local>,
    pub to: DateTime<Local>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        self.from <= instant && instant < self.to
    }
}

/// One working day of the availability window: the full slot template with
/// per-slot occupancy, plus a locale-formatted label for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub label: String,
    pub slots: Vec<SlotOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotOffer {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub available: bool,
}

/// Calendar-local slot identity of an instant: its date and minute-truncated
/// time-of-day. Seconds are dropped so a backend timestamp like 14:00:59
/// still occupies the 14:00 slot; using local time (not UTC) keeps
/// late-evening bookings from drifting onto a neighboring date.
pub fn slot_identity(instant: DateTime<Local>) -> (NaiveDate, NaiveTime) {
    let local = instant.with_timezone(&Local);
    let time = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap();
    (local.date_naive(), time)
}

/// Parses a time as exactly two integers in `[0,23]:[0,59]`. Stricter than
/// chrono's `%H:%M`, which also accepts unpadded variants.
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeFormat(value.to_string());

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Serde adapter keeping `NaiveTime` fields in the fixed `HH:MM` wire form.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(de::Error::custom)
    }
}
