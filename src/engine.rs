use chrono::{DateTime, Duration, Local, Locale, NaiveDate, NaiveTime, TimeZone, Timelike};
use std::collections::HashSet;
use uuid::Uuid;

use crate::calendar::WorkingCalendar;
use crate::error::{ConfigError, ValidationError};
use crate::locale::day_label;
use crate::types::{
    parse_hhmm, slot_identity, BookingDraft, BookingRequest, BookingStatus, DayAvailability,
    ExistingBooking, SlotOffer, TimeSlot,
};

/// Engine configuration with documented defaults. Validated once at engine
/// construction; a malformed configuration never reaches per-call code.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Business-hour ranges as inclusive (first slot, last slot) pairs.
    pub business_hours: Vec<(NaiveTime, NaiveTime)>,
    /// Slot granularity in minutes.
    pub slot_minutes: u32,
    /// How many working days the availability window offers.
    pub window_days: usize,
    /// Calendar-day scan cap for the working-day search. Guarantees
    /// termination even if the holiday list swallows the whole window.
    pub max_lookahead_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Self {
            business_hours: vec![(hm(9, 0), hm(11, 30)), (hm(14, 0), hm(17, 30))],
            slot_minutes: 30,
            window_days: 7,
            max_lookahead_days: 60,
        }
    }
}

/// Pure availability computation over caller-supplied snapshots. Owns no
/// persistent state and performs no I/O: the caller fetches the booking list,
/// asks the engine for the slot grid or a validation verdict, and then talks
/// to the booking backend itself.
#[derive(Debug)]
pub struct AvailabilityEngine {
    config: EngineConfig,
    calendar: WorkingCalendar,
    template: Vec<NaiveTime>,
}

impl AvailabilityEngine {
    pub fn new(config: EngineConfig, calendar: WorkingCalendar) -> Result<Self, ConfigError> {
        let template = build_template(&config)?;
        Ok(Self {
            config,
            calendar,
            template,
        })
    }

    pub fn calendar(&self) -> &WorkingCalendar {
        &self.calendar
    }

    /// The fixed ordered half-hour template. Identical for every working day;
    /// no slot exists outside of it.
    pub fn slot_template(&self) -> &[NaiveTime] {
        &self.template
    }

    /// The next `count` working days strictly after `from`, scanning at most
    /// `max_lookahead_days` calendar days. May return fewer than `count`
    /// dates when the cap bites; callers must handle a short list.
    pub fn next_working_days(
        &self,
        from: NaiveDate,
        count: usize,
        max_lookahead_days: u32,
    ) -> Vec<NaiveDate> {
        let mut days = Vec::with_capacity(count);
        for offset in 1..=max_lookahead_days as i64 {
            if days.len() == count {
                break;
            }
            let date = from + Duration::days(offset);
            if !self.calendar.is_non_working_day(date) {
                days.push(date);
            }
        }
        days
    }

    /// Occupied slot times for one doctor on one date. Projection uses
    /// calendar-local time, not UTC, so a late-evening booking cannot drift
    /// onto a neighboring date.
    pub fn booked_slots_on(
        &self,
        date: NaiveDate,
        bookings: &[ExistingBooking],
        doctor_id: Uuid,
    ) -> HashSet<NaiveTime> {
        bookings
            .iter()
            .filter(|booking| {
                booking.doctor_id == doctor_id && booking.status == BookingStatus::Scheduled
            })
            .map(|booking| slot_identity(booking.start_datetime))
            .filter(|&(booking_date, _)| booking_date == date)
            .map(|(_, time)| time)
            .collect()
    }

    /// Whether a slot can be offered. Re-checks the working-day rule even for
    /// dates that came out of `next_working_days`, since callers may pass
    /// arbitrary dates.
    pub fn is_slot_available(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        bookings: &[ExistingBooking],
        doctor_id: Uuid,
    ) -> bool {
        !self.calendar.is_non_working_day(date)
            && self.template.contains(&time)
            && !self.booked_slots_on(date, bookings, doctor_id).contains(&time)
    }

    /// Combines a calendar date and an `HH:MM` string into the absolute local
    /// instant the booking would start at, with zero seconds.
    pub fn build_booking_start(
        &self,
        date: NaiveDate,
        time: &str,
    ) -> Result<DateTime<Local>, ValidationError> {
        let parsed = parse_hhmm(time)?;
        Local
            .from_local_datetime(&date.and_time(parsed))
            .earliest()
            // A DST gap can make a syntactically valid time unrepresentable.
            .ok_or_else(|| ValidationError::InvalidTimeFormat(time.to_string()))
    }

    /// Re-derives date and time from the draft and re-runs the availability
    /// check against the given snapshot. The slot grid shown to the user may
    /// be stale by submission time, so a rejection here means "refresh and
    /// reselect", not a fatal error.
    pub fn validate_booking_request(
        &self,
        draft: &BookingDraft,
        bookings: &[ExistingBooking],
    ) -> Result<BookingRequest, ValidationError> {
        let doctor_id = draft
            .doctor_id
            .ok_or(ValidationError::MissingField("doctor_id"))?;
        let patient_id = draft
            .patient_id
            .ok_or(ValidationError::MissingField("patient_id"))?;
        let service_id = draft
            .service_id
            .ok_or(ValidationError::MissingField("service_id"))?;

        let (date, time) = slot_identity(draft.start_datetime);

        if self.calendar.is_non_working_day(date) {
            return Err(ValidationError::NonWorkingDay(date));
        }
        if !self.template.contains(&time)
            || self.booked_slots_on(date, bookings, doctor_id).contains(&time)
        {
            return Err(ValidationError::SlotTaken(TimeSlot { date, time }));
        }

        Ok(BookingRequest {
            doctor_id,
            patient_id,
            service_id,
            start_datetime: draft.start_datetime,
        })
    }

    /// The bookable grid for the next configured working days, starting the
    /// day after `today`. This is what the availability endpoint serves.
    pub fn availability_window(
        &self,
        today: NaiveDate,
        bookings: &[ExistingBooking],
        doctor_id: Uuid,
        locale: Locale,
    ) -> Vec<DayAvailability> {
        self.next_working_days(today, self.config.window_days, self.config.max_lookahead_days)
            .into_iter()
            .map(|date| {
                let booked = self.booked_slots_on(date, bookings, doctor_id);
                let slots = self
                    .template
                    .iter()
                    .map(|&time| SlotOffer {
                        time,
                        available: !booked.contains(&time),
                    })
                    .collect();
                DayAvailability {
                    date,
                    label: day_label(date, locale),
                    slots,
                }
            })
            .collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn build_template(config: &EngineConfig) -> Result<Vec<NaiveTime>, ConfigError> {
    if config.slot_minutes == 0 {
        return Err(ConfigError::ZeroGranularity);
    }

    let mut template = Vec::new();
    for &(start, end) in &config.business_hours {
        if end < start {
            return Err(ConfigError::InvalidBusinessHours { start, end });
        }
        let step = config.slot_minutes * 60;
        let mut seconds = seconds_from_midnight(start);
        while seconds <= seconds_from_midnight(end) {
            template.push(
                NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
                    .ok_or(ConfigError::InvalidBusinessHours { start, end })?,
            );
            seconds += step;
        }
    }

    if template.is_empty() {
        return Err(ConfigError::EmptySlotTemplate);
    }
    template.sort();
    template.dedup();
    Ok(template)
}

fn seconds_from_midnight(time: NaiveTime) -> u32 {
    time.hour() * 3600 + time.minute() * 60 + time.second()
}
