use chrono::{Local, NaiveDate, TimeZone};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::calendar::WorkingCalendar;
use crate::engine::{AvailabilityEngine, EngineConfig};
use crate::error::BookingError;
use crate::types::{BookingRequest, BookingStatus, DateRange, ExistingBooking};

/// Engine over the default configuration and the Italian holiday calendar.
pub fn engine() -> AvailabilityEngine {
    AvailabilityEngine::new(EngineConfig::default(), WorkingCalendar::italian()).unwrap()
}

/// A scheduled booking for `doctor_id` starting at the given local wall time.
pub fn booking_at(doctor_id: Uuid, date: NaiveDate, hour: u32, minute: u32) -> ExistingBooking {
    let start = Local
        .from_local_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
        .single()
        .unwrap();
    ExistingBooking {
        id: Uuid::new_v4(),
        doctor_id,
        patient_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        start_datetime: start,
        status: BookingStatus::Scheduled,
    }
}

pub struct MockBookingBackendInner {
    pub success: AtomicBool,
    pub calls_to_list_bookings: AtomicU64,
    pub calls_to_create_booking: AtomicU64,
    pub calls_to_cancel_booking: AtomicU64,
    pub bookings: Mutex<Vec<ExistingBooking>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner {
            success: AtomicBool::new(true),
            calls_to_list_bookings: AtomicU64::default(),
            calls_to_create_booking: AtomicU64::default(),
            calls_to_cancel_booking: AtomicU64::default(),
            bookings: Mutex::default(),
        }))
    }
}

impl BookingBackend for MockBookingBackend {
    fn list_bookings(&self, doctor_id: Uuid, _range: Option<DateRange>) -> Vec<ExistingBooking> {
        self.0
            .calls_to_list_bookings
            .fetch_add(1, Ordering::SeqCst);
        self.0
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|booking| booking.doctor_id == doctor_id)
            .cloned()
            .collect()
    }

    fn create_booking(&self, request: BookingRequest) -> Result<ExistingBooking, BookingError> {
        self.0
            .calls_to_create_booking
            .fetch_add(1, Ordering::SeqCst);
        if !self.0.success.load(Ordering::SeqCst) {
            return Err(BookingError::Conflict);
        }
        let booking = ExistingBooking {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            service_id: request.service_id,
            start_datetime: request.start_datetime,
            status: BookingStatus::Scheduled,
        };
        self.0.bookings.lock().unwrap().push(booking.clone());
        Ok(booking)
    }

    fn cancel_booking(&self, _id: Uuid) -> Result<(), BookingError> {
        self.0
            .calls_to_cancel_booking
            .fetch_add(1, Ordering::SeqCst);
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(BookingError::NotFound),
        }
    }
}
