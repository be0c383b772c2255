use chrono::{Duration, Local};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::info;
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::error::BookingError;
use crate::types::{slot_identity, BookingRequest, BookingStatus, DateRange, ExistingBooking};

/// In-memory booking store. The mutex is what makes `create_booking`'s
/// check-then-insert atomic, so two submissions racing for the same slot
/// cannot both land; this store, not the engine's pre-check, is the
/// at-most-once-per-slot boundary.
#[derive(Debug, Clone, Default)]
pub struct LocalBookings {
    bookings: Arc<Mutex<HashMap<Uuid, ExistingBooking>>>,
}

impl LocalBookings {
    /// Seeds a few scheduled appointments for a demo doctor so a fresh
    /// instance has something to show in the availability grid.
    pub fn seed_example_bookings(&self, doctor_id: Uuid) {
        let mut bookings = self.bookings.lock().unwrap();
        for (days_ahead, hour) in [(1, 9), (1, 14), (3, 10)] {
            let start = (Local::now() + Duration::days(days_ahead))
                .date_naive()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
                .and_local_timezone(Local)
                .earliest()
                .unwrap();
            let id = Uuid::new_v4();
            bookings.insert(
                id,
                ExistingBooking {
                    id,
                    doctor_id,
                    patient_id: Uuid::new_v4(),
                    service_id: Uuid::new_v4(),
                    start_datetime: start,
                    status: BookingStatus::Scheduled,
                },
            );
        }
        info!(%doctor_id, "seeded example bookings");
    }
}

impl BookingBackend for LocalBookings {
    fn list_bookings(&self, doctor_id: Uuid, range: Option<DateRange>) -> Vec<ExistingBooking> {
        let bookings = self.bookings.lock().unwrap();
        let mut matches: Vec<ExistingBooking> = bookings
            .values()
            .filter(|booking| booking.doctor_id == doctor_id)
            .filter(|booking| match range {
                Some(range) => range.contains(booking.start_datetime),
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by_key(|booking| booking.start_datetime);
        matches
    }

    fn create_booking(&self, request: BookingRequest) -> Result<ExistingBooking, BookingError> {
        let mut bookings = self.bookings.lock().unwrap();

        // Conflict identity is same doctor, same local date, same HH:MM.
        // Appointment duration is not modeled, so a longer service starting
        // at 14:00 does not block the 14:30 slot. Known limitation.
        let slot = slot_identity(request.start_datetime);
        let taken = bookings.values().any(|existing| {
            existing.doctor_id == request.doctor_id
                && existing.status == BookingStatus::Scheduled
                && slot_identity(existing.start_datetime) == slot
        });
        if taken {
            return Err(BookingError::Conflict);
        }

        let id = Uuid::new_v4();
        let booking = ExistingBooking {
            id,
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            service_id: request.service_id,
            start_datetime: request.start_datetime,
            status: BookingStatus::Scheduled,
        };
        bookings.insert(id, booking.clone());
        info!(booking_id = %id, doctor_id = %booking.doctor_id, "booking created");
        Ok(booking)
    }

    fn cancel_booking(&self, id: Uuid) -> Result<(), BookingError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.get_mut(&id) {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                info!(booking_id = %id, "booking cancelled");
                Ok(())
            }
            None => Err(BookingError::NotFound),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn request_at(doctor_id: Uuid, hour: u32, minute: u32) -> BookingRequest {
        BookingRequest {
            doctor_id,
            patient_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            start_datetime: Local
                .with_ymd_and_hms(2024, 6, 10, hour, minute, 0)
                .single()
                .unwrap(),
        }
    }

    #[test]
    fn create_list_cancel_single_booking() {
        let store = LocalBookings::default();
        let doctor_id = Uuid::new_v4();

        let booking = store.create_booking(request_at(doctor_id, 14, 0)).unwrap();
        assert_eq!(booking.status, BookingStatus::Scheduled);

        let listed = store.list_bookings(doctor_id, None);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], booking);

        store.cancel_booking(booking.id).unwrap();
        let listed = store.list_bookings(doctor_id, None);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, BookingStatus::Cancelled);

        store.cancel_booking(Uuid::new_v4()).unwrap_err();
    }

    #[test]
    fn double_booking_the_same_slot_loses_with_conflict() {
        let store = LocalBookings::default();
        let doctor_id = Uuid::new_v4();

        store.create_booking(request_at(doctor_id, 14, 0)).unwrap();
        assert_eq!(
            store.create_booking(request_at(doctor_id, 14, 0)).unwrap_err(),
            BookingError::Conflict
        );

        // The adjacent slot and another doctor's grid stay bookable.
        store.create_booking(request_at(doctor_id, 14, 30)).unwrap();
        store
            .create_booking(request_at(Uuid::new_v4(), 14, 0))
            .unwrap();
    }

    #[test]
    fn cancelled_slot_can_be_rebooked() {
        let store = LocalBookings::default();
        let doctor_id = Uuid::new_v4();

        let first = store.create_booking(request_at(doctor_id, 9, 30)).unwrap();
        store.cancel_booking(first.id).unwrap();

        let second = store.create_booking(request_at(doctor_id, 9, 30)).unwrap();
        assert_ne!(first.id, second.id);

        // Both records remain: cancellation is history, not deletion.
        assert_eq!(store.list_bookings(doctor_id, None).len(), 2);
    }

    #[test]
    fn list_bookings_is_sorted_and_respects_the_range() {
        let store = LocalBookings::default();
        let doctor_id = Uuid::new_v4();

        store.create_booking(request_at(doctor_id, 16, 0)).unwrap();
        store.create_booking(request_at(doctor_id, 9, 0)).unwrap();
        store.create_booking(request_at(doctor_id, 14, 0)).unwrap();

        let all = store.list_bookings(doctor_id, None);
        assert!(all.windows(2).all(|p| p[0].start_datetime < p[1].start_datetime));

        let morning = DateRange {
            from: Local.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).single().unwrap(),
            to: Local.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).single().unwrap(),
        };
        let listed = store.list_bookings(doctor_id, Some(morning));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].start_datetime.time().hour(), 9);
    }

    #[test]
    fn seeded_bookings_are_scheduled_for_the_demo_doctor() {
        let store = LocalBookings::default();
        let doctor_id = Uuid::new_v4();
        store.seed_example_bookings(doctor_id);

        let listed = store.list_bookings(doctor_id, None);
        assert_eq!(listed.len(), 3);
        assert!(listed
            .iter()
            .all(|booking| booking.status == BookingStatus::Scheduled));
        assert_eq!(store.list_bookings(Uuid::new_v4(), None).len(), 0);
    }
}
