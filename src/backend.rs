use uuid::Uuid;

use crate::error::BookingError;
use crate::types::{BookingRequest, DateRange, ExistingBooking};

/// The booking read/write boundary the engine feeds into. Implementations
/// are authoritative: `create_booking` must re-check slot occupancy
/// atomically and reject on conflict even when the engine's optimistic
/// pre-check approved the request.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    /// Snapshot of a doctor's bookings, optionally restricted to a range.
    /// Cancelled bookings are included; they are history, not free slots
    /// waiting to be pruned.
    fn list_bookings(&self, doctor_id: Uuid, range: Option<DateRange>) -> Vec<ExistingBooking>;

    fn create_booking(&self, request: BookingRequest) -> Result<ExistingBooking, BookingError>;

    /// Transitions a booking to `Cancelled`. The record stays so the slot's
    /// history remains queryable.
    fn cancel_booking(&self, id: Uuid) -> Result<(), BookingError>;
}
