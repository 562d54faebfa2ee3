use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    Booking, BookingId, Cents, IntegrityReport, Payment, PaymentId, Room, RoomId,
    build_integrity_report, compute_total, nights_between,
};
use crate::storage::{Repository, RepositoryStats};

use super::LedgerError;

/// The reservation ledger: owns every room, booking and payment and keeps
/// them consistent. This is the only interface front-ends use.
///
/// Requests that fail return a [`LedgerError`] and leave the ledger untouched.
#[derive(Debug, Default)]
pub struct ReservationLedger {
    repo: Repository,
}

/// Result of applying a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    pub payment: Payment,
    /// The booking after the payment was applied
    pub booking: Booking,
}

impl PaymentResult {
    /// Amount still owed after this payment; zero or negative once settled.
    pub fn balance(&self) -> Cents {
        self.booking.balance()
    }

    pub fn is_complete(&self) -> bool {
        self.booking.is_paid()
    }
}

impl ReservationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with the given rooms, in order.
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let mut ledger = Self::new();
        for room in rooms {
            ledger.add_room(room);
        }
        ledger
    }

    /// Create a ledger with the standard three rooms.
    pub fn with_default_rooms() -> Self {
        Self::with_rooms(default_rooms())
    }

    // ========================
    // Room operations
    // ========================

    /// Add a room. A room whose id is already taken is still added;
    /// lookups keep returning the earlier one.
    pub fn add_room(&mut self, room: Room) {
        if self.repo.has_room(room.id) {
            warn!(room_id = room.id, "adding room with an id that is already in use");
        }
        debug!(room_id = room.id, room_type = %room.room_type, "room added");
        self.repo.save_room(room);
    }

    pub fn list_rooms(&self) -> &[Room] {
        self.repo.list_rooms()
    }

    /// Rooms that can still be booked, in the order they were added.
    pub fn list_available_rooms(&self) -> Vec<Room> {
        let rooms: Vec<Room> = self.repo.list_available_rooms().cloned().collect();
        debug!(count = rooms.len(), "listed available rooms");
        rooms
    }

    pub fn find_room(&self, id: RoomId) -> Option<&Room> {
        self.repo.get_room(id)
    }

    // ========================
    // Booking operations
    // ========================

    /// Book a room for the nights between `start_date` and `end_date`.
    ///
    /// The total is the number of nights times the room's nightly price.
    /// Dates are not validated, so an end before the start produces a
    /// negative total. A total too large to represent is rejected before
    /// anything is stored. The room is marked unavailable on success.
    pub fn create_booking(
        &mut self,
        user_name: impl Into<String>,
        room_id: RoomId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Booking, LedgerError> {
        let room = match self.repo.get_room(room_id) {
            Some(room) => room,
            None => {
                warn!(room_id, "booking rejected: unknown room");
                return Err(LedgerError::RoomNotFound(room_id));
            }
        };

        if !room.is_available() {
            warn!(room_id, "booking rejected: room already booked");
            return Err(LedgerError::RoomUnavailable(room_id));
        }

        let Some(total) = compute_total(room.price_cents, start_date, end_date) else {
            let nights = nights_between(start_date, end_date);
            warn!(room_id, nights, "booking rejected: total out of range");
            return Err(LedgerError::TotalOverflow { room_id, nights });
        };
        let mut booking = Booking::new(user_name, room_id, start_date, end_date, total);

        self.repo.save_booking(&mut booking);
        self.repo.set_room_availability(room_id, false);

        info!(
            booking_id = booking.id,
            room_id,
            nights = booking.nights(),
            total_cents = total,
            "booking created"
        );
        Ok(booking)
    }

    /// Current state of a booking.
    pub fn get_booking_status(&self, booking_id: BookingId) -> Result<Booking, LedgerError> {
        self.repo
            .get_booking(booking_id)
            .cloned()
            .ok_or(LedgerError::BookingNotFound(booking_id))
    }

    pub fn find_booking(&self, id: BookingId) -> Option<&Booking> {
        self.repo.get_booking(id)
    }

    pub fn list_bookings(&self) -> &[Booking] {
        self.repo.list_bookings()
    }

    /// Bookings that claimed a given room, oldest first.
    pub fn bookings_for_room(&self, room_id: RoomId) -> Vec<Booking> {
        self.repo.list_bookings_for_room(room_id).cloned().collect()
    }

    // ========================
    // Payment operations
    // ========================

    /// Record a payment toward a booking's balance and refresh its status.
    ///
    /// The amount is not validated; overpaying leaves the booking `Paid`
    /// with a negative balance. A payment that would push the amount paid
    /// past the range of [`Cents`] is rejected and nothing is recorded.
    pub fn apply_payment(
        &mut self,
        booking_id: BookingId,
        amount: Cents,
    ) -> Result<PaymentResult, LedgerError> {
        let Some(booking) = self.repo.get_booking_mut(booking_id) else {
            warn!(booking_id, "payment rejected: unknown booking");
            return Err(LedgerError::BookingNotFound(booking_id));
        };

        // Update the booking first; the payment is stored only once that succeeded
        if booking.record_payment(amount).is_none() {
            warn!(booking_id, amount_cents = amount, "payment rejected: amount out of range");
            return Err(LedgerError::PaymentOverflow { booking_id, amount });
        }
        let booking = booking.clone();

        let mut payment = Payment::new(booking_id, amount);
        self.repo.save_payment(&mut payment);

        info!(
            payment_id = payment.id,
            booking_id,
            amount_cents = amount,
            status = booking.status.as_str(),
            balance_cents = booking.balance(),
            "payment applied"
        );
        Ok(PaymentResult { payment, booking })
    }

    pub fn find_payment(&self, id: PaymentId) -> Option<&Payment> {
        self.repo.get_payment(id)
    }

    /// Look up a payment, failing when it does not exist.
    pub fn get_payment(&self, id: PaymentId) -> Result<Payment, LedgerError> {
        self.repo
            .get_payment(id)
            .cloned()
            .ok_or(LedgerError::PaymentNotFound(id))
    }

    pub fn list_payments(&self) -> &[Payment] {
        self.repo.list_payments()
    }

    /// Payments made toward a booking, in the order they were applied.
    pub fn payments_for_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<Vec<Payment>, LedgerError> {
        if self.repo.get_booking(booking_id).is_none() {
            return Err(LedgerError::BookingNotFound(booking_id));
        }
        Ok(self
            .repo
            .list_payments_for_booking(booking_id)
            .cloned()
            .collect())
    }

    // ========================
    // Integrity operations
    // ========================

    pub fn stats(&self) -> RepositoryStats {
        self.repo.stats()
    }

    /// Cross-check rooms, bookings and payments and report anything inconsistent.
    pub fn check_integrity(&self) -> IntegrityReport {
        let report = build_integrity_report(
            self.repo.list_rooms(),
            self.repo.list_bookings(),
            self.repo.list_payments(),
        );
        if !report.is_healthy() {
            warn!(issues = report.issues.len(), "ledger integrity check found issues");
        }
        report
    }
}

/// The rooms a fresh ledger starts with when no room list is supplied.
pub fn default_rooms() -> Vec<Room> {
    vec![
        Room::new(1, "Single", 10000),
        Room::new(2, "Double", 15000),
        Room::new(3, "Suite", 20000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ErrorKind;
    use crate::domain::BookingStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ledger_with_room() -> ReservationLedger {
        ReservationLedger::with_rooms([Room::new(1, "Single", 10000)])
    }

    #[test]
    fn test_default_rooms() {
        let ledger = ReservationLedger::with_default_rooms();
        let ids: Vec<_> = ledger.list_available_rooms().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ledger.find_room(3).map(|r| r.price_cents), Some(20000));
    }

    #[test]
    fn test_create_booking_marks_room_unavailable() {
        let mut ledger = ledger_with_room();

        let booking = ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap();

        assert_eq!(booking.id, 1);
        assert_eq!(booking.total_amount, 30000);
        assert_eq!(booking.amount_paid, 0);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(!ledger.find_room(1).unwrap().is_available());
        assert!(ledger.list_available_rooms().is_empty());
    }

    #[test]
    fn test_create_booking_unknown_room() {
        let mut ledger = ledger_with_room();

        let err = ledger
            .create_booking("Alice", 9, date("2024-01-01"), date("2024-01-02"))
            .unwrap_err();

        assert_eq!(err, LedgerError::RoomNotFound(9));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(ledger.list_bookings().is_empty());
        assert!(ledger.find_room(1).unwrap().is_available());
    }

    #[test]
    fn test_create_booking_unavailable_room_leaves_state_untouched() {
        let mut ledger = ledger_with_room();
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap();

        let err = ledger
            .create_booking("Bob", 1, date("2024-02-01"), date("2024-02-03"))
            .unwrap_err();

        assert_eq!(err, LedgerError::RoomUnavailable(1));
        assert!(err.is_unavailable());
        assert_eq!(ledger.list_bookings().len(), 1);
    }

    #[test]
    fn test_room_added_unavailable_cannot_be_booked() {
        let mut ledger = ReservationLedger::new();
        ledger.add_room(Room::new(5, "Penthouse", 90000).with_availability(false));

        let err = ledger
            .create_booking("Alice", 5, date("2024-01-01"), date("2024-01-02"))
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_apply_payment_progression() {
        let mut ledger = ledger_with_room();
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap();

        let first = ledger.apply_payment(1, 15000).unwrap();
        assert_eq!(first.payment.id, 1);
        assert_eq!(first.booking.amount_paid, 15000);
        assert_eq!(first.booking.status, BookingStatus::PartiallyPaid);
        assert_eq!(first.balance(), 15000);
        assert!(!first.is_complete());

        let second = ledger.apply_payment(1, 15000).unwrap();
        assert_eq!(second.payment.id, 2);
        assert_eq!(second.booking.amount_paid, 30000);
        assert_eq!(second.booking.status, BookingStatus::Paid);
        assert!(second.is_complete());

        let status = ledger.get_booking_status(1).unwrap();
        assert_eq!(status, second.booking);
    }

    #[test]
    fn test_apply_payment_unknown_booking() {
        let mut ledger = ledger_with_room();

        let err = ledger.apply_payment(999, 5000).unwrap_err();

        assert_eq!(err, LedgerError::BookingNotFound(999));
        assert!(err.is_not_found());
        assert!(ledger.list_payments().is_empty());
    }

    #[test]
    fn test_overpayment_is_paid_with_negative_balance() {
        let mut ledger = ledger_with_room();
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-02"))
            .unwrap();

        let result = ledger.apply_payment(1, 12500).unwrap();

        assert!(result.is_complete());
        assert_eq!(result.balance(), -2500);
    }

    #[test]
    fn test_lookups_return_none_when_absent() {
        let ledger = ledger_with_room();
        assert!(ledger.find_room(2).is_none());
        assert!(ledger.find_booking(1).is_none());
        assert!(ledger.find_payment(1).is_none());
        assert_eq!(ledger.get_payment(1), Err(LedgerError::PaymentNotFound(1)));
        assert_eq!(
            ledger.get_booking_status(1),
            Err(LedgerError::BookingNotFound(1))
        );
    }

    #[test]
    fn test_payments_for_booking() {
        let mut ledger = ReservationLedger::with_rooms([
            Room::new(1, "Single", 10000),
            Room::new(2, "Double", 15000),
        ]);
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-03"))
            .unwrap();
        ledger
            .create_booking("Bob", 2, date("2024-01-01"), date("2024-01-03"))
            .unwrap();
        ledger.apply_payment(1, 5000).unwrap();
        ledger.apply_payment(2, 7000).unwrap();
        ledger.apply_payment(1, 5000).unwrap();

        let ids: Vec<_> = ledger
            .payments_for_booking(1)
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(ledger.payments_for_booking(3).is_err());
        assert_eq!(ledger.bookings_for_room(2).len(), 1);
    }

    #[test]
    fn test_integrity_after_normal_use() {
        let mut ledger = ReservationLedger::with_default_rooms();
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap();
        ledger.apply_payment(1, 10000).unwrap();
        assert_eq!(
            ledger.apply_payment(5, 100),
            Err(LedgerError::BookingNotFound(5))
        );
        assert_eq!(
            ledger.create_booking("Bob", 1, date("2024-01-01"), date("2024-01-04")),
            Err(LedgerError::RoomUnavailable(1))
        );

        let report = ledger.check_integrity();

        assert!(report.is_healthy(), "issues: {:?}", report.issues);
        assert_eq!(report.booking_count, 1);
        assert_eq!(report.payment_count, 1);
        assert_eq!(report.outstanding(), 20000);
    }

    #[test]
    fn test_duplicate_room_is_reported_by_integrity_check() {
        let mut ledger = ledger_with_room();
        ledger.add_room(Room::new(1, "Twin", 12000));

        assert_eq!(ledger.list_rooms().len(), 2);
        assert!(!ledger.check_integrity().is_healthy());
    }

    #[test]
    fn test_oversized_total_is_rejected_before_saving() {
        let mut ledger = ReservationLedger::with_rooms([Room::new(1, "Palace", i64::MAX / 2)]);

        let err = ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap_err();

        assert_eq!(err, LedgerError::TotalOverflow { room_id: 1, nights: 3 });
        assert_eq!(err.kind(), ErrorKind::AmountOutOfRange);
        assert!(ledger.list_bookings().is_empty());
        assert!(ledger.find_room(1).unwrap().is_available());

        // The failed attempt does not consume a booking id
        let booking = ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-02"))
            .unwrap();
        assert_eq!(booking.id, 1);
    }

    #[test]
    fn test_overflowing_payment_records_nothing() {
        let mut ledger = ledger_with_room();
        ledger
            .create_booking("Alice", 1, date("2024-01-01"), date("2024-01-04"))
            .unwrap();
        ledger.apply_payment(1, i64::MAX - 10).unwrap();

        let err = ledger.apply_payment(1, 100).unwrap_err();

        assert_eq!(err, LedgerError::PaymentOverflow { booking_id: 1, amount: 100 });
        assert_eq!(err.kind(), ErrorKind::AmountOutOfRange);
        assert_eq!(ledger.list_payments().len(), 1);
        assert_eq!(ledger.get_booking_status(1).unwrap().amount_paid, i64::MAX - 10);
        assert!(ledger.check_integrity().is_healthy());

        // Later payments still get the next id
        let result = ledger.apply_payment(1, -10).unwrap();
        assert_eq!(result.payment.id, 2);
    }
}
