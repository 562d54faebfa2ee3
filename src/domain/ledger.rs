use std::collections::HashMap;

use super::{Booking, BookingId, BookingStatus, Cents, Payment, Room};

/// Add up amounts, clamping at the bounds of [`Cents`] instead of wrapping.
pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>) -> Cents {
    amounts.into_iter().fold(0, Cents::saturating_add)
}

/// Sum of all payments recorded against a single booking.
pub fn total_paid(booking_id: BookingId, payments: &[Payment]) -> Cents {
    sum_cents(
        payments
            .iter()
            .filter(|p| p.booking_id == booking_id)
            .map(|p| p.amount),
    )
}

/// Sum of payments per booking id.
pub fn total_paid_by_booking(payments: &[Payment]) -> HashMap<BookingId, Cents> {
    let mut totals: HashMap<BookingId, Cents> = HashMap::new();
    for payment in payments {
        let total = totals.entry(payment.booking_id).or_insert(0);
        *total = total.saturating_add(payment.amount);
    }
    totals
}

/// Result of checking the ledger collections against each other.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub room_count: usize,
    pub booking_count: usize,
    pub payment_count: usize,
    pub total_owed: Cents,
    pub total_paid: Cents,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }

    /// Outstanding balance across every booking.
    pub fn outstanding(&self) -> Cents {
        self.total_owed.saturating_sub(self.total_paid)
    }
}

/// Verify the relationships between rooms, bookings and payments.
///
/// Checks that:
/// - room ids are unique
/// - booking and payment ids run 1..=n in insertion order
/// - every booking points at a known room, and that room is no longer available
/// - every payment points at a known booking
/// - each booking's running `amount_paid` matches its payments
/// - each booking's status agrees with what has been paid
pub fn build_integrity_report(
    rooms: &[Room],
    bookings: &[Booking],
    payments: &[Payment],
) -> IntegrityReport {
    let mut issues = Vec::new();

    let mut seen_rooms: HashMap<_, usize> = HashMap::new();
    for room in rooms {
        *seen_rooms.entry(room.id).or_insert(0) += 1;
    }
    let mut duplicated: Vec<_> = seen_rooms
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, count)| (*id, *count))
        .collect();
    duplicated.sort_unstable();
    for (id, count) in duplicated {
        issues.push(format!("Room id {} is used by {} rooms", id, count));
    }

    for (index, booking) in bookings.iter().enumerate() {
        let expected = index as u32 + 1;
        if booking.id != expected {
            issues.push(format!(
                "Booking at position {} has id {} (expected {})",
                index + 1,
                booking.id,
                expected
            ));
        }
    }

    for (index, payment) in payments.iter().enumerate() {
        let expected = index as u32 + 1;
        if payment.id != expected {
            issues.push(format!(
                "Payment at position {} has id {} (expected {})",
                index + 1,
                payment.id,
                expected
            ));
        }
    }

    let paid_by_booking = total_paid_by_booking(payments);

    for payment in payments {
        if !bookings.iter().any(|b| b.id == payment.booking_id) {
            issues.push(format!(
                "Payment {} references unknown booking {}",
                payment.id, payment.booking_id
            ));
        }
    }

    for booking in bookings {
        match rooms.iter().find(|r| r.id == booking.room_id) {
            Some(room) if room.available => issues.push(format!(
                "Room {} is booked by booking {} but still marked available",
                room.id, booking.id
            )),
            Some(_) => {}
            None => issues.push(format!(
                "Booking {} references unknown room {}",
                booking.id, booking.room_id
            )),
        }

        let paid = paid_by_booking.get(&booking.id).copied().unwrap_or(0);
        if booking.amount_paid != paid {
            issues.push(format!(
                "Booking {} records {} paid but its payments sum to {}",
                booking.id, booking.amount_paid, paid
            ));
        }

        // Bookings nobody has paid against keep the status they were created with
        let has_payments = paid_by_booking.contains_key(&booking.id);
        let expected = if has_payments {
            BookingStatus::derive(booking.amount_paid, booking.total_amount)
        } else {
            BookingStatus::Pending
        };
        if booking.status != expected {
            issues.push(format!(
                "Booking {} has status {} but should be {}",
                booking.id, booking.status, expected
            ));
        }
    }

    IntegrityReport {
        room_count: rooms.len(),
        booking_count: bookings.len(),
        payment_count: payments.len(),
        total_owed: sum_cents(bookings.iter().map(|b| b.total_amount)),
        total_paid: sum_cents(payments.iter().map(|p| p.amount)),
        issues,
    }
}
