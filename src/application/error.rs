use thiserror::Error;

use crate::domain::{BookingId, Cents, PaymentId, RoomId};

/// Broad category of a failed ledger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced room, booking or payment does not exist
    NotFound,
    /// The room exists but has already been booked
    Unavailable,
    /// The resulting amount does not fit in the money representation
    AmountOutOfRange,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    #[error("Room {0} is not available")]
    RoomUnavailable(RoomId),

    #[error("Total for room {room_id} over {nights} nights is too large")]
    TotalOverflow { room_id: RoomId, nights: i64 },

    #[error("Payment of {amount} cents would push booking {booking_id} past the largest amount")]
    PaymentOverflow { booking_id: BookingId, amount: Cents },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::RoomNotFound(_)
            | LedgerError::BookingNotFound(_)
            | LedgerError::PaymentNotFound(_) => ErrorKind::NotFound,
            LedgerError::RoomUnavailable(_) => ErrorKind::Unavailable,
            LedgerError::TotalOverflow { .. } | LedgerError::PaymentOverflow { .. } => {
                ErrorKind::AmountOutOfRange
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind() == ErrorKind::Unavailable
    }
}
