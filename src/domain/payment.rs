use serde::{Deserialize, Serialize};

use super::{BookingId, Cents};

pub type PaymentId = u32;

/// A single amount paid toward a booking. Payments are never edited once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Sequence number assigned by the repository, starting at 1
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Cents,
}

impl Payment {
    /// The id must be assigned by the repository.
    pub fn new(booking_id: BookingId, amount: Cents) -> Self {
        Self {
            id: 0,
            booking_id,
            amount,
        }
    }
}
