use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, RoomId};

pub type BookingId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Nothing paid yet
    Pending,
    /// Something paid, balance still open
    PartiallyPaid,
    /// Paid in full (or overpaid)
    Paid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::PartiallyPaid => "partially_paid",
            BookingStatus::Paid => "paid",
        }
    }

    /// Status implied by what has been paid against what is owed.
    pub fn derive(amount_paid: Cents, total_amount: Cents) -> Self {
        if amount_paid >= total_amount {
            BookingStatus::Paid
        } else if amount_paid > 0 {
            BookingStatus::PartiallyPaid
        } else {
            BookingStatus::Pending
        }
    }

    /// Human-facing label, e.g. "Partially Paid".
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::PartiallyPaid => "Partially Paid",
            BookingStatus::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "partially_paid" => Ok(BookingStatus::PartiallyPaid),
            "paid" => Ok(BookingStatus::Paid),
            _ => Err(format!("unknown booking status '{}'", s)),
        }
    }
}

/// Whole nights between two dates. Negative when `end` is before `start`.
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Amount owed for staying from `start` to `end` at `price_cents` per night.
/// `None` when the total does not fit in [`Cents`].
pub fn compute_total(price_cents: Cents, start: NaiveDate, end: NaiveDate) -> Option<Cents> {
    nights_between(start, end).checked_mul(price_cents)
}

/// A reservation of one room over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Sequence number assigned by the repository, starting at 1
    pub id: BookingId,
    pub user_name: String,
    pub room_id: RoomId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Cents,
    /// Running sum of payments recorded against this booking
    pub amount_paid: Cents,
    pub status: BookingStatus,
}

impl Booking {
    /// Create a booking with nothing paid. The id must be assigned by the repository.
    pub fn new(
        user_name: impl Into<String>,
        room_id: RoomId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_amount: Cents,
    ) -> Self {
        Self {
            id: 0,
            user_name: user_name.into(),
            room_id,
            start_date,
            end_date,
            total_amount,
            amount_paid: 0,
            status: BookingStatus::Pending,
        }
    }

    pub fn nights(&self) -> i64 {
        nights_between(self.start_date, self.end_date)
    }

    /// Amount still owed; negative when overpaid.
    pub fn balance(&self) -> Cents {
        self.total_amount.saturating_sub(self.amount_paid)
    }

    pub fn is_paid(&self) -> bool {
        self.status == BookingStatus::Paid
    }

    /// Add a payment to the running total and refresh the status.
    ///
    /// Returns the new amount paid, or `None` if it would overflow, in which
    /// case the booking is left as it was.
    pub fn record_payment(&mut self, amount: Cents) -> Option<Cents> {
        let amount_paid = self.amount_paid.checked_add(amount)?;
        self.amount_paid = amount_paid;
        self.status = BookingStatus::derive(amount_paid, self.total_amount);
        Some(amount_paid)
    }
}
