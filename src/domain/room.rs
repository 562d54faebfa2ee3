use serde::{Deserialize, Serialize};

use super::Cents;

pub type RoomId = u32;

/// A bookable room. Ids are chosen by whoever adds the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Free-form label such as "Single" or "Suite"
    pub room_type: String,
    /// Nightly rate in cents
    pub price_cents: Cents,
    /// Cleared once a booking claims the room; never set back
    pub available: bool,
}

impl Room {
    /// New rooms start out available.
    pub fn new(id: RoomId, room_type: impl Into<String>, price_cents: Cents) -> Self {
        Self {
            id,
            room_type: room_type.into(),
            price_cents,
            available: true,
        }
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}
