use crate::domain::{Booking, BookingId, Payment, PaymentId, Room, RoomId};

/// Counts used for integrity verification and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryStats {
    pub room_count: usize,
    pub booking_count: usize,
    pub payment_count: usize,
    pub available_rooms: usize,
}

/// In-memory store for rooms, bookings and payments.
///
/// Each collection keeps insertion order. Booking and payment ids come from
/// counters owned by the repository rather than from collection length, so
/// they stay sequential no matter how the collections are read.
#[derive(Debug, Default)]
pub struct Repository {
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    payments: Vec<Payment>,
    last_booking_id: BookingId,
    last_payment_id: PaymentId,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Room operations
    // ========================

    /// Append a room. Ids are not checked for uniqueness.
    pub fn save_room(&mut self, room: Room) {
        self.rooms.push(room);
    }

    pub fn has_room(&self, id: RoomId) -> bool {
        self.rooms.iter().any(|r| r.id == id)
    }

    /// First room with the given id.
    pub fn get_room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    fn get_room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    pub fn list_rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn list_available_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.available)
    }

    /// Flip a room's availability flag. Returns false if the room is unknown.
    pub fn set_room_availability(&mut self, id: RoomId, available: bool) -> bool {
        match self.get_room_mut(id) {
            Some(room) => {
                room.available = available;
                true
            }
            None => false,
        }
    }

    // ========================
    // Booking operations
    // ========================

    /// Assign the next booking id and store the booking.
    pub fn save_booking(&mut self, booking: &mut Booking) {
        self.last_booking_id += 1;
        booking.id = self.last_booking_id;
        self.bookings.push(booking.clone());
    }

    pub fn get_booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn get_booking_mut(&mut self, id: BookingId) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == id)
    }

    pub fn list_bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn list_bookings_for_room(&self, room_id: RoomId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.room_id == room_id)
    }

    // ========================
    // Payment operations
    // ========================

    /// Assign the next payment id and store the payment.
    pub fn save_payment(&mut self, payment: &mut Payment) {
        self.last_payment_id += 1;
        payment.id = self.last_payment_id;
        self.payments.push(payment.clone());
    }

    pub fn get_payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn list_payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn list_payments_for_booking(
        &self,
        booking_id: BookingId,
    ) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |p| p.booking_id == booking_id)
    }

    // ========================
    // Integrity
    // ========================

    pub fn stats(&self) -> RepositoryStats {
        RepositoryStats {
            room_count: self.rooms.len(),
            booking_count: self.bookings.len(),
            payment_count: self.payments.len(),
            available_rooms: self.list_available_rooms().count(),
        }
    }
}
