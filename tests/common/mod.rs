// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use innkeep::cli::Shell;
use innkeep::{ReservationLedger, Room};

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Ledger with the standard rooms: 1 Single 100.00, 2 Double 150.00, 3 Suite 200.00
pub fn standard_ledger() -> ReservationLedger {
    ReservationLedger::with_default_rooms()
}

/// Ledger with a single 100.00 room with id 1
pub fn single_room_ledger() -> ReservationLedger {
    ReservationLedger::with_rooms([Room::new(1, "Single", 10000)])
}

/// Book room `room_id` for Alice from 2024-01-01 to 2024-01-04 (three nights)
pub fn book_three_nights(ledger: &mut ReservationLedger, room_id: u32) -> Result<u32> {
    let booking = ledger.create_booking(
        "Alice",
        room_id,
        parse_date("2024-01-01"),
        parse_date("2024-01-04"),
    )?;
    Ok(booking.id)
}

/// Feed `script` to an interactive shell and return everything it printed
pub fn run_shell(ledger: &mut ReservationLedger, script: &str) -> Result<String> {
    let mut output = Vec::new();
    Shell::new(ledger, script.as_bytes(), &mut output).run()?;
    Ok(String::from_utf8(output)?)
}
