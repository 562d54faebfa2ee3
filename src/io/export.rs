use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::ReservationLedger;
use crate::domain::{Booking, Payment, Room, format_cents};

/// Everything in the ledger at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
}

/// Exporter for writing ledger data as CSV or JSON
pub struct Exporter<'a> {
    ledger: &'a ReservationLedger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a ReservationLedger) -> Self {
        Self { ledger }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            rooms: self.ledger.list_rooms().to_vec(),
            bookings: self.ledger.list_bookings().to_vec(),
            payments: self.ledger.list_payments().to_vec(),
        }
    }

    /// Export rooms to CSV format
    pub fn export_rooms_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "type", "price", "available"])?;

        let rooms = self.ledger.list_rooms();
        for room in rooms {
            csv_writer.write_record([
                room.id.to_string(),
                room.room_type.clone(),
                format_cents(room.price_cents),
                room.available.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(rooms.len())
    }

    /// Export bookings to CSV format
    pub fn export_bookings_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "id",
            "user_name",
            "room_id",
            "start_date",
            "end_date",
            "nights",
            "total_amount",
            "amount_paid",
            "balance",
            "status",
        ])?;

        let bookings = self.ledger.list_bookings();
        for booking in bookings {
            csv_writer.write_record([
                booking.id.to_string(),
                booking.user_name.clone(),
                booking.room_id.to_string(),
                booking.start_date.format("%Y-%m-%d").to_string(),
                booking.end_date.format("%Y-%m-%d").to_string(),
                booking.nights().to_string(),
                format_cents(booking.total_amount),
                format_cents(booking.amount_paid),
                format_cents(booking.balance()),
                booking.status.as_str().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(bookings.len())
    }

    /// Export payments to CSV format
    pub fn export_payments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "booking_id", "amount"])?;

        let payments = self.ledger.list_payments();
        for payment in payments {
            csv_writer.write_record([
                payment.id.to_string(),
                payment.booking_id.to_string(),
                format_cents(payment.amount),
            ])?;
        }

        csv_writer.flush()?;
        Ok(payments.len())
    }

    /// Export the whole ledger as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = self.snapshot();

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample_ledger() -> ReservationLedger {
        let mut ledger = ReservationLedger::with_default_rooms();
        ledger
            .create_booking(
                "Alice",
                1,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            )
            .unwrap();
        ledger.apply_payment(1, 15000).unwrap();
        ledger
    }

    #[test]
    fn test_export_bookings_csv() {
        let ledger = sample_ledger();
        let mut out = Vec::new();

        let count = Exporter::new(&ledger).export_bookings_csv(&mut out).unwrap();

        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,user_name,room_id"));
        assert_eq!(
            lines.next().unwrap(),
            "1,Alice,1,2024-01-01,2024-01-04,3,300.00,150.00,150.00,partially_paid"
        );
    }

    #[test]
    fn test_export_rooms_and_payments_csv() {
        let ledger = sample_ledger();
        let exporter = Exporter::new(&ledger);

        let mut rooms = Vec::new();
        assert_eq!(exporter.export_rooms_csv(&mut rooms).unwrap(), 3);
        let rooms = String::from_utf8(rooms).unwrap();
        assert!(rooms.contains("1,Single,100.00,false"));
        assert!(rooms.contains("3,Suite,200.00,true"));

        let mut payments = Vec::new();
        assert_eq!(exporter.export_payments_csv(&mut payments).unwrap(), 1);
        assert!(String::from_utf8(payments).unwrap().contains("1,1,150.00"));
    }

    #[test]
    fn test_export_full_json() {
        let ledger = sample_ledger();
        let mut out = Vec::new();

        let snapshot = Exporter::new(&ledger).export_full_json(&mut out).unwrap();
        assert_eq!(snapshot.bookings.len(), 1);

        let parsed: LedgerSnapshot = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.rooms.len(), 3);
        assert_eq!(parsed.bookings[0].amount_paid, 15000);
        assert_eq!(parsed.payments[0].booking_id, 1);
        assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
    }
}
