use anyhow::Result;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::application::{LedgerError, ReservationLedger};
use crate::domain::{BookingId, RoomId, format_cents, parse_cents};

/// What the menu loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive menu over a [`ReservationLedger`].
///
/// Reads answers line by line from `input` and writes prompts and results to
/// `output`. Bad answers print a message and return to the menu. The loop ends
/// on the exit option or when input runs out.
pub struct Shell<'a, R, W> {
    ledger: &'a mut ReservationLedger,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(ledger: &'a mut ReservationLedger, input: R, output: W) -> Self {
        Self {
            ledger,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            debug!(choice = %choice, "menu selection");

            let flow = match choice.to_lowercase().as_str() {
                "1" => self.make_booking()?,
                "2" => self.make_payment()?,
                "3" => self.check_status()?,
                "4" => self.list_rooms()?,
                "5" => self.check_integrity()?,
                "6" | "exit" | "quit" | "q" => Flow::Exit,
                "" => Flow::Continue,
                _ => {
                    writeln!(self.output, "Invalid option. Please choose again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "1. Make a booking")?;
        writeln!(self.output, "2. Make a payment")?;
        writeln!(self.output, "3. Check booking status")?;
        writeln!(self.output, "4. List available rooms")?;
        writeln!(self.output, "5. Check ledger integrity")?;
        writeln!(self.output, "6. Exit")?;
        Ok(())
    }

    /// Print `message` and read one trimmed line. `None` means input is exhausted.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn print_available_rooms(&mut self) -> Result<usize> {
        let rooms = self.ledger.list_available_rooms();
        if rooms.is_empty() {
            writeln!(self.output, "No rooms available.")?;
            return Ok(0);
        }

        writeln!(self.output, "Available rooms:")?;
        for room in &rooms {
            writeln!(
                self.output,
                "Room ID: {}, Type: {}, Price: ${}",
                room.id,
                room.room_type,
                format_cents(room.price_cents)
            )?;
        }
        Ok(rooms.len())
    }

    fn make_booking(&mut self) -> Result<Flow> {
        if self.print_available_rooms()? == 0 {
            return Ok(Flow::Continue);
        }

        let Some(user_name) = self.prompt("Enter user name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(room_str) = self.prompt("Enter room ID from the available options: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(room_id) = room_str.parse::<RoomId>() else {
            writeln!(self.output, "Invalid room ID '{}'.", room_str)?;
            return Ok(Flow::Continue);
        };
        let Some(start_str) = self.prompt("Enter start date (yyyy-mm-dd): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(start_date) = self.parse_date_or_report(&start_str)? else {
            return Ok(Flow::Continue);
        };
        let Some(end_str) = self.prompt("Enter end date (yyyy-mm-dd): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(end_date) = self.parse_date_or_report(&end_str)? else {
            return Ok(Flow::Continue);
        };

        match self
            .ledger
            .create_booking(user_name, room_id, start_date, end_date)
        {
            Ok(booking) => writeln!(
                self.output,
                "Booking made successfully! Booking ID: {}, Total Amount: ${}",
                booking.id,
                format_cents(booking.total_amount)
            )?,
            Err(e) => writeln!(self.output, "{}", describe_error(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn make_payment(&mut self) -> Result<Flow> {
        let Some(booking_str) = self.prompt("Enter booking ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(booking_id) = booking_str.parse::<BookingId>() else {
            writeln!(self.output, "Invalid booking ID '{}'.", booking_str)?;
            return Ok(Flow::Continue);
        };
        let Some(amount_str) = self.prompt("Enter payment amount: ")? else {
            return Ok(Flow::Exit);
        };
        let amount = match parse_cents(&amount_str) {
            Ok(amount) => amount,
            Err(e) => {
                writeln!(self.output, "Invalid payment amount: {}.", e)?;
                return Ok(Flow::Continue);
            }
        };

        match self.ledger.apply_payment(booking_id, amount) {
            Ok(result) if result.is_complete() => writeln!(
                self.output,
                "Payment completed! Booking is fully paid. Payment ID: {}",
                result.payment.id
            )?,
            Ok(result) => writeln!(
                self.output,
                "Partial payment received. Balance amount to be paid: ${}",
                format_cents(result.balance())
            )?,
            Err(e) if e.is_not_found() => writeln!(
                self.output,
                "Invalid booking ID. Payment cannot be made."
            )?,
            Err(e) => writeln!(self.output, "{}", describe_error(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn check_status(&mut self) -> Result<Flow> {
        let Some(booking_str) = self.prompt("Enter booking ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(booking_id) = booking_str.parse::<BookingId>() else {
            writeln!(self.output, "Invalid booking ID '{}'.", booking_str)?;
            return Ok(Flow::Continue);
        };

        match self.ledger.get_booking_status(booking_id) {
            Ok(booking) => writeln!(
                self.output,
                "Booking ID: {}, Status: {}, Amount Paid: ${}, Total Amount: ${}",
                booking.id,
                booking.status,
                format_cents(booking.amount_paid),
                format_cents(booking.total_amount)
            )?,
            Err(_) => writeln!(self.output, "Invalid booking ID.")?,
        }
        Ok(Flow::Continue)
    }

    fn list_rooms(&mut self) -> Result<Flow> {
        self.print_available_rooms()?;
        Ok(Flow::Continue)
    }

    fn check_integrity(&mut self) -> Result<Flow> {
        let report = self.ledger.check_integrity();
        let stats = self.ledger.stats();

        writeln!(
            self.output,
            "Rooms:       {} ({} available)",
            report.room_count, stats.available_rooms
        )?;
        writeln!(self.output, "Bookings:    {}", report.booking_count)?;
        writeln!(self.output, "Payments:    {}", report.payment_count)?;
        writeln!(self.output, "Owed:        {:>12}", format_cents(report.total_owed))?;
        writeln!(self.output, "Paid:        {:>12}", format_cents(report.total_paid))?;
        writeln!(self.output, "Outstanding: {:>12}", format_cents(report.outstanding()))?;

        if report.is_healthy() {
            writeln!(self.output, "Ledger is consistent.")?;
        } else {
            writeln!(self.output, "Issues found:")?;
            for issue in &report.issues {
                writeln!(self.output, "  - {}", issue)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn parse_date_or_report(&mut self, input: &str) -> Result<Option<NaiveDate>> {
        match parse_date(input) {
            Some(date) => Ok(Some(date)),
            None => {
                writeln!(
                    self.output,
                    "Invalid date '{}'. Use yyyy-mm-dd.",
                    input
                )?;
                Ok(None)
            }
        }
    }
}

/// Parse an ISO `yyyy-mm-dd` date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// User-facing text for a rejected request.
pub fn describe_error(error: &LedgerError) -> String {
    match error {
        LedgerError::RoomNotFound(id) => format!("Room ID {} does not exist.", id),
        LedgerError::RoomUnavailable(id) => format!("Room {} is not available.", id),
        other => format!("{}.", other),
    }
}
