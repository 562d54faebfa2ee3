use anyhow::Result;
use std::io::Read;

use tracing::debug;

use crate::application::ReservationLedger;
use crate::domain::{Room, RoomId, parse_cents};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "line {} ({}): {}", self.line, field, self.error),
            None => write!(f, "line {}: {}", self.line, self.error),
        }
    }
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Leave out rows whose room id is already in the ledger
    pub skip_duplicates: bool,
}

/// Importer for loading rooms into the ledger
pub struct Importer<'a> {
    ledger: &'a mut ReservationLedger,
}

impl<'a> Importer<'a> {
    pub fn new(ledger: &'a mut ReservationLedger) -> Self {
        Self { ledger }
    }

    /// Import rooms from CSV with the header `id,type,price[,available]`.
    ///
    /// Price is a decimal amount ("100" or "100.00"). A missing or empty
    /// `available` column means the room can be booked. Rows that fail to
    /// parse are reported and skipped; the rest are still added.
    pub fn import_rooms_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut result = ImportResult::default();

        for (line_num, record) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let room = match parse_room_record(&record, line) {
                Ok(room) => room,
                Err(e) => {
                    result.errors.push(e);
                    continue;
                }
            };

            if options.skip_duplicates && self.ledger.find_room(room.id).is_some() {
                debug!(room_id = room.id, line, "skipping duplicate room");
                result.skipped += 1;
                continue;
            }

            self.ledger.add_room(room);
            result.imported += 1;
        }

        Ok(result)
    }
}

fn parse_room_record(record: &csv::StringRecord, line: usize) -> Result<Room, ImportError> {
    let field_error = |field: &str, error: String| ImportError {
        line,
        field: Some(field.to_string()),
        error,
    };

    let id_str = record.get(0).unwrap_or("");
    let room_type = record.get(1).unwrap_or("");
    let price_str = record.get(2).unwrap_or("");
    let available_str = record.get(3).unwrap_or("");

    let id: RoomId = id_str
        .parse()
        .map_err(|_| field_error("id", format!("Invalid room id '{}'", id_str)))?;

    if room_type.is_empty() {
        return Err(field_error("type", "Room type is required".to_string()));
    }

    let price_cents = parse_cents(price_str)
        .map_err(|e| field_error("price", format!("Invalid price: {}", e)))?;
    if price_cents < 0 {
        return Err(field_error(
            "price",
            format!("Price cannot be negative: {}", price_str),
        ));
    }

    let available = parse_available(available_str).ok_or_else(|| {
        field_error(
            "available",
            format!("Expected true/false, got '{}'", available_str),
        )
    })?;

    Ok(Room::new(id, room_type, price_cents).with_availability(available))
}

fn parse_available(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "" | "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
