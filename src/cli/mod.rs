mod shell;

pub use shell::*;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::application::ReservationLedger;
use crate::io::{Exporter, ImportOptions, Importer};

/// Innkeep - Hotel Booking Ledger
#[derive(Parser, Debug)]
#[command(name = "innkeep")]
#[command(about = "An interactive in-memory ledger for hotel rooms, bookings and payments")]
#[command(version)]
pub struct Cli {
    /// Rooms CSV to start with (header: id,type,price[,available]).
    /// Without it the ledger starts with a Single, a Double and a Suite.
    #[arg(short, long)]
    pub rooms: Option<PathBuf>,

    /// Skip rooms whose id is already in the ledger when loading --rooms
    #[arg(long)]
    pub skip_duplicates: bool,

    /// Write the ledger to this file when the session ends
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Export format: json (full snapshot), csv (bookings), rooms-csv or payments-csv
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    /// Bookings only
    Csv,
    RoomsCsv,
    PaymentsCsv,
}

impl Cli {
    /// Build the ledger, run the interactive session on stdin/stdout, then export if asked.
    pub fn run(self) -> Result<()> {
        let mut ledger = self.build_ledger()?;

        {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut shell = Shell::new(&mut ledger, stdin.lock(), stdout.lock());
            shell.run()?;
        }

        if let Some(path) = &self.export {
            export_ledger(&ledger, path, self.format)?;
        }

        Ok(())
    }

    fn build_ledger(&self) -> Result<ReservationLedger> {
        let Some(path) = &self.rooms else {
            return Ok(ReservationLedger::with_default_rooms());
        };

        let file = File::open(path)
            .with_context(|| format!("Failed to open rooms file: {}", path.display()))?;

        let mut ledger = ReservationLedger::new();
        let result = Importer::new(&mut ledger).import_rooms_csv(
            BufReader::new(file),
            ImportOptions {
                skip_duplicates: self.skip_duplicates,
            },
        )?;

        for error in &result.errors {
            eprintln!("Skipped {}", error);
        }
        info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            "rooms loaded"
        );

        if result.imported == 0 {
            anyhow::bail!("No rooms could be loaded from {}", path.display());
        }

        Ok(ledger)
    }
}

/// Write the ledger to `path` in the requested format.
pub fn export_ledger(ledger: &ReservationLedger, path: &Path, format: ExportFormat) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let exporter = Exporter::new(ledger);

    match format {
        ExportFormat::Json => {
            let snapshot = exporter.export_full_json(&mut file)?;
            eprintln!(
                "Exported ledger: {} rooms, {} bookings, {} payments",
                snapshot.rooms.len(),
                snapshot.bookings.len(),
                snapshot.payments.len()
            );
        }
        ExportFormat::Csv => {
            let count = exporter.export_bookings_csv(&mut file)?;
            eprintln!("Exported {} bookings", count);
        }
        ExportFormat::RoomsCsv => {
            let count = exporter.export_rooms_csv(&mut file)?;
            eprintln!("Exported {} rooms", count);
        }
        ExportFormat::PaymentsCsv => {
            let count = exporter.export_payments_csv(&mut file)?;
            eprintln!("Exported {} payments", count);
        }
    }

    file.flush()?;
    Ok(())
}
