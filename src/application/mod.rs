// Application layer: the reservation ledger and its error types.
// Front-ends (the interactive shell, import/export) go through
// ReservationLedger and never touch the repository directly.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
