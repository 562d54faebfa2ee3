mod booking;
mod ledger;
mod money;
mod payment;
mod room;

pub use booking::*;
pub use ledger::*;
pub use money::*;
pub use payment::*;
pub use room::*;
