//! Instrument ledger port trait.

use crate::domain::error::SiftError;
use crate::domain::instrument::InstrumentRecord;

/// Ordered, pre-validated list of instruments to screen.
pub trait LedgerPort {
    fn read_ledger(&self) -> Result<Vec<InstrumentRecord>, SiftError>;
}
