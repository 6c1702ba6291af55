//! Instrument identity as sourced from the ledger.

use serde::{Deserialize, Serialize};

/// One row of the instrument ledger. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Display name.
    pub name: String,
    /// Symbol used against the time-series source.
    pub symbol: String,
    /// Alternate symbol (charting platform notation).
    pub alt_symbol: String,
    pub sector: String,
    pub industry: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields() {
        let r = InstrumentRecord {
            name: "Acme Industries".into(),
            symbol: "ACME.NS".into(),
            alt_symbol: "NSE:ACME".into(),
            sector: "Industrials".into(),
            industry: "Machinery".into(),
        };
        assert_eq!(r.name, "Acme Industries");
        assert_eq!(r.symbol, "ACME.NS");
        assert_eq!(r.alt_symbol, "NSE:ACME");
    }
}
