//! CSV instrument ledger adapter.

use crate::domain::error::SiftError;
use crate::domain::instrument::InstrumentRecord;
use crate::ports::ledger_port::LedgerPort;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["Name", "Symbol", "AltSymbol"];

pub struct CsvLedgerAdapter {
    path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn read_ledger(&self) -> Result<Vec<InstrumentRecord>, SiftError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SiftError::Ledger {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        parse_ledger(&content)
    }
}

pub fn parse_ledger(content: &str) -> Result<Vec<InstrumentRecord>, SiftError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| SiftError::Ledger {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| column(c).is_none())
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(SiftError::LedgerColumns {
            columns: missing.join(", "),
        });
    }

    let name_idx = column("Name").unwrap();
    let symbol_idx = column("Symbol").unwrap();
    let alt_idx = column("AltSymbol").unwrap();
    let sector_idx = column("Sector");
    let industry_idx = column("Industry");

    let mut instruments = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| SiftError::Ledger {
            reason: format!("CSV parse error: {}", e),
        })?;

        let name = record.get(name_idx).unwrap_or("").trim();
        let symbol = record.get(symbol_idx).unwrap_or("").trim();
        let alt_symbol = record.get(alt_idx).unwrap_or("").trim();

        // Rows missing any identity field are unusable; skip them rather
        // than failing the whole ledger.
        if name.is_empty() || symbol.is_empty() || alt_symbol.is_empty() {
            warn!(row = ?record, "skipping ledger row with missing identity");
            continue;
        }

        let field_or_unknown = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
                .to_string()
        };

        instruments.push(InstrumentRecord {
            name: name.to_string(),
            symbol: symbol.to_uppercase(),
            alt_symbol: alt_symbol.to_string(),
            sector: field_or_unknown(sector_idx),
            industry: field_or_unknown(industry_idx),
        });
    }

    info!(count = instruments.len(), "ledger loaded");
    Ok(instruments)
}
