//! Domain error types.

/// Top-level error type for tickersift.
///
/// Fetch errors are retried; exhausted fetches mark a single instrument and
/// never abort the batch. Config and ledger errors are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    #[error("ledger is missing required columns: {columns}")]
    LedgerColumns { columns: String },

    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("fetch for {symbol} exhausted after {attempts} attempts")]
    FetchExhausted { symbol: String, attempts: u32 },

    #[error("snapshot error: {reason}")]
    Snapshot { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SiftError> for std::process::ExitCode {
    fn from(err: &SiftError) -> Self {
        let code: u8 = match err {
            SiftError::Io(_) => 1,
            SiftError::ConfigParse { .. }
            | SiftError::ConfigMissing { .. }
            | SiftError::ConfigInvalid { .. } => 2,
            SiftError::Ledger { .. } | SiftError::LedgerColumns { .. } => 3,
            SiftError::Fetch { .. } | SiftError::FetchExhausted { .. } => 4,
            SiftError::Snapshot { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
