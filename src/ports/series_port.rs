//! Time-series source port trait.

use crate::domain::error::SiftError;
use crate::domain::ohlcv::{Interval, SeriesFetch};

/// Opaque historical-bars source. One call fetches one interval's series plus
/// whatever metadata the source reports for the symbol. Errors are transient
/// from the caller's point of view; the orchestrator owns retry policy.
pub trait TimeSeriesPort {
    fn fetch(
        &self,
        symbol: &str,
        lookback_years: u32,
        interval: Interval,
    ) -> Result<SeriesFetch, SiftError>;
}
