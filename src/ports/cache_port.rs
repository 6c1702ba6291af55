//! Series cache port trait.

use crate::domain::ohlcv::SeriesBundle;
use crate::domain::snapshot::CacheStats;
use chrono::NaiveDate;

/// Per-instrument per-day series cache.
///
/// Contract: `load` treats a missing or malformed entry as a miss (`None`),
/// never as an error, so callers can always fall back to fetching. `save`
/// reports failure as `false` without propagating. A disabled cache turns
/// every operation into a no-op.
pub trait CachePort {
    fn exists(&self, ticker: &str, date: NaiveDate) -> bool;
    fn save(&self, ticker: &str, bundle: &SeriesBundle, date: NaiveDate) -> bool;
    fn load(&self, ticker: &str, date: NaiveDate) -> Option<SeriesBundle>;
    /// Whether today's entry for `ticker` exists and is younger than
    /// `max_age_hours`.
    fn is_valid(&self, ticker: &str, max_age_hours: i64) -> bool;
    /// Delete entries older than `days_to_keep` days; returns how many.
    fn reap(&self, days_to_keep: i64) -> usize;
    fn stats(&self) -> CacheStats;
}
