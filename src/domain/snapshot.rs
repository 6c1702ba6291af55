//! Result snapshots and the shared current-snapshot holder.

use crate::domain::report::IndicatorReport;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// One completed batch: ordered records plus the generation timestamp.
/// Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<IndicatorReport>,
}

impl ResultSnapshot {
    pub fn new(generated_at: DateTime<Utc>, records: Vec<IndicatorReport>) -> Self {
        Self {
            generated_at,
            records,
        }
    }

    /// Storage key: generation timestamp at second resolution.
    pub fn key(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }

    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.failed).count()
    }

    /// Copy with every non-finite numeric rewritten to `None`.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        for record in &mut out.records {
            record.sanitize();
        }
        out
    }
}

/// Cache directory statistics surfaced by `status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub files: usize,
    pub total_bytes: u64,
    pub oldest: Option<NaiveDate>,
    pub newest: Option<NaiveDate>,
}

/// Status summary exposed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiftStatus {
    pub loaded: bool,
    pub count: usize,
    pub last_update: Option<DateTime<Utc>>,
    pub cache: CacheStats,
}

/// Holder for the latest completed snapshot.
///
/// Created empty, replaced wholesale after each successful refresh, readable
/// by concurrent readers. The orchestrator itself never touches this; the
/// caller decides when a batch becomes current.
#[derive(Debug, Default)]
pub struct CurrentSnapshot {
    inner: RwLock<Option<ResultSnapshot>>,
}

impl CurrentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly generated snapshot.
    pub fn replace(&self, snapshot: ResultSnapshot) {
        *self.inner.write().expect("snapshot lock poisoned") = Some(snapshot);
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.read().expect("snapshot lock poisoned").is_some()
    }

    /// Read the current snapshot under the lock.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&ResultSnapshot>) -> R) -> R {
        let guard = self.inner.read().expect("snapshot lock poisoned");
        f(guard.as_ref())
    }

    pub fn status(&self, cache: CacheStats) -> SiftStatus {
        self.with_current(|snapshot| SiftStatus {
            loaded: snapshot.is_some(),
            count: snapshot.map_or(0, |s| s.records.len()),
            last_update: snapshot.map(|s| s.generated_at),
            cache,
        })
    }
}
