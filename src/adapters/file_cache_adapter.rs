//! JSON-file series cache adapter.
//!
//! One file per (ticker, calendar day): `{sanitized}_{YYYY-MM-DD}.json`.
//! Same-day addressing is idempotent and the key rolls over naturally at
//! midnight. Entry age for validity and reaping is the file mtime.

use crate::domain::ohlcv::SeriesBundle;
use crate::domain::snapshot::CacheStats;
use crate::ports::cache_port::CachePort;
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, error, info};

pub struct FileCacheAdapter {
    dir: PathBuf,
    enabled: bool,
}

impl FileCacheAdapter {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, enabled: true })
    }

    /// Cache that ignores every operation.
    pub fn disabled() -> Self {
        Self {
            dir: PathBuf::new(),
            enabled: false,
        }
    }

    fn entry_path(&self, ticker: &str, date: NaiveDate) -> PathBuf {
        let filename = format!("{}_{}.json", sanitize_symbol(ticker), date.format("%Y-%m-%d"));
        self.dir.join(filename)
    }

    fn entry_mtime(path: &PathBuf) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// Make a symbol safe for use in a filename.
pub fn sanitize_symbol(symbol: &str) -> String {
    symbol.replace([':', '/'], "_")
}

impl CachePort for FileCacheAdapter {
    fn exists(&self, ticker: &str, date: NaiveDate) -> bool {
        self.enabled && self.entry_path(ticker, date).exists()
    }

    fn save(&self, ticker: &str, bundle: &SeriesBundle, date: NaiveDate) -> bool {
        if !self.enabled {
            debug!(ticker, "cache disabled, skipping save");
            return false;
        }

        let path = self.entry_path(ticker, date);
        let json = match serde_json::to_string_pretty(bundle) {
            Ok(json) => json,
            Err(e) => {
                error!(ticker, error = %e, "failed to serialize cache entry");
                return false;
            }
        };
        match fs::write(&path, json) {
            Ok(()) => {
                info!(ticker, path = %path.display(), "cached");
                true
            }
            Err(e) => {
                error!(ticker, error = %e, "failed to write cache entry");
                false
            }
        }
    }

    fn load(&self, ticker: &str, date: NaiveDate) -> Option<SeriesBundle> {
        if !self.enabled {
            return None;
        }

        let path = self.entry_path(ticker, date);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(bundle) => {
                info!(ticker, "loaded from cache");
                Some(bundle)
            }
            Err(e) => {
                // Corruption is contractually a miss, so the caller refetches.
                debug!(ticker, error = %e, "malformed cache entry treated as miss");
                None
            }
        }
    }

    fn is_valid(&self, ticker: &str, max_age_hours: i64) -> bool {
        if !self.enabled {
            return false;
        }

        let path = self.entry_path(ticker, Local::now().date_naive());
        let Some(mtime) = Self::entry_mtime(&path) else {
            return false;
        };
        match mtime.elapsed() {
            Ok(age) => (age.as_secs() as i64) < max_age_hours * 3600,
            Err(_) => true,
        }
    }

    fn reap(&self, days_to_keep: i64) -> usize {
        if !self.enabled {
            return 0;
        }

        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };
        let max_age_secs = days_to_keep as u64 * 86_400;
        let mut deleted = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(mtime) = Self::entry_mtime(&path) else {
                continue;
            };
            let expired = mtime
                .elapsed()
                .map(|age| age.as_secs() >= max_age_secs)
                .unwrap_or(false);
            if expired && fs::remove_file(&path).is_ok() {
                debug!(path = %path.display(), "reaped cache entry");
                deleted += 1;
            }
        }

        if deleted > 0 {
            info!(deleted, "cache cleanup complete");
        }
        deleted
    }

    fn stats(&self) -> CacheStats {
        if !self.enabled {
            return CacheStats::default();
        }

        let Ok(entries) = fs::read_dir(&self.dir) else {
            return CacheStats::default();
        };

        let mut stats = CacheStats::default();
        let mut oldest: Option<SystemTime> = None;
        let mut newest: Option<SystemTime> = None;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(meta) = fs::metadata(&path) else {
                continue;
            };
            stats.files += 1;
            stats.total_bytes += meta.len();
            if let Ok(mtime) = meta.modified() {
                if oldest.is_none_or(|t| mtime < t) {
                    oldest = Some(mtime);
                }
                if newest.is_none_or(|t| mtime > t) {
                    newest = Some(mtime);
                }
            }
        }

        stats.oldest = oldest.map(|t| DateTime::<Local>::from(t).date_naive());
        stats.newest = newest.map(|t| DateTime::<Local>::from(t).date_naive());
        stats
    }
}
