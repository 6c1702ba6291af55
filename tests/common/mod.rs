#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tickersift::domain::config_validation::SiftConfig;
use tickersift::domain::error::SiftError;
use tickersift::domain::instrument::InstrumentRecord;
pub use tickersift::domain::ohlcv::{Interval, OhlcvBar, SeriesFetch};
use tickersift::domain::retry::RetryPolicy;
use tickersift::ports::series_port::TimeSeriesPort;

pub struct MockSeriesPort {
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub failing: Vec<String>,
    pub calls: RefCell<HashMap<String, usize>>,
}

impl MockSeriesPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            failing: Vec::new(),
            calls: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }

    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls.borrow().get(symbol).copied().unwrap_or(0)
    }
}

impl TimeSeriesPort for MockSeriesPort {
    fn fetch(
        &self,
        symbol: &str,
        _lookback_years: u32,
        _interval: Interval,
    ) -> Result<SeriesFetch, SiftError> {
        *self
            .calls
            .borrow_mut()
            .entry(symbol.to_string())
            .or_insert(0) += 1;
        if self.failing.iter().any(|s| s == symbol) {
            return Err(SiftError::Fetch {
                symbol: symbol.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(SeriesFetch {
            bars: self.bars.get(symbol).cloned().unwrap_or_default(),
            meta: Default::default(),
        })
    }
}

pub fn make_bars(count: usize, start_close: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = start_close + (i as f64) * 0.5 + ((i % 4) as f64 - 1.5);
            OhlcvBar {
                date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close - 0.25,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 10_000 + (i as i64 % 7) * 500,
            }
        })
        .collect()
}

pub fn instrument(name: &str, symbol: &str) -> InstrumentRecord {
    InstrumentRecord {
        name: name.to_string(),
        symbol: symbol.to_string(),
        alt_symbol: format!("ALT:{symbol}"),
        sector: "Sector".to_string(),
        industry: "Industry".to_string(),
    }
}

pub fn test_config(cache_dir: PathBuf, snapshot_dir: PathBuf) -> SiftConfig {
    SiftConfig {
        ledger_path: PathBuf::from("watchlist.csv"),
        cache_dir,
        snapshot_dir,
        cache_enabled: true,
        cache_max_age_hours: 24,
        cache_keep_days: 7,
        benchmark_symbol: "^BENCH".to_string(),
        daily_history_years: 5,
        weekly_history_years: 5,
        retry: RetryPolicy::new(2, Duration::from_millis(1)),
        fetch_delay: Duration::from_millis(1),
        fetch_timeout: Duration::from_secs(5),
        base_url: None,
    }
}

pub fn nop_sleep(_: Duration) {}
