//! Batch refresh orchestration: cache-or-fetch, retry, failure isolation.

use crate::domain::config_validation::SiftConfig;
use crate::domain::engine;
use crate::domain::error::SiftError;
use crate::domain::ohlcv::{Interval, SeriesBundle};
use crate::domain::instrument::InstrumentRecord;
use crate::domain::report::IndicatorReport;
use chrono::{Local, NaiveDate, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::ports::cache_port::CachePort;
use crate::ports::series_port::TimeSeriesPort;

/// Advisory progress callback: (current index, total, instrument name).
/// Never affects control flow.
pub type ProgressFn<'a> = dyn FnMut(usize, usize, &str) + 'a;

#[derive(Debug)]
pub struct RefreshOutcome {
    pub records: Vec<IndicatorReport>,
    pub failed: usize,
}

struct Resolved {
    bundle: SeriesBundle,
    from_cache: bool,
}

/// One refresh pass over the ledger. Stateless per invocation: all state
/// lives in the cache and in the returned batch.
pub struct Screener<'a> {
    series: &'a dyn TimeSeriesPort,
    cache: &'a dyn CachePort,
    config: &'a SiftConfig,
    sleep: fn(Duration),
}

impl<'a> Screener<'a> {
    pub fn new(
        series: &'a dyn TimeSeriesPort,
        cache: &'a dyn CachePort,
        config: &'a SiftConfig,
    ) -> Self {
        Self {
            series,
            cache,
            config,
            sleep: std::thread::sleep,
        }
    }

    /// Replace the sleeper, for tests that should not actually wait.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Process every instrument in ledger order, one at a time. Always
    /// returns one record per instrument; instruments whose data cannot be
    /// resolved are marked failed, never dropped.
    pub fn refresh(
        &self,
        ledger: &[InstrumentRecord],
        mut progress: Option<&mut ProgressFn<'_>>,
    ) -> RefreshOutcome {
        let today = Local::now().date_naive();
        let total = ledger.len();
        info!(total, "starting refresh pass");

        // The benchmark is resolved once and shared by every instrument,
        // keeping the pass at O(instruments + 1) network calls.
        let benchmark = match self.resolve(&self.config.benchmark_symbol, today) {
            Ok(resolved) => Some(resolved.bundle),
            Err(e) => {
                warn!(
                    symbol = %self.config.benchmark_symbol,
                    error = %e,
                    "benchmark unavailable, relative strength will be absent"
                );
                None
            }
        };
        let benchmark_daily = benchmark.as_ref().map(|b| b.daily.as_slice());

        let mut records = Vec::with_capacity(total);
        let mut failed = 0;

        for (index, instrument) in ledger.iter().enumerate() {
            let now = Utc::now();
            debug!(symbol = %instrument.symbol, "processing {}", instrument.name);

            let hit_network = match self.resolve(&instrument.symbol, today) {
                Ok(resolved) => {
                    records.push(engine::compute_report(
                        instrument,
                        &resolved.bundle,
                        benchmark_daily,
                        now,
                    ));
                    !resolved.from_cache
                }
                Err(e) => {
                    error!(symbol = %instrument.symbol, error = %e, "instrument failed");
                    records.push(IndicatorReport::failure_marker(instrument, now));
                    failed += 1;
                    true
                }
            };

            if let Some(cb) = progress.as_mut() {
                cb(index + 1, total, &instrument.name);
            }

            // Rate-limit pause only when the source was actually touched.
            if hit_network && index + 1 < total {
                (self.sleep)(self.config.fetch_delay);
            }
        }

        info!(
            successful = total - failed,
            failed, "refresh pass complete"
        );
        RefreshOutcome { records, failed }
    }

    fn resolve(&self, symbol: &str, date: NaiveDate) -> Result<Resolved, SiftError> {
        if let Some(bundle) = self.cache.load(symbol, date) {
            debug!(symbol, "cache hit");
            return Ok(Resolved {
                bundle,
                from_cache: true,
            });
        }

        let bundle = self.fetch_with_retry(symbol)?;
        if !self.cache.save(symbol, &bundle, date) {
            debug!(symbol, "cache save skipped");
        }
        Ok(Resolved {
            bundle,
            from_cache: false,
        })
    }

    fn fetch_with_retry(&self, symbol: &str) -> Result<SeriesBundle, SiftError> {
        let policy = self.config.retry;

        for attempt in 0..policy.max_attempts {
            if attempt > 0 {
                (self.sleep)(policy.delay_for(attempt - 1));
            }

            match self.fetch_bundle(symbol) {
                Ok(bundle) => {
                    info!(
                        symbol,
                        daily = bundle.daily.len(),
                        weekly = bundle.weekly.len(),
                        "fetched"
                    );
                    return Ok(bundle);
                }
                Err(e) => {
                    warn!(
                        symbol,
                        attempt = attempt + 1,
                        max = policy.max_attempts,
                        error = %e,
                        "fetch attempt failed"
                    );
                }
            }
        }

        Err(SiftError::FetchExhausted {
            symbol: symbol.to_string(),
            attempts: policy.max_attempts,
        })
    }

    /// One fetch attempt: daily series (required, non-empty), then weekly.
    fn fetch_bundle(&self, symbol: &str) -> Result<SeriesBundle, SiftError> {
        let daily = self
            .series
            .fetch(symbol, self.config.daily_history_years, Interval::Daily)?;
        if daily.bars.is_empty() {
            return Err(SiftError::Fetch {
                symbol: symbol.to_string(),
                reason: "no daily bars returned".to_string(),
            });
        }
        let weekly = self
            .series
            .fetch(symbol, self.config.weekly_history_years, Interval::Weekly)?;

        Ok(SeriesBundle {
            symbol: symbol.to_string(),
            fetched_at: Utc::now(),
            daily: daily.bars,
            weekly: weekly.bars,
            meta: daily.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::{OhlcvBar, SeriesFetch};
    use crate::domain::retry::RetryPolicy;
    use crate::domain::snapshot::CacheStats;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn nop_sleep(_: Duration) {}

    fn test_config() -> SiftConfig {
        SiftConfig {
            ledger_path: PathBuf::from("watchlist.csv"),
            cache_dir: PathBuf::from("cache"),
            snapshot_dir: PathBuf::from("processed"),
            cache_enabled: true,
            cache_max_age_hours: 24,
            cache_keep_days: 7,
            benchmark_symbol: "^BENCH".to_string(),
            daily_history_years: 5,
            weekly_history_years: 5,
            retry: RetryPolicy::new(3, Duration::from_millis(1)),
            fetch_delay: Duration::from_millis(1),
            fetch_timeout: Duration::from_secs(30),
            base_url: None,
        }
    }

    fn make_bars(count: usize) -> Vec<OhlcvBar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + (i % 5) as f64;
                OhlcvBar {
                    date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    struct MockSeriesPort {
        bars: HashMap<String, Vec<OhlcvBar>>,
        failing: Vec<String>,
        calls: RefCell<HashMap<String, usize>>,
    }

    impl MockSeriesPort {
        fn new() -> Self {
            Self {
                bars: HashMap::new(),
                failing: Vec::new(),
                calls: RefCell::new(HashMap::new()),
            }
        }

        fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
            self.bars.insert(symbol.to_string(), bars);
            self
        }

        fn with_failure(mut self, symbol: &str) -> Self {
            self.failing.push(symbol.to_string());
            self
        }

        fn calls_for(&self, symbol: &str) -> usize {
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
            *self.calls.borrow_mut().entry(symbol.to_string()).or_insert(0) += 1;
            if self.failing.iter().any(|s| s == symbol) {
                return Err(SiftError::Fetch {
                    symbol: symbol.to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(SeriesFetch {
                bars: self.bars.get(symbol).cloned().unwrap_or_default(),
                meta: Default::default(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: RefCell<HashMap<(String, NaiveDate), SeriesBundle>>,
        saves: RefCell<usize>,
    }

    impl CachePort for MemoryCache {
        fn exists(&self, ticker: &str, date: NaiveDate) -> bool {
            self.entries
                .borrow()
                .contains_key(&(ticker.to_string(), date))
        }

        fn save(&self, ticker: &str, bundle: &SeriesBundle, date: NaiveDate) -> bool {
            *self.saves.borrow_mut() += 1;
            self.entries
                .borrow_mut()
                .insert((ticker.to_string(), date), bundle.clone());
            true
        }

        fn load(&self, ticker: &str, date: NaiveDate) -> Option<SeriesBundle> {
            self.entries
                .borrow()
                .get(&(ticker.to_string(), date))
                .cloned()
        }

        fn is_valid(&self, ticker: &str, _max_age_hours: i64) -> bool {
            self.exists(ticker, Local::now().date_naive())
        }

        fn reap(&self, _days_to_keep: i64) -> usize {
            0
        }

        fn stats(&self) -> CacheStats {
            CacheStats {
                files: self.entries.borrow().len(),
                ..Default::default()
            }
        }
    }

    fn instrument(name: &str, symbol: &str) -> InstrumentRecord {
        InstrumentRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            alt_symbol: format!("ALT:{name}"),
            sector: "Sector".to_string(),
            industry: "Industry".to_string(),
        }
    }

    #[test]
    fn empty_ledger_is_empty_outcome() {
        let series = MockSeriesPort::new().with_bars("^BENCH", make_bars(40));
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let outcome = screener.refresh(&[], None);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn failing_instrument_is_marked_and_batch_continues() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_bars("AAA", make_bars(40))
            .with_failure("BBB")
            .with_bars("CCC", make_bars(40));
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let ledger = vec![
            instrument("Alpha", "AAA"),
            instrument("Beta", "BBB"),
            instrument("Gamma", "CCC"),
        ];
        let outcome = screener.refresh(&ledger, None);

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.records[0].name, "Alpha");
        assert!(!outcome.records[0].failed);
        assert!(outcome.records[0].price.is_some());
        assert!(outcome.records[1].failed);
        assert_eq!(outcome.records[1].price, None);
        assert!(!outcome.records[2].failed);
        assert!(outcome.records[2].price.is_some());
    }

    #[test]
    fn benchmark_is_fetched_once_per_pass() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_bars("AAA", make_bars(40))
            .with_bars("CCC", make_bars(40));
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let ledger = vec![instrument("Alpha", "AAA"), instrument("Gamma", "CCC")];
        screener.refresh(&ledger, None);

        // One attempt, two intervals.
        assert_eq!(series.calls_for("^BENCH"), 2);
    }

    #[test]
    fn cache_hit_skips_the_network() {
        let series = MockSeriesPort::new().with_bars("^BENCH", make_bars(40));
        let cache = MemoryCache::default();
        let today = Local::now().date_naive();
        let bundle = SeriesBundle {
            symbol: "AAA".to_string(),
            fetched_at: Utc::now(),
            daily: make_bars(40),
            weekly: make_bars(10),
            meta: Default::default(),
        };
        cache.save("AAA", &bundle, today);

        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);
        let outcome = screener.refresh(&[instrument("Alpha", "AAA")], None);

        assert_eq!(series.calls_for("AAA"), 0);
        assert!(!outcome.records[0].failed);
    }

    #[test]
    fn successful_fetch_is_cached() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_bars("AAA", make_bars(40));
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        screener.refresh(&[instrument("Alpha", "AAA")], None);

        let today = Local::now().date_naive();
        assert!(cache.exists("AAA", today));
        assert!(cache.exists("^BENCH", today));
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_failure("BBB");
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        screener.refresh(&[instrument("Beta", "BBB")], None);

        let today = Local::now().date_naive();
        assert!(!cache.exists("BBB", today));
    }

    #[test]
    fn retries_are_bounded_by_policy() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_failure("BBB");
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        screener.refresh(&[instrument("Beta", "BBB")], None);

        // Daily fetch fails on every attempt; weekly is never reached.
        assert_eq!(series.calls_for("BBB"), config.retry.max_attempts as usize);
    }

    #[test]
    fn empty_daily_series_counts_as_failed_attempt() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_bars("EMPTY", vec![]);
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let outcome = screener.refresh(&[instrument("Empty", "EMPTY")], None);
        assert!(outcome.records[0].failed);
        assert_eq!(series.calls_for("EMPTY"), config.retry.max_attempts as usize);
    }

    #[test]
    fn progress_callback_sees_every_instrument() {
        let series = MockSeriesPort::new()
            .with_bars("^BENCH", make_bars(40))
            .with_bars("AAA", make_bars(40))
            .with_failure("BBB");
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let mut seen: Vec<(usize, usize, String)> = Vec::new();
        let mut cb = |current: usize, total: usize, name: &str| {
            seen.push((current, total, name.to_string()));
        };
        let ledger = vec![instrument("Alpha", "AAA"), instrument("Beta", "BBB")];
        screener.refresh(&ledger, Some(&mut cb));

        assert_eq!(
            seen,
            vec![
                (1, 2, "Alpha".to_string()),
                (2, 2, "Beta".to_string()),
            ]
        );
    }

    #[test]
    fn missing_benchmark_degrades_strength_only() {
        let series = MockSeriesPort::new()
            .with_failure("^BENCH")
            .with_bars("AAA", make_bars(100));
        let cache = MemoryCache::default();
        let config = test_config();
        let screener = Screener::new(&series, &cache, &config).with_sleep(nop_sleep);

        let outcome = screener.refresh(&[instrument("Alpha", "AAA")], None);
        let record = &outcome.records[0];
        assert!(!record.failed);
        assert!(record.rsi_daily.is_some());
        assert_eq!(record.rel_strength_18d, None);
    }
}
