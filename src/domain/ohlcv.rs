//! OHLCV bar and fetched-series payload types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Bar granularity requested from the time-series source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Daily,
    Weekly,
}

impl Interval {
    pub fn wire_code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
        }
    }
}

/// One interval's fetch result: bars plus whatever metadata the source returned.
#[derive(Debug, Clone)]
pub struct SeriesFetch {
    pub bars: Vec<OhlcvBar>,
    pub meta: BTreeMap<String, serde_json::Value>,
}

/// The unit of caching and of indicator computation: daily + weekly series
/// for one symbol, with source metadata and the fetch timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesBundle {
    pub symbol: String,
    pub fetched_at: DateTime<Utc>,
    pub daily: Vec<OhlcvBar>,
    pub weekly: Vec<OhlcvBar>,
    pub meta: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        // high-low=20, |high-100|=10, |low-100|=10 → 20
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        // high-low=20, |110-130|=20, |90-130|=40 → 40
        assert!((bar.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn interval_wire_codes() {
        assert_eq!(Interval::Daily.wire_code(), "1d");
        assert_eq!(Interval::Weekly.wire_code(), "1wk");
    }

    #[test]
    fn bundle_serde_round_trip() {
        let bundle = SeriesBundle {
            symbol: "ACME.NS".into(),
            fetched_at: Utc::now(),
            daily: vec![sample_bar()],
            weekly: vec![],
            meta: BTreeMap::from([("sector".to_string(), serde_json::json!("Energy"))]),
        };

        let json = serde_json::to_string(&bundle).unwrap();
        let back: SeriesBundle = serde_json::from_str(&json).unwrap();

        assert_eq!(back.symbol, "ACME.NS");
        assert_eq!(back.daily.len(), 1);
        assert!((back.daily[0].close - 105.0).abs() < f64::EPSILON);
        assert_eq!(back.daily[0].volume, 50_000);
        assert_eq!(back.meta["sector"], serde_json::json!("Energy"));
    }
}
