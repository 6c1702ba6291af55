//! Price level and range indicators.

use crate::domain::ohlcv::OhlcvBar;
use serde_json::Value;
use std::collections::BTreeMap;

/// Trading days in a 52-week window.
const WEEK_52_BARS: usize = 252;

/// Latest close, the "current price" every other group keys off.
pub fn last_close(bars: &[OhlcvBar]) -> Option<f64> {
    bars.last().map(|b| b.close)
}

/// Percentage change of close over the last `days` bars.
pub fn price_change_pct(bars: &[OhlcvBar], days: usize) -> Option<f64> {
    if bars.len() < days + 1 {
        return None;
    }
    let current = bars[bars.len() - 1].close;
    let past = bars[bars.len() - 1 - days].close;
    if past == 0.0 {
        return None;
    }
    Some((current - past) / past * 100.0)
}

/// Highest high over the trailing 252 bars; shorter series use all bars.
pub fn high_52_week(bars: &[OhlcvBar]) -> Option<f64> {
    window_extreme(bars, WEEK_52_BARS, |b| b.high, f64::max)
}

/// Lowest low over the trailing 252 bars; shorter series use all bars.
pub fn low_52_week(bars: &[OhlcvBar]) -> Option<f64> {
    window_extreme(bars, WEEK_52_BARS, |b| b.low, f64::min)
}

/// Highest high over the full fetched history.
pub fn high_full(bars: &[OhlcvBar]) -> Option<f64> {
    window_extreme(bars, usize::MAX, |b| b.high, f64::max)
}

/// Lowest low over the full fetched history.
pub fn low_full(bars: &[OhlcvBar]) -> Option<f64> {
    window_extreme(bars, usize::MAX, |b| b.low, f64::min)
}

/// Trailing P/E ratio as reported by the source's metadata, when present
/// and finite.
pub fn trailing_pe(meta: &BTreeMap<String, Value>) -> Option<f64> {
    meta.get("trailingPE")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

fn window_extreme(
    bars: &[OhlcvBar],
    window: usize,
    field: impl Fn(&OhlcvBar) -> f64,
    pick: impl Fn(f64, f64) -> f64,
) -> Option<f64> {
    let start = bars.len().saturating_sub(window);
    bars[start..].iter().map(field).reduce(pick)
}
