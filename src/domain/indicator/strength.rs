//! Relative strength of an instrument against the benchmark index.

use crate::domain::ohlcv::OhlcvBar;

/// `(instrument return / benchmark return)` over the trailing `days` bars,
/// each return being `close_now / close_past - 1`. Absent when either series
/// is too short, a past close is zero, or the benchmark return is exactly
/// zero.
pub fn relative_strength(
    bars: &[OhlcvBar],
    benchmark: &[OhlcvBar],
    days: usize,
) -> Option<f64> {
    if days == 0 || bars.len() < days + 1 || benchmark.len() < days + 1 {
        return None;
    }

    let current = bars[bars.len() - 1].close;
    let past = bars[bars.len() - 1 - days].close;
    let bench_current = benchmark[benchmark.len() - 1].close;
    let bench_past = benchmark[benchmark.len() - 1 - days].close;

    if past == 0.0 || bench_past == 0.0 {
        return None;
    }

    let stock_return = current / past - 1.0;
    let bench_return = bench_current / bench_past - 1.0;
    if bench_return == 0.0 {
        return None;
    }

    Some(stock_return / bench_return)
}
