//! Volume activity indicators.

use crate::domain::ohlcv::OhlcvBar;

/// Day-over-day volume change in percent.
pub fn volume_change_pct(bars: &[OhlcvBar]) -> Option<f64> {
    if bars.len() < 2 {
        return None;
    }
    let current = bars[bars.len() - 1].volume as f64;
    let previous = bars[bars.len() - 2].volume as f64;
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Mean volume over the trailing `recent` bars divided by the mean over the
/// trailing `comparison` bars.
pub fn relative_volume(bars: &[OhlcvBar], recent: usize, comparison: usize) -> Option<f64> {
    if recent == 0 || comparison == 0 || bars.len() < comparison {
        return None;
    }
    let recent_avg = tail_mean(bars, recent);
    let comparison_avg = tail_mean(bars, comparison);
    if comparison_avg == 0.0 {
        return None;
    }
    Some(recent_avg / comparison_avg)
}

fn tail_mean(bars: &[OhlcvBar], window: usize) -> f64 {
    let start = bars.len().saturating_sub(window);
    let tail = &bars[start..];
    tail.iter().map(|b| b.volume as f64).sum::<f64>() / tail.len() as f64
}
