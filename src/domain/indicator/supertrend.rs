//! Ratchet-band trend follower over a rolling true-range volatility measure.
//!
//! The one genuinely iterative indicator: each bar's bands depend on the
//! previous *final* bands and the previous trend, so four pieces of state
//! (upper final, lower final, trend, active band) are carried strictly in
//! chronological order. There is no closed form.

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 10;
pub const DEFAULT_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
struct BandState {
    upper_final: f64,
    lower_final: f64,
    trend_up: bool,
    band: f64,
}

/// Active band value (upper while trending down, lower while trending up) at
/// the final bar. `None` until a bar beyond the first `period` bars exists.
pub fn calculate_supertrend(bars: &[OhlcvBar], period: usize, multiplier: f64) -> Option<f64> {
    band_states(bars, period, multiplier).last().map(|s| s.band)
}

fn band_states(bars: &[OhlcvBar], period: usize, multiplier: f64) -> Vec<BandState> {
    if period == 0 || bars.len() <= period {
        return Vec::new();
    }

    let mut true_ranges = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };
        true_ranges.push(tr);
    }

    let mut states: Vec<BandState> = Vec::with_capacity(bars.len() - period);

    for i in period..bars.len() {
        let volatility: f64 =
            true_ranges[i + 1 - period..=i].iter().sum::<f64>() / period as f64;
        let mid = (bars[i].high + bars[i].low) / 2.0;
        let basic_upper = mid + multiplier * volatility;
        let basic_lower = mid - multiplier * volatility;

        let state = match states.last() {
            None => {
                // Seed bar: no prior state, final bands are the basic bands and
                // the trend is read off close vs the upper band.
                if bars[i].close <= basic_upper {
                    BandState {
                        upper_final: basic_upper,
                        lower_final: basic_lower,
                        trend_up: false,
                        band: basic_upper,
                    }
                } else {
                    BandState {
                        upper_final: basic_upper,
                        lower_final: basic_lower,
                        trend_up: true,
                        band: basic_lower,
                    }
                }
            }
            Some(prev) => {
                // Ratchet: a final band moves toward price only, unless the
                // previous close broke through it, which resets it to basic.
                let upper_final =
                    if basic_upper < prev.upper_final || bars[i - 1].close > prev.upper_final {
                        basic_upper
                    } else {
                        prev.upper_final
                    };
                let lower_final =
                    if basic_lower > prev.lower_final || bars[i - 1].close < prev.lower_final {
                        basic_lower
                    } else {
                        prev.lower_final
                    };

                if prev.trend_up && bars[i].close < lower_final {
                    BandState {
                        upper_final,
                        lower_final,
                        trend_up: false,
                        band: upper_final,
                    }
                } else if !prev.trend_up && bars[i].close > upper_final {
                    BandState {
                        upper_final,
                        lower_final,
                        trend_up: true,
                        band: lower_final,
                    }
                } else {
                    BandState {
                        upper_final,
                        lower_final,
                        trend_up: prev.trend_up,
                        band: prev.band,
                    }
                }
            }
        };

        states.push(state);
    }

    states
}
