//! Moving-average trend indicators and the golden/death cross state.

use crate::domain::ohlcv::OhlcvBar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative SMA50/SMA200 gap (percent) below which the pair is treated as
/// still crossing rather than resolved either way.
const CROSS_DEAD_ZONE_PCT: f64 = 0.5;

/// SMA50 vs SMA200 relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossState {
    #[serde(rename = "GC")]
    Golden,
    #[serde(rename = "DC")]
    Death,
    Crossing,
}

impl fmt::Display for CrossState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossState::Golden => write!(f, "GC"),
            CrossState::Death => write!(f, "DC"),
            CrossState::Crossing => write!(f, "Crossing"),
        }
    }
}

/// Simple moving average of close over the trailing `period` bars.
pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let sum: f64 = bars[bars.len() - period..].iter().map(|b| b.close).sum();
    Some(sum / period as f64)
}

/// Percentage distance of price from a moving average, relative to price.
pub fn sma_distance_pct(price: f64, sma: f64) -> Option<f64> {
    if price == 0.0 {
        return None;
    }
    Some((price - sma) / price * 100.0)
}

/// Golden/death cross of SMA50 vs SMA200, with a dead-zone around the cross
/// itself so the state does not flip-flop while the averages touch.
pub fn golden_death_cross(bars: &[OhlcvBar]) -> Option<CrossState> {
    if bars.len() < 200 {
        return None;
    }
    let sma_50 = calculate_sma(bars, 50)?;
    let sma_200 = calculate_sma(bars, 200)?;
    if sma_200 == 0.0 {
        return None;
    }

    let diff_pct = (sma_50 - sma_200).abs() / sma_200 * 100.0;
    if diff_pct < CROSS_DEAD_ZONE_PCT {
        Some(CrossState::Crossing)
    } else if sma_50 > sma_200 {
        Some(CrossState::Golden)
    } else {
        Some(CrossState::Death)
    }
}
