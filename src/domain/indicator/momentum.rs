//! Momentum indicators: rolling-mean RSI, MACD, and the MACD crossover state.

use crate::domain::ohlcv::OhlcvBar;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// MACD vs signal classification. A one-step edge detector: only the current
/// and immediately preceding bar are examined, so `Buy`/`Sell` fire exactly at
/// a sign flip of (MACD − signal) and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MacdCross {
    Buy,
    Sell,
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for MacdCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MacdCross::Buy => "BUY",
            MacdCross::Sell => "SELL",
            MacdCross::Bullish => "BULLISH",
            MacdCross::Bearish => "BEARISH",
            MacdCross::Neutral => "NEUTRAL",
        };
        write!(f, "{label}")
    }
}

/// RSI over the trailing `period` close-to-close changes: rolling mean of
/// gains over rolling mean of losses. Zero losses with any gain reads 100;
/// a fully flat window has no direction and is absent.
pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in bars.len() - period..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            None
        } else {
            Some(100.0)
        }
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

/// MACD line and signal line at the final bar.
pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<(f64, f64)> {
    let (macd_line, signal_line) = macd_lines(bars, fast, slow, signal)?;
    Some((*macd_line.last()?, *signal_line.last()?))
}

/// Crossover classification of the final bar against its predecessor.
pub fn macd_crossover(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<MacdCross> {
    if bars.len() < slow + signal + 1 {
        return None;
    }
    let (macd_line, signal_line) = macd_lines(bars, fast, slow, signal)?;
    let n = macd_line.len();
    let diff = macd_line[n - 1] - signal_line[n - 1];
    let prev_diff = macd_line[n - 2] - signal_line[n - 2];
    Some(classify_crossover(prev_diff, diff))
}

fn classify_crossover(prev_diff: f64, diff: f64) -> MacdCross {
    if prev_diff <= 0.0 && diff > 0.0 {
        MacdCross::Buy
    } else if prev_diff >= 0.0 && diff < 0.0 {
        MacdCross::Sell
    } else if diff > 0.0 {
        MacdCross::Bullish
    } else if diff < 0.0 {
        MacdCross::Bearish
    } else {
        MacdCross::Neutral
    }
}

fn macd_lines(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<(Vec<f64>, Vec<f64>)> {
    if fast == 0 || slow == 0 || signal == 0 || bars.len() < slow + signal {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema(&closes, fast);
    let ema_slow = ema(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);

    Some((macd_line, signal_line))
}

/// Exponential moving average seeded with the first value:
/// `k = 2/(n+1)`, `ema[0] = x[0]`, `ema[i] = x[i]*k + ema[i-1]*(1-k)`.
fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    out.push(current);
    for &v in &values[1..] {
        current = v * k + current * (1.0 - k);
        out.push(current);
    }
    out
}
