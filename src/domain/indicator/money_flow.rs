//! Money-flow indicators: MFI, Chaikin money flow, buy/sell pressure, VPT.

use crate::domain::ohlcv::OhlcvBar;

pub const MFI_PERIOD: usize = 14;
pub const CMF_PERIOD: usize = 20;
pub const PRESSURE_PERIOD: usize = 10;
pub const VPT_PERIOD: usize = 11;

/// Money Flow Index: volume-weighted RSI variant over typical-price-direction
/// split money flow. Zero negative flow with any positive flow reads 100; a
/// window with no flow either way is absent.
pub fn calculate_mfi(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let mut positive = 0.0;
    let mut negative = 0.0;
    for i in bars.len() - period..bars.len() {
        let tp = bars[i].typical_price();
        let prev_tp = bars[i - 1].typical_price();
        let flow = tp * bars[i].volume as f64;
        if tp > prev_tp {
            positive += flow;
        } else if tp < prev_tp {
            negative += flow;
        }
    }

    if negative == 0.0 {
        if positive == 0.0 {
            None
        } else {
            Some(100.0)
        }
    } else {
        let ratio = positive / negative;
        Some(100.0 - 100.0 / (1.0 + ratio))
    }
}

/// Chaikin Money Flow: sum of close-location-value-weighted volume over sum
/// of volume across the window. A bar with `high == low` contributes a
/// multiplier of 0, not a division by zero.
pub fn calculate_cmf(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let mut flow_volume = 0.0;
    let mut total_volume = 0.0;
    for bar in &bars[bars.len() - period..] {
        let range = bar.high - bar.low;
        let multiplier = if range == 0.0 {
            0.0
        } else {
            ((bar.close - bar.low) - (bar.high - bar.close)) / range
        };
        flow_volume += multiplier * bar.volume as f64;
        total_volume += bar.volume as f64;
    }

    if total_volume == 0.0 {
        return None;
    }
    Some(flow_volume / total_volume)
}

/// Up-day volume over down-day volume within the trailing window. Absent when
/// down-day volume is exactly zero, never reported as infinity.
pub fn pressure_ratio(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let window = &bars[bars.len() - period..];
    let mut buying = 0.0;
    let mut selling = 0.0;
    for i in 1..window.len() {
        let change = window[i].close - window[i - 1].close;
        if change > 0.0 {
            buying += window[i].volume as f64;
        } else if change < 0.0 {
            selling += window[i].volume as f64;
        }
    }

    if selling == 0.0 {
        return None;
    }
    Some(buying / selling)
}

/// Percent change of the cumulative volume-price-trend series against its
/// value `period` bars back. Absent when the baseline is exactly zero.
pub fn vpt_change_pct(bars: &[OhlcvBar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let mut vpt = Vec::with_capacity(bars.len());
    vpt.push(0.0);
    for i in 1..bars.len() {
        let prev_close = bars[i - 1].close;
        let step = if prev_close == 0.0 {
            0.0
        } else {
            (bars[i].close / prev_close - 1.0) * bars[i].volume as f64
        };
        vpt.push(vpt[i - 1] + step);
    }

    let current = vpt[vpt.len() - 1];
    let baseline = vpt[vpt.len() - 1 - period];
    if baseline == 0.0 {
        return None;
    }
    Some((current - baseline) / baseline.abs() * 100.0)
}
