//! Pure assembly of a full indicator report from fetched series.

use crate::domain::indicator::momentum::{
    calculate_macd, calculate_rsi, macd_crossover, MACD_FAST, MACD_SIGNAL, MACD_SLOW, RSI_PERIOD,
};
use crate::domain::indicator::money_flow::{
    calculate_cmf, calculate_mfi, pressure_ratio, vpt_change_pct, CMF_PERIOD, MFI_PERIOD,
    PRESSURE_PERIOD, VPT_PERIOD,
};
use crate::domain::indicator::price;
use crate::domain::indicator::strength::relative_strength;
use crate::domain::indicator::supertrend::{
    calculate_supertrend, DEFAULT_MULTIPLIER, DEFAULT_PERIOD,
};
use crate::domain::indicator::trend::{calculate_sma, golden_death_cross, sma_distance_pct};
use crate::domain::indicator::volume::{relative_volume, volume_change_pct};
use crate::domain::instrument::InstrumentRecord;
use crate::domain::ohlcv::{OhlcvBar, SeriesBundle};
use crate::domain::report::IndicatorReport;
use chrono::{DateTime, Utc};

/// Compute every indicator group for one instrument. Pure: no IO, no clock,
/// no failure path; anything uncomputable is `None` in the result.
pub fn compute_report(
    instrument: &InstrumentRecord,
    bundle: &SeriesBundle,
    benchmark: Option<&[OhlcvBar]>,
    now: DateTime<Utc>,
) -> IndicatorReport {
    let daily = &bundle.daily;
    let weekly = &bundle.weekly;
    let mut report = IndicatorReport::empty(instrument, now);

    // Price
    let current_price = price::last_close(daily);
    report.price = current_price;
    report.change_1d_pct = price::price_change_pct(daily, 1);
    report.change_5d_pct = price::price_change_pct(daily, 5);
    report.change_11d_pct = price::price_change_pct(daily, 11);
    report.trailing_pe = price::trailing_pe(&bundle.meta);
    report.high_52w = price::high_52_week(daily);
    report.low_52w = price::low_52_week(daily);
    report.high_5y = price::high_full(daily);
    report.low_5y = price::low_full(daily);

    // Trend
    let sma50_daily = calculate_sma(daily, 50);
    let sma200_daily = calculate_sma(daily, 200);
    report.sma50_daily = sma50_daily;
    report.sma200_daily = sma200_daily;
    report.sma200_weekly = calculate_sma(weekly, 200);
    report.sma50_distance_pct = current_price
        .zip(sma50_daily)
        .and_then(|(p, s)| sma_distance_pct(p, s));
    report.sma200_distance_pct = current_price
        .zip(sma200_daily)
        .and_then(|(p, s)| sma_distance_pct(p, s));
    report.cross_state = golden_death_cross(daily);
    report.supertrend_daily = calculate_supertrend(daily, DEFAULT_PERIOD, DEFAULT_MULTIPLIER);
    report.supertrend_weekly = calculate_supertrend(weekly, DEFAULT_PERIOD, DEFAULT_MULTIPLIER);

    // Momentum
    report.rsi_daily = calculate_rsi(daily, RSI_PERIOD);
    report.rsi_weekly = calculate_rsi(weekly, RSI_PERIOD);
    if let Some((macd, signal)) = calculate_macd(daily, MACD_FAST, MACD_SLOW, MACD_SIGNAL) {
        report.macd_daily = Some(macd);
        report.macd_signal_daily = Some(signal);
    }
    report.macd_cross_daily = macd_crossover(daily, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    if let Some((macd, signal)) = calculate_macd(weekly, MACD_FAST, MACD_SLOW, MACD_SIGNAL) {
        report.macd_weekly = Some(macd);
        report.macd_signal_weekly = Some(signal);
    }
    report.macd_cross_weekly = macd_crossover(weekly, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    // Volume
    report.volume_change_pct = volume_change_pct(daily);
    report.rel_volume_1d_10d = relative_volume(daily, 1, 10);
    report.rel_volume_1d_30d = relative_volume(daily, 1, 30);
    report.rel_volume_10d_30d = relative_volume(daily, 10, 30);
    report.rel_volume_10d_60d = relative_volume(daily, 10, 60);
    report.rel_volume_10d_90d = relative_volume(daily, 10, 90);

    // Money flow
    report.mfi = calculate_mfi(daily, MFI_PERIOD);
    report.cmf = calculate_cmf(daily, CMF_PERIOD);
    report.pressure_ratio = pressure_ratio(daily, PRESSURE_PERIOD);
    report.vpt_change_pct = vpt_change_pct(daily, VPT_PERIOD);

    // Relative strength
    if let Some(bench) = benchmark {
        report.rel_strength_18d = relative_strength(daily, bench, 18);
        report.rel_strength_55d = relative_strength(daily, bench, 55);
        report.rel_strength_81d = relative_strength(daily, bench, 81);
    }

    report
}
