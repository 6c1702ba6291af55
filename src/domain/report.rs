//! Fixed-schema per-instrument indicator record.
//!
//! One typed optional field per indicator: the record always has the same
//! shape, and absence is an explicit `None` rather than a missing key.

use crate::domain::indicator::momentum::MacdCross;
use crate::domain::indicator::trend::CrossState;
use crate::domain::instrument::InstrumentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub name: String,
    pub symbol: String,
    pub alt_symbol: String,
    pub sector: String,
    pub industry: String,
    pub updated_at: DateTime<Utc>,
    /// Set when the instrument's data could not be resolved; every indicator
    /// field is `None` in that case.
    pub failed: bool,

    // Price group
    pub price: Option<f64>,
    pub change_1d_pct: Option<f64>,
    pub change_5d_pct: Option<f64>,
    pub change_11d_pct: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
    pub high_5y: Option<f64>,
    pub low_5y: Option<f64>,

    // Trend group
    pub sma50_daily: Option<f64>,
    pub sma200_daily: Option<f64>,
    pub sma200_weekly: Option<f64>,
    pub sma50_distance_pct: Option<f64>,
    pub sma200_distance_pct: Option<f64>,
    pub cross_state: Option<CrossState>,
    pub supertrend_daily: Option<f64>,
    pub supertrend_weekly: Option<f64>,

    // Momentum group
    pub rsi_daily: Option<f64>,
    pub rsi_weekly: Option<f64>,
    pub macd_daily: Option<f64>,
    pub macd_signal_daily: Option<f64>,
    pub macd_cross_daily: Option<MacdCross>,
    pub macd_weekly: Option<f64>,
    pub macd_signal_weekly: Option<f64>,
    pub macd_cross_weekly: Option<MacdCross>,

    // Volume group
    pub volume_change_pct: Option<f64>,
    pub rel_volume_1d_10d: Option<f64>,
    pub rel_volume_1d_30d: Option<f64>,
    pub rel_volume_10d_30d: Option<f64>,
    pub rel_volume_10d_60d: Option<f64>,
    pub rel_volume_10d_90d: Option<f64>,

    // Money-flow group
    pub mfi: Option<f64>,
    pub cmf: Option<f64>,
    pub pressure_ratio: Option<f64>,
    pub vpt_change_pct: Option<f64>,

    // Relative strength group
    pub rel_strength_18d: Option<f64>,
    pub rel_strength_55d: Option<f64>,
    pub rel_strength_81d: Option<f64>,
}

impl IndicatorReport {
    /// Empty record carrying only identity and the update timestamp.
    pub fn empty(instrument: &InstrumentRecord, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: instrument.name.clone(),
            symbol: instrument.symbol.clone(),
            alt_symbol: instrument.alt_symbol.clone(),
            sector: instrument.sector.clone(),
            industry: instrument.industry.clone(),
            updated_at,
            failed: false,
            price: None,
            change_1d_pct: None,
            change_5d_pct: None,
            change_11d_pct: None,
            trailing_pe: None,
            high_52w: None,
            low_52w: None,
            high_5y: None,
            low_5y: None,
            sma50_daily: None,
            sma200_daily: None,
            sma200_weekly: None,
            sma50_distance_pct: None,
            sma200_distance_pct: None,
            cross_state: None,
            supertrend_daily: None,
            supertrend_weekly: None,
            rsi_daily: None,
            rsi_weekly: None,
            macd_daily: None,
            macd_signal_daily: None,
            macd_cross_daily: None,
            macd_weekly: None,
            macd_signal_weekly: None,
            macd_cross_weekly: None,
            volume_change_pct: None,
            rel_volume_1d_10d: None,
            rel_volume_1d_30d: None,
            rel_volume_10d_30d: None,
            rel_volume_10d_60d: None,
            rel_volume_10d_90d: None,
            mfi: None,
            cmf: None,
            pressure_ratio: None,
            vpt_change_pct: None,
            rel_strength_18d: None,
            rel_strength_55d: None,
            rel_strength_81d: None,
        }
    }

    /// Record for an instrument whose data could not be resolved.
    pub fn failure_marker(instrument: &InstrumentRecord, updated_at: DateTime<Utc>) -> Self {
        Self {
            failed: true,
            ..Self::empty(instrument, updated_at)
        }
    }

    /// Rewrite any non-finite numeric to `None` so the serialized record is
    /// strictly valid.
    pub fn sanitize(&mut self) {
        for field in self.numeric_fields_mut() {
            if field.is_some_and(|v| !v.is_finite()) {
                *field = None;
            }
        }
    }

    fn numeric_fields_mut(&mut self) -> [&mut Option<f64>; 35] {
        [
            &mut self.price,
            &mut self.change_1d_pct,
            &mut self.change_5d_pct,
            &mut self.change_11d_pct,
            &mut self.trailing_pe,
            &mut self.high_52w,
            &mut self.low_52w,
            &mut self.high_5y,
            &mut self.low_5y,
            &mut self.sma50_daily,
            &mut self.sma200_daily,
            &mut self.sma200_weekly,
            &mut self.sma50_distance_pct,
            &mut self.sma200_distance_pct,
            &mut self.supertrend_daily,
            &mut self.supertrend_weekly,
            &mut self.rsi_daily,
            &mut self.rsi_weekly,
            &mut self.macd_daily,
            &mut self.macd_signal_daily,
            &mut self.macd_weekly,
            &mut self.macd_signal_weekly,
            &mut self.volume_change_pct,
            &mut self.rel_volume_1d_10d,
            &mut self.rel_volume_1d_30d,
            &mut self.rel_volume_10d_30d,
            &mut self.rel_volume_10d_60d,
            &mut self.rel_volume_10d_90d,
            &mut self.mfi,
            &mut self.cmf,
            &mut self.pressure_ratio,
            &mut self.vpt_change_pct,
            &mut self.rel_strength_18d,
            &mut self.rel_strength_55d,
            &mut self.rel_strength_81d,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument() -> InstrumentRecord {
        InstrumentRecord {
            name: "Acme Industries".into(),
            symbol: "ACME.NS".into(),
            alt_symbol: "NSE:ACME".into(),
            sector: "Industrials".into(),
            industry: "Machinery".into(),
        }
    }

    #[test]
    fn empty_report_carries_identity() {
        let report = IndicatorReport::empty(&instrument(), Utc::now());
        assert_eq!(report.name, "Acme Industries");
        assert_eq!(report.symbol, "ACME.NS");
        assert!(!report.failed);
        assert_eq!(report.price, None);
        assert_eq!(report.cross_state, None);
    }

    #[test]
    fn failure_marker_sets_flag_only() {
        let report = IndicatorReport::failure_marker(&instrument(), Utc::now());
        assert!(report.failed);
        assert_eq!(report.rsi_daily, None);
        assert_eq!(report.macd_cross_daily, None);
    }

    #[test]
    fn sanitize_nulls_non_finite_values() {
        let mut report = IndicatorReport::empty(&instrument(), Utc::now());
        report.price = Some(100.0);
        report.vpt_change_pct = Some(f64::NAN);
        report.pressure_ratio = Some(f64::INFINITY);
        report.mfi = Some(f64::NEG_INFINITY);

        report.sanitize();

        assert_eq!(report.price, Some(100.0));
        assert_eq!(report.vpt_change_pct, None);
        assert_eq!(report.pressure_ratio, None);
        assert_eq!(report.mfi, None);
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let report = IndicatorReport::empty(&instrument(), Utc::now());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["price"], serde_json::Value::Null);
        assert_eq!(json["failed"], serde_json::json!(false));
        assert_eq!(json["symbol"], serde_json::json!("ACME.NS"));
    }
}
