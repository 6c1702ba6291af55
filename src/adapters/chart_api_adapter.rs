//! HTTP time-series adapter over a v8-chart-style JSON endpoint.
//!
//! The endpoint has no official contract and is subject to unannounced
//! format changes; every decode failure is reported as a fetch error for the
//! orchestrator to retry. One call here is one attempt; retry policy lives
//! with the caller.

use crate::domain::error::SiftError;
use crate::domain::ohlcv::{Interval, OhlcvBar, SeriesFetch};
use crate::ports::series_port::TimeSeriesPort;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    meta: BTreeMap<String, serde_json::Value>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

pub struct ChartApiAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ChartApiAdapter {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at a different endpoint (tests, mirrors).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn chart_url(&self, symbol: &str, lookback_years: u32, interval: Interval) -> String {
        format!(
            "{}/{}?range={}y&interval={}",
            self.base_url,
            symbol,
            lookback_years,
            interval.wire_code()
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<SeriesFetch, SiftError> {
        let fetch_err = |reason: String| SiftError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let result = resp.chart.result.ok_or_else(|| {
            let reason = match resp.chart.error {
                Some(err) => format!("{}: {}", err.code, err.description),
                None => "empty result with no error".to_string(),
            };
            fetch_err(reason)
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| fetch_err("result array is empty".to_string()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| fetch_err("no timestamps".to_string()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| fetch_err("no quote data".to_string()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| fetch_err(format!("invalid timestamp: {ts}")))?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Non-trading slots come back as all-null rows; partially null
            // rows are unusable for OHLC math either way.
            let (Some(open), Some(high), Some(low), Some(close)) = (open, high, low, close)
            else {
                continue;
            };

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume: volume.unwrap_or(0),
            });
        }

        Ok(SeriesFetch {
            bars,
            meta: data.meta,
        })
    }
}

impl TimeSeriesPort for ChartApiAdapter {
    fn fetch(
        &self,
        symbol: &str,
        lookback_years: u32,
        interval: Interval,
    ) -> Result<SeriesFetch, SiftError> {
        let url = self.chart_url(symbol, lookback_years, interval);
        debug!(symbol, url = %url, "requesting series");

        let fetch_err = |reason: String| SiftError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        let chart: ChartResponse = resp
            .json()
            .map_err(|e| fetch_err(format!("failed to parse response: {e}")))?;

        Self::parse_response(symbol, chart)
    }
}
