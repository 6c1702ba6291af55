//! Configuration validation.
//!
//! Builds a typed `SiftConfig` from the config port, failing fast before any
//! instrument is processed.

use crate::domain::error::SiftError;
use crate::domain::retry::RetryPolicy;
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SiftConfig {
    pub ledger_path: PathBuf,
    pub cache_dir: PathBuf,
    pub snapshot_dir: PathBuf,
    pub cache_enabled: bool,
    pub cache_max_age_hours: i64,
    pub cache_keep_days: i64,
    pub benchmark_symbol: String,
    pub daily_history_years: u32,
    pub weekly_history_years: u32,
    pub retry: RetryPolicy,
    /// Pause between instruments that hit the network, for the source's
    /// rate limits.
    pub fetch_delay: Duration,
    pub fetch_timeout: Duration,
    /// Optional endpoint override, mainly for tests.
    pub base_url: Option<String>,
}

pub fn load_sift_config(config: &dyn ConfigPort) -> Result<SiftConfig, SiftError> {
    let ledger_path = required_string(config, "ledger", "path")?;
    let cache_dir = required_string(config, "storage", "cache_dir")?;
    let snapshot_dir = required_string(config, "storage", "snapshot_dir")?;
    let benchmark_symbol = required_string(config, "benchmark", "symbol")?;

    let max_retries = positive_int(config, "api", "max_retries", 3)?;
    let delay_secs = non_negative_double(config, "api", "delay_secs", 1.0)?;
    let timeout_secs = positive_int(config, "api", "timeout_secs", 30)?;
    let daily_years = positive_int(config, "data", "daily_history_years", 5)?;
    let weekly_years = positive_int(config, "data", "weekly_history_years", 5)?;
    let max_age_hours = positive_int(config, "storage", "cache_max_age_hours", 24)?;
    let keep_days = non_negative_int(config, "storage", "cache_keep_days", 7)?;

    Ok(SiftConfig {
        ledger_path: PathBuf::from(ledger_path),
        cache_dir: PathBuf::from(cache_dir),
        snapshot_dir: PathBuf::from(snapshot_dir),
        cache_enabled: config.get_bool("storage", "enable_cache", true),
        cache_max_age_hours: max_age_hours,
        cache_keep_days: keep_days,
        benchmark_symbol,
        daily_history_years: daily_years as u32,
        weekly_history_years: weekly_years as u32,
        retry: RetryPolicy::new(max_retries as u32, Duration::from_secs(1)),
        fetch_delay: Duration::from_secs_f64(delay_secs),
        fetch_timeout: Duration::from_secs(timeout_secs as u64),
        base_url: config
            .get_string("api", "base_url")
            .filter(|s| !s.trim().is_empty()),
    })
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, SiftError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(SiftError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, SiftError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(SiftError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(value)
}

fn non_negative_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, SiftError> {
    let value = config.get_int(section, key, default);
    if value < 0 {
        return Err(SiftError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(value)
}

fn non_negative_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SiftError> {
    let value = config.get_double(section, key, default);
    if value < 0.0 {
        return Err(SiftError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(value)
}
