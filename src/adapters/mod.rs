//! Concrete adapter implementations for ports.

pub mod chart_api_adapter;
pub mod csv_ledger_adapter;
pub mod file_cache_adapter;
pub mod file_config_adapter;
pub mod json_snapshot_adapter;
