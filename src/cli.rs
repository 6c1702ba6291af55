//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::chart_api_adapter::ChartApiAdapter;
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_cache_adapter::FileCacheAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_snapshot_adapter::JsonSnapshotAdapter;
use crate::domain::config_validation::{load_sift_config, SiftConfig};
use crate::domain::error::SiftError;
use crate::domain::orchestrator::Screener;
use crate::domain::snapshot::ResultSnapshot;
use crate::ports::cache_port::CachePort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::result_port::ResultPort;

#[derive(Parser, Debug)]
#[command(name = "tickersift", about = "Watchlist indicator screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full refresh pass and persist the snapshot
    Refresh {
        #[arg(short, long)]
        config: PathBuf,
        /// Print per-instrument progress
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show cache statistics and the latest snapshot key
    Status {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Delete cache entries older than the retention window
    Reap {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured retention in days
        #[arg(long)]
        days: Option<i64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Refresh { config, verbose } => run_refresh(&config, verbose),
        Command::Status { config } => run_status(&config),
        Command::Reap { config, days } => run_reap(&config, days),
    }
}

fn load_config(path: &PathBuf) -> Result<SiftConfig, ExitCode> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SiftError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;

    load_sift_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn open_cache(config: &SiftConfig) -> Result<FileCacheAdapter, ExitCode> {
    if !config.cache_enabled {
        return Ok(FileCacheAdapter::disabled());
    }
    FileCacheAdapter::new(config.cache_dir.clone()).map_err(|e| {
        let err = SiftError::from(e);
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_refresh(config_path: &PathBuf, verbose: bool) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let ledger = match CsvLedgerAdapter::new(config.ledger_path.clone()).read_ledger() {
        Ok(ledger) => ledger,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    if ledger.is_empty() {
        eprintln!("error: ledger has no instruments");
        let err = SiftError::Ledger {
            reason: "empty ledger".to_string(),
        };
        return ExitCode::from(&err);
    }

    let cache = match open_cache(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut series = ChartApiAdapter::new(config.fetch_timeout);
    if let Some(base_url) = &config.base_url {
        series = series.with_base_url(base_url);
    }

    eprintln!("Refreshing {} instruments...", ledger.len());
    let screener = Screener::new(&series, &cache, &config);
    let mut progress = |current: usize, total: usize, name: &str| {
        if verbose {
            eprintln!("  [{current}/{total}] {name}");
        }
    };
    let outcome = screener.refresh(&ledger, Some(&mut progress));

    let snapshot = ResultSnapshot::new(chrono::Utc::now(), outcome.records);

    let store = match JsonSnapshotAdapter::new(config.snapshot_dir.clone()) {
        Ok(s) => s,
        Err(e) => {
            let err = SiftError::from(e);
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };
    let path = match store.persist(&snapshot) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    println!(
        "Processed {} instruments ({} failed)",
        snapshot.records.len(),
        outcome.failed
    );
    println!("Snapshot written to {}", path.display());
    ExitCode::SUCCESS
}

fn run_status(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let cache = match open_cache(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let stats = cache.stats();

    println!("Cache enabled: {}", config.cache_enabled);
    println!("Cache entries: {} ({} bytes)", stats.files, stats.total_bytes);
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        println!("Cache range:   {oldest} .. {newest}");
    }

    match JsonSnapshotAdapter::new(config.snapshot_dir.clone()) {
        Ok(store) => match store.latest_key() {
            Some(key) => println!("Latest snapshot: {key}"),
            None => println!("Latest snapshot: none"),
        },
        Err(e) => {
            let err = SiftError::from(e);
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    }

    ExitCode::SUCCESS
}

fn run_reap(config_path: &PathBuf, days: Option<i64>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let cache = match open_cache(&config) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let keep = days.unwrap_or(config.cache_keep_days);
    let deleted = cache.reap(keep);
    println!("Deleted {deleted} cache entries older than {keep} days");
    ExitCode::SUCCESS
}
