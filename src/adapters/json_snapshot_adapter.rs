//! JSON-file result snapshot adapter.
//!
//! Append-only: each batch lands in its own timestamp-keyed file and an
//! existing key is never rewritten.

use crate::domain::error::SiftError;
use crate::domain::snapshot::ResultSnapshot;
use crate::ports::result_port::ResultPort;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct JsonSnapshotAdapter {
    dir: PathBuf,
}

impl JsonSnapshotAdapter {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self, snapshot: &ResultSnapshot) -> PathBuf {
        self.dir.join(format!("sift_{}.json", snapshot.key()))
    }

    /// Latest snapshot key present on disk, by filename order.
    pub fn latest_key(&self) -> Option<String> {
        let entries = fs::read_dir(&self.dir).ok()?;
        entries
            .flatten()
            .filter_map(|e| {
                let name = e.file_name().into_string().ok()?;
                name.strip_prefix("sift_")?
                    .strip_suffix(".json")
                    .map(str::to_string)
            })
            .max()
    }
}

impl ResultPort for JsonSnapshotAdapter {
    fn persist(&self, snapshot: &ResultSnapshot) -> Result<PathBuf, SiftError> {
        let path = self.snapshot_path(snapshot);
        if path.exists() {
            return Err(SiftError::Snapshot {
                reason: format!("snapshot {} already exists", display_name(&path)),
            });
        }

        let clean = snapshot.sanitized();
        let json = serde_json::to_string_pretty(&clean).map_err(|e| SiftError::Snapshot {
            reason: format!("serialization failed: {e}"),
        })?;
        fs::write(&path, json).map_err(|e| SiftError::Snapshot {
            reason: format!("failed to write {}: {}", display_name(&path), e),
        })?;

        info!(path = %path.display(), records = clean.records.len(), "snapshot persisted");
        Ok(path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
