//! Result snapshot persistence port trait.

use crate::domain::error::SiftError;
use crate::domain::snapshot::ResultSnapshot;
use std::path::PathBuf;

/// Append-only snapshot store: each completed batch is persisted under its
/// generation-timestamp key and never rewritten.
pub trait ResultPort {
    fn persist(&self, snapshot: &ResultSnapshot) -> Result<PathBuf, SiftError>;
}
