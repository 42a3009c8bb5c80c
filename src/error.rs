//! Error types for the best-effort persistence layer.
//!
//! High-score storage follows a fall-through design: a failure in one backend
//! is logged and the next backend is tried, so these errors never propagate
//! into gameplay systems.  They exist so the storage code itself can report
//! *why* a backend was skipped instead of collapsing everything to a string.

use std::fmt;
use std::path::PathBuf;

/// Failure modes of a single high-score storage backend.
#[derive(Debug)]
pub enum ScoreStoreError {
    /// The backing file could not be read.
    Read { path: PathBuf, source: std::io::Error },

    /// The backing file could not be written.
    Write { path: PathBuf, source: std::io::Error },

    /// The file existed but did not decode as a score record.
    Corrupt { path: PathBuf, detail: String },
}

impl fmt::Display for ScoreStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreStoreError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ScoreStoreError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            ScoreStoreError::Corrupt { path, detail } => {
                write!(f, "corrupt score record in {}: {}", path.display(), detail)
            }
        }
    }
}

impl std::error::Error for ScoreStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreStoreError::Read { source, .. } | ScoreStoreError::Write { source, .. } => {
                Some(source)
            }
            ScoreStoreError::Corrupt { .. } => None,
        }
    }
}

/// Convenience alias used by the storage backends.
pub type ScoreStoreResult<T> = Result<T, ScoreStoreError>;
