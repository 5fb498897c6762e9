//! Artifact and result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single backup file as seen by the retention engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// Name or path, unique within one input set
    pub id: String,
    /// Size on the storage destination
    pub size_bytes: u64,
    /// Creation time of the backup
    pub timestamp: DateTime<Utc>,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(id: impl Into<String>, size_bytes: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            size_bytes,
            timestamp,
        }
    }
}

/// Partition of an artifact set into the ones to keep and the ones to delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionResult {
    pub keep: Vec<Artifact>,
    pub delete: Vec<Artifact>,
}

impl RetentionResult {
    /// Total size of the kept artifacts
    pub fn kept_bytes(&self) -> u64 {
        self.keep.iter().map(|a| a.size_bytes).sum()
    }

    /// Total size that deleting `delete` would free
    pub fn reclaimed_bytes(&self) -> u64 {
        self.delete.iter().map(|a| a.size_bytes).sum()
    }

    /// True when nothing would be deleted
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty()
    }
}
