//! Storage collaborators for the retention engine
//!
//! This crate provides:
//! - `ArtifactSource` / `ArtifactDeleter` ports
//! - Local backup directory backend
//! - In-memory backend (tests, dry runs)
//! - Backup file naming and sidecar detection
//! - Partial-failure-tolerant pruning

pub mod error;
pub mod local;
pub mod memory;
pub mod naming;
pub mod prune;

use async_trait::async_trait;
use retention::Artifact;

// Re-exports
pub use error::StorageError;
pub use local::LocalDirStorage;
pub use memory::MemoryStorage;
pub use naming::{is_sidecar, BackupName};
pub use prune::{FailedDeletion, PruneReport, Pruner};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Enumerates the artifacts held by a destination
///
/// Implementations must leave out sidecar and metadata files; everything
/// returned is a retention candidate.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn list(&self) -> Result<Vec<Artifact>>;
}

/// Removes a single artifact from a destination
#[async_trait]
pub trait ArtifactDeleter: Send + Sync {
    async fn delete(&self, id: &str) -> Result<()>;
}
