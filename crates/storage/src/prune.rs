//! Executing deletions
//!
//! Each deletion is independent. A failure is recorded against its artifact
//! and never stops the remaining deletions.

use crate::ArtifactDeleter;
use futures::stream::{self, StreamExt};
use retention::Artifact;
use serde::Serialize;
use tracing::{info, warn};

/// Default number of deletions in flight
pub const DEFAULT_PARALLELISM: usize = 4;

/// A deletion that did not go through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDeletion {
    pub id: String,
    pub error: String,
}

/// Aggregate outcome of a prune run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeletion>,
    pub bytes_freed: u64,
}

impl PruneReport {
    /// True when every requested deletion succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes artifacts with bounded parallelism
pub struct Pruner {
    parallelism: usize,
}

impl Default for Pruner {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLELISM)
    }
}

impl Pruner {
    /// Create a pruner; a parallelism of 0 is treated as 1
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Delete every artifact in `artifacts`
    ///
    /// The report lists outcomes in the order of `artifacts`.
    pub async fn prune<D>(&self, deleter: &D, artifacts: &[Artifact]) -> PruneReport
    where
        D: ArtifactDeleter + ?Sized,
    {
        let outcomes: Vec<_> = stream::iter(artifacts)
            .map(|artifact| async move { (artifact, deleter.delete(&artifact.id).await) })
            .buffered(self.parallelism)
            .collect()
            .await;

        let mut report = PruneReport::default();
        for (artifact, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    report.deleted.push(artifact.id.clone());
                    report.bytes_freed += artifact.size_bytes;
                }
                Err(e) => {
                    warn!("Failed to delete {}: {}", artifact.id, e);
                    report.failed.push(FailedDeletion {
                        id: artifact.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Pruned {} artifacts ({} bytes), {} failed",
            report.deleted.len(),
            report.bytes_freed,
            report.failed.len()
        );
        report
    }
}
