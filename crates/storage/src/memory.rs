//! In-memory backend

use crate::{ArtifactDeleter, ArtifactSource, Result, StorageError};
use async_trait::async_trait;
use parking_lot::Mutex;
use retention::Artifact;
use std::collections::HashSet;

/// Holds artifacts in memory; deletions of selected ids can be made to fail
#[derive(Default)]
pub struct MemoryStorage {
    artifacts: Mutex<Vec<Artifact>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self {
            artifacts: Mutex::new(artifacts),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Make every future deletion of `id` fail
    pub fn fail_deletes_of(&self, id: impl Into<String>) {
        self.failing.lock().insert(id.into());
    }

    /// Identifiers currently stored, in insertion order
    pub fn ids(&self) -> Vec<String> {
        self.artifacts.lock().iter().map(|a| a.id.clone()).collect()
    }
}

#[async_trait]
impl ArtifactSource for MemoryStorage {
    async fn list(&self) -> Result<Vec<Artifact>> {
        Ok(self.artifacts.lock().clone())
    }
}

#[async_trait]
impl ArtifactDeleter for MemoryStorage {
    async fn delete(&self, id: &str) -> Result<()> {
        if self.failing.lock().contains(id) {
            return Err(StorageError::Other(format!("injected failure deleting {}", id)));
        }

        let mut artifacts = self.artifacts.lock();
        let before = artifacts.len();
        artifacts.retain(|a| a.id != id);
        if artifacts.len() == before {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
