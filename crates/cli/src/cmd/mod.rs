//! CLI command implementations

pub mod config;
pub mod list;
pub mod plan;
pub mod prune;

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use retention::{Artifact, RetentionPolicy};
use std::path::PathBuf;
use storage::{ArtifactSource, LocalDirStorage};

/// Backup directory and policy a command works on
///
/// Command-line flags override the configuration file.
pub struct Target {
    pub storage: LocalDirStorage,
    pub policy: RetentionPolicy,
    pub config: SystemConfig,
}

impl Target {
    pub fn resolve(dir: Option<PathBuf>, policy: Option<&str>) -> Result<Self> {
        let config = system_config::load().context("Failed to load configuration")?;

        let dir = dir.unwrap_or_else(|| config.storage.backup_dir.clone());
        let policy = match policy {
            Some(text) => text
                .parse::<RetentionPolicy>()
                .with_context(|| format!("Invalid --policy '{}'", text))?,
            None => config.retention,
        };

        Ok(Self {
            storage: LocalDirStorage::new(dir),
            policy,
            config,
        })
    }

    /// List the artifacts in the backup directory
    pub async fn artifacts(&self) -> Result<Vec<Artifact>> {
        self.storage
            .list()
            .await
            .with_context(|| format!("Failed to list backups in {}", self.storage.dir().display()))
    }
}
