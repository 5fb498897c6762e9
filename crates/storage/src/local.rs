//! Local backup directory backend

use crate::naming::{is_sidecar, BackupName};
use crate::{ArtifactDeleter, ArtifactSource, Result, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use retention::Artifact;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A flat directory of backup files
///
/// Identifiers are bare file names. Sub-directories and sidecar files are
/// not artifacts and are never listed or deleted.
pub struct LocalDirStorage {
    dir: PathBuf,
}

impl LocalDirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve an identifier to a path inside the directory
    ///
    /// Only bare file names are accepted: empty, `.`, `..`, and anything with
    /// a path separator or NUL is refused. A `..` inside a name (`dump..sql`)
    /// is an ordinary file name.
    fn artifact_path(&self, id: &str) -> Result<PathBuf> {
        let invalid = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains('/')
            || id.contains('\\')
            || id.contains('\0');
        if invalid {
            return Err(StorageError::InvalidIdentifier(id.to_string()));
        }
        Ok(self.dir.join(id))
    }
}

/// Creation time from the file name, falling back to mtime
fn artifact_timestamp(
    file_name: &str,
    modified: std::io::Result<std::time::SystemTime>,
) -> Option<DateTime<Utc>> {
    if let Some(name) = BackupName::parse(file_name) {
        return Some(name.created);
    }
    modified.ok().map(DateTime::<Utc>::from)
}

#[async_trait]
impl ArtifactSource for LocalDirStorage {
    async fn list(&self) -> Result<Vec<Artifact>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?;

        let mut artifacts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?
        {
            let path = entry.path();
            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non UTF-8 file name: {:?}", raw);
                    continue;
                }
            };

            if is_sidecar(&file_name) {
                debug!("Skipping sidecar {}", file_name);
                continue;
            }

            // Follows symlinks; an entry gone since read_dir (or a dangling link) is skipped
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Skipping {}: vanished during listing", file_name);
                    continue;
                }
                Err(e) => return Err(StorageError::io(&path, e)),
            };
            if !metadata.is_file() {
                continue;
            }

            match artifact_timestamp(&file_name, metadata.modified()) {
                Some(timestamp) => {
                    artifacts.push(Artifact::new(file_name, metadata.len(), timestamp));
                }
                None => {
                    warn!("No usable timestamp for {}, skipping", file_name);
                }
            }
        }

        // read_dir order is unspecified; ties are broken by input order
        artifacts.sort_by(|a, b| a.id.cmp(&b.id));

        info!(
            "Listed {} artifacts in {}",
            artifacts.len(),
            self.dir.display()
        );
        Ok(artifacts)
    }
}

#[async_trait]
impl ArtifactDeleter for LocalDirStorage {
    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.artifact_path(id)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}
