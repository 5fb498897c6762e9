//! Backup directory fixtures
//!
//! Every fixture owns a temporary root holding a `backups/` directory and a
//! private config file, so tests never read or write the user's config.

use super::cli::KeeperCommand;
use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Size of every seeded dump
pub const DUMP_SIZE: usize = 128;

pub struct BackupFixture {
    root: TempDir,
}

impl BackupFixture {
    pub fn new() -> Result<Self> {
        let root = TempDir::new()?;
        fs::create_dir(root.path().join("backups"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root().join("backups")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config").join("keeper.toml")
    }

    /// Timestamp of the newest seeded dump
    pub fn newest() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 2, 0, 0).unwrap()
    }

    /// Write one dump `days_old` days before the newest, plus a checksum sidecar
    pub fn seed_dump(&self, days_old: i64) -> Result<String> {
        let created = Self::newest() - Duration::days(days_old);
        let name = format!("backup_postgres_app_{}.sql", created.format("%Y%m%d_%H%M%S"));

        fs::write(self.backup_dir().join(&name), vec![0u8; DUMP_SIZE])?;
        fs::write(
            self.backup_dir().join(format!("{}.sha256", name)),
            b"checksum",
        )?;
        Ok(name)
    }

    /// One nightly dump per day, newest first
    pub fn seed_nightlies(&self, days: i64) -> Result<Vec<String>> {
        (0..days).map(|day| self.seed_dump(day)).collect()
    }

    /// Dump file names currently on disk, sorted
    pub fn dumps(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.backup_dir())? {
            let name = entry?.file_name().to_string_lossy().to_string();
            if name.ends_with(".sql") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Checksum sidecars currently on disk
    pub fn sidecar_count(&self) -> Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(self.backup_dir())? {
            if entry?.file_name().to_string_lossy().ends_with(".sha256") {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Write the config file
    pub fn write_config(&self, text: &str) -> Result<()> {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }

    /// Config pointing at this fixture's backup directory with the given policy
    pub fn configure_policy(&self, policy: &str) -> Result<()> {
        self.write_config(&format!(
            "[storage]\nbackup_dir = {:?}\n\n[retention]\npolicy = {:?}\n",
            self.backup_dir().display().to_string(),
            policy
        ))
    }

    /// A `keeper` command running in the fixture root with the fixture's config
    pub fn command(&self) -> KeeperCommand {
        let mut cmd = KeeperCommand::new(self.root());
        cmd.env(
            "KEEPER_CONFIG",
            &self.config_path().display().to_string(),
        );
        cmd
    }
}
