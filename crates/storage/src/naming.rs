//! Backup file naming
//!
//! Dumps are written as `backup_<engine>_<database>_<YYYYmmdd>_<HHMMSS>.<ext>`,
//! e.g. `backup_mysql_shop_20240201_031500.sql`. The embedded timestamp is the
//! creation time of the dump and survives copies that reset mtime.
//!
//! Name timestamps are read as UTC. Dumps written by a scheduler running in a
//! local time zone appear shifted by that zone's offset; within one directory
//! of such dumps relative order and spacing are unchanged, so only mixing
//! them with mtime-dated foreign files is affected.

use chrono::{DateTime, NaiveDateTime, Utc};

const PREFIX: &str = "backup_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extensions of files that accompany artifacts but are never artifacts
const SIDECAR_EXTENSIONS: &[&str] = &["tmp", "part", "json", "meta", "sha256", "md5", "log", "lock"];

/// Parsed components of a backup file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupName {
    pub engine: String,
    pub database: String,
    pub created: DateTime<Utc>,
    /// Everything after the first dot, e.g. `sql` or `sql.gz`
    pub extension: String,
}

impl BackupName {
    /// Parse a file name; `None` if it does not follow the naming scheme
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, extension) = file_name.split_once('.').unwrap_or((file_name, ""));
        let rest = stem.strip_prefix(PREFIX)?;

        // <engine>_<database>_<date>_<time>; the database may contain underscores
        let mut parts = rest.rsplitn(3, '_');
        let time = parts.next()?;
        let date = parts.next()?;
        let engine_db = parts.next()?;
        if date.len() != 8 || time.len() != 6 {
            return None;
        }

        let (engine, database) = engine_db.split_once('_')?;
        if engine.is_empty() || database.is_empty() {
            return None;
        }

        let naive =
            NaiveDateTime::parse_from_str(&format!("{}_{}", date, time), TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            engine: engine.to_string(),
            database: database.to_string(),
            created: naive.and_utc(),
            extension: extension.to_string(),
        })
    }

    /// Render the canonical file name
    pub fn file_name(&self) -> String {
        let mut name = format!(
            "{}{}_{}_{}",
            PREFIX,
            self.engine,
            self.database,
            self.created.format(TIMESTAMP_FORMAT)
        );
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }
}

/// True for hidden files and metadata/in-progress files next to artifacts
pub fn is_sidecar(file_name: &str) -> bool {
    if file_name.starts_with('.') {
        return true;
    }

    match file_name.rsplit_once('.') {
        Some((_, ext)) => SIDECAR_EXTENSIONS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
