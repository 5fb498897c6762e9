//! System configuration
//!
//! Stored as TOML at `$KEEPER_CONFIG`, or `<config dir>/keeper/config.toml`.
//! A missing file means defaults. The `[retention]` section is loaded
//! leniently: if it cannot be understood the policy falls back to keeping
//! everything, because deleting under a misread policy cannot be undone.

use retention::RetentionPolicy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "KEEPER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the backup artifacts
    pub backup_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backup_dir: PathBuf::from("./backups"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Deletions in flight at once (1-64)
    pub parallelism: usize,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            parallelism: storage::prune::DEFAULT_PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemConfig {
    pub storage: StorageConfig,
    pub retention: RetentionPolicy,
    pub prune: PruneConfig,
    /// `[retention]` exactly as written, when it could not be understood.
    /// Saved back in place of `retention` so the fallback never reaches disk.
    #[serde(skip)]
    unreadable_retention: Option<toml::Value>,
}

impl SystemConfig {
    /// Parse configuration text
    ///
    /// Syntax errors and malformed `[storage]`/`[prune]` sections are errors;
    /// a malformed `[retention]` section yields `RetentionPolicy::None`.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let storage = section(&mut table, "storage", path)?;
        let prune = section(&mut table, "prune", path)?;
        let (retention, unreadable_retention) = match table.remove("retention") {
            Some(value) => match policy_from_value(&value) {
                Some(policy) => (policy, None),
                None => (RetentionPolicy::None, Some(value)),
            },
            None => (RetentionPolicy::None, None),
        };

        Ok(Self {
            storage,
            retention,
            prune,
            unreadable_retention,
        })
    }

    /// Render as TOML, writing an unreadable `[retention]` back untouched
    pub fn to_toml(&self) -> Result<String> {
        let mut table = match toml::Value::try_from(self)? {
            toml::Value::Table(table) => table,
            _ => {
                return Err(ConfigError::Invalid(
                    "configuration did not serialize to a table".to_string(),
                ))
            }
        };

        if let Some(raw) = &self.unreadable_retention {
            table.insert("retention".to_string(), raw.clone());
        }

        Ok(toml::to_string_pretty(&table)?)
    }

    /// True when `retention` is the keep-everything fallback for a
    /// `[retention]` section that could not be understood
    pub fn retention_is_fallback(&self) -> bool {
        self.unreadable_retention.is_some()
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.storage.backup_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.backup_dir must not be empty".to_string()));
        }
        if !(1..=64).contains(&self.prune.parallelism) {
            return Err(ConfigError::Invalid(format!(
                "prune.parallelism must be between 1 and 64 (got {})",
                self.prune.parallelism
            )));
        }
        Ok(())
    }

    /// Read a single key as text
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "storage.backup_dir" => Some(self.storage.backup_dir.display().to_string()),
            "retention.policy" => Some(self.retention.to_string()),
            "prune.parallelism" => Some(self.prune.parallelism.to_string()),
            _ => None,
        }
    }

    /// Set a single key from text; the result is validated
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage.backup_dir" => self.storage.backup_dir = PathBuf::from(value),
            "retention.policy" => {
                self.retention = value
                    .parse()
                    .map_err(|e: retention::PolicyParseError| ConfigError::Invalid(e.to_string()))?;
                self.unreadable_retention = None;
            }
            "prune.parallelism" => {
                self.prune.parallelism = value.parse().map_err(|_| {
                    ConfigError::Invalid("prune.parallelism must be a positive integer".to_string())
                })?;
            }
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "unknown config key: {}. Use 'keeper config list' to see available keys",
                    key
                )))
            }
        }
        self.validate()
    }
}

/// Keys accepted by `get`/`set`
pub const KEYS: &[&str] = &["storage.backup_dir", "retention.policy", "prune.parallelism"];

fn section<T>(table: &mut toml::Table, name: &str, path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match table.remove(name) {
        Some(value) => value.try_into().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(T::default()),
    }
}

/// Interpret a `[retention]` section, either structured or `policy = "<text>"`
///
/// `None` (with a warning) when the section cannot be understood; callers
/// then keep all backups.
pub fn policy_from_value(value: &toml::Value) -> Option<RetentionPolicy> {
    if let Some(text) = value.get("policy").and_then(|v| v.as_str()) {
        return match text.parse() {
            Ok(policy) => Some(policy),
            Err(e) => {
                warn!("Invalid retention policy '{}': {}; keeping all backups", text, e);
                None
            }
        };
    }

    match value.clone().try_into::<RetentionPolicy>() {
        Ok(policy) => Some(policy),
        Err(e) => {
            warn!("Invalid [retention] section: {}; keeping all backups", e);
            None
        }
    }
}

/// Location of the config file
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("keeper").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load the configuration; a missing file yields defaults
pub fn load() -> Result<SystemConfig> {
    load_from(&config_file_path()?)
}

pub fn load_from(path: &Path) -> Result<SystemConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SystemConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = SystemConfig::from_toml(&text, path)?;
    config.validate()?;
    Ok(config)
}

/// Save the configuration to its default location
pub fn save(config: &SystemConfig) -> Result<()> {
    save_to(config, &config_file_path()?)
}

/// Write via a temporary file and rename so a crash never leaves half a file
pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let text = config.to_toml()?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, text).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Write a default config file unless one exists
pub fn init_if_missing() -> Result<PathBuf> {
    let path = config_file_path()?;
    if !path.exists() {
        save_to(&SystemConfig::default(), &path)?;
    }
    Ok(path)
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# Keeper configuration

[storage]
# Directory holding backup_<engine>_<database>_<YYYYmmdd_HHMMSS>.<ext> files
backup_dir = "/var/backups/db"

[retention]
# kind = "none"                      keep everything
# kind = "simple", keep_count = N    keep the N newest backups
# kind = "smart"                     one backup per day/week/month/year slot
kind = "smart"
daily = 7
weekly = 4
monthly = 12
yearly = 2
# Alternatively: policy = "smart:7,4,12,2"

[prune]
# Deletions in flight at once (1-64)
parallelism = 4
"#
}
