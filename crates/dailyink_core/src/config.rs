//! Journal configuration.
//!
//! # Responsibility
//! - Resolve runtime settings from defaults, an optional TOML file and
//!   `DAILYINK_*` environment variables, in that order.
//!
//! # Invariants
//! - A loaded config always has a positive default target, a supported log
//!   level and a valid threshold table.

use crate::logging::{default_log_level, normalize_level};
use crate::stats::heatmap::BucketThresholds;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_WORD_COUNT: u32 = 50;
const DEFAULT_DB_FILE_NAME: &str = "dailyink.sqlite3";
const DATA_DIR_NAME: &str = "dailyink";

pub const ENV_DB_PATH: &str = "DAILYINK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DAILYINK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAILYINK_LOG_DIR";
pub const ENV_TARGET_WORDS: &str = "DAILYINK_TARGET_WORDS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JournalConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Goal used when an entry is started without an explicit target.
    pub default_target_word_count: u32,
    /// Heat-map table, written as `[[thresholds]]` rows.
    pub thresholds: BucketThresholds,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_target_word_count: DEFAULT_TARGET_WORD_COUNT,
            thresholds: BucketThresholds::default(),
        }
    }
}

/// `<data dir>/dailyink/dailyink.sqlite3`, or the working directory when the
/// platform has no data directory.
pub fn default_db_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(DATA_DIR_NAME);
    path.push(DEFAULT_DB_FILE_NAME);
    path
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config file: {err}"),
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl JournalConfig {
    /// Loads defaults, then `path` when given, then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parses a TOML document; omitted keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validated()
    }

    /// Applies `DAILYINK_*` overrides read through `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value.trim());
        }
        if let Some(value) = non_empty(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = non_empty(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value.trim()));
        }
        if let Some(value) = non_empty(ENV_TARGET_WORDS) {
            self.default_target_word_count =
                value
                    .trim()
                    .parse()
                    .map_err(|err| ConfigError::InvalidValue {
                        key: ENV_TARGET_WORDS,
                        message: format!("`{value}` is not a word count: {err}"),
                    })?;
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.default_target_word_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_target_word_count",
                message: "must be greater than zero".to_string(),
            });
        }
        self.log_level = normalize_level(&self.log_level)
            .map_err(|message| ConfigError::InvalidValue {
                key: "log_level",
                message,
            })?
            .to_string();
        Ok(self)
    }
}
