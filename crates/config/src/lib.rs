//! Configuration loading, validation, and management for hmem.
//!
//! The effective configuration is built once per invocation and passed by
//! reference into every engine call. Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A config file: `hmem.config.json` or `hmem.toml`, looked up next to the
//!    snapshot and then in `$HMEM_HOME` (default `~/.hmem`)
//! 3. `HMEM_TOP_NEWEST`, `HMEM_TOP_ACCESSED`, `HMEM_TOP_OBSOLETE`
//!
//! JSON files use the keys of the agent-memory store's own config
//! (`bulkReadV2.topNewestCount`, ...); TOML files use snake_case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names probed by [`HmemConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["hmem.config.json", "hmem.toml"];

/// Built-in category labels. Config `prefixes` entries override these.
pub const DEFAULT_PREFIX_LABELS: [(char, &str); 10] = [
    ('P', "Projects"),
    ('L', "Lessons Learned"),
    ('E', "Error Patterns"),
    ('D', "Decisions"),
    ('T', "Tasks"),
    ('M', "Milestones"),
    ('S', "Skills"),
    ('N', "Navigator"),
    ('H', "Human"),
    ('R', "Rules"),
];

/// The root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HmemConfig {
    /// Selection caps for the budgeted (bulk-read) view
    #[serde(default, alias = "bulkReadV2")]
    pub bulk_read: BulkReadConfig,

    /// Token accounting
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Custom category labels, merged over the built-ins
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub prefixes: BTreeMap<String, String>,
}

/// Caps applied per category, and per parent when capping subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReadConfig {
    /// Newest records shown per category (and newest children per parent)
    #[serde(default = "default_top_newest", alias = "topNewestCount", alias = "topNewest")]
    pub top_newest: usize,

    /// Highest-scoring records promoted per category
    #[serde(default = "default_top_accessed", alias = "topAccessCount", alias = "topAccessed")]
    pub top_accessed: usize,

    /// Obsolete records shown across all categories
    #[serde(default = "default_top_obsolete", alias = "topObsoleteCount", alias = "topObsolete")]
    pub top_obsolete: usize,

    /// Records marked promoted in the full view
    #[serde(default = "default_full_view_promoted", alias = "fullViewPromoted")]
    pub full_view_promoted: usize,
}

fn default_top_newest() -> usize {
    5
}
fn default_top_accessed() -> usize {
    3
}
fn default_top_obsolete() -> usize {
    3
}
fn default_full_view_promoted() -> usize {
    5
}

impl Default for BulkReadConfig {
    fn default() -> Self {
        Self {
            top_newest: default_top_newest(),
            top_accessed: default_top_accessed(),
            top_obsolete: default_top_obsolete(),
            full_view_promoted: default_full_view_promoted(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Characters counted as one token
    #[serde(default = "default_chars_per_token", alias = "tokenCharsPerToken")]
    pub chars_per_token: usize,
}

fn default_chars_per_token() -> usize {
    4
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            chars_per_token: default_chars_per_token(),
        }
    }
}

impl HmemConfig {
    /// Find and load the configuration that applies to a snapshot file,
    /// then apply environment overrides.
    pub fn discover(snapshot_path: &Path) -> Result<Self, ConfigError> {
        let mut config = match Self::discover_path(snapshot_path) {
            Some(path) => Self::load_from(&path)?,
            None => {
                tracing::info!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// The config file [`discover`](Self::discover) would read, if any.
    pub fn discover_path(snapshot_path: &Path) -> Option<PathBuf> {
        let mut dirs = Vec::new();
        if let Some(parent) = snapshot_path.parent() {
            dirs.push(parent.to_path_buf());
        }
        dirs.push(Self::config_dir());

        dirs.iter()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific file path.
    ///
    /// `.json` files are parsed as JSON, anything else as TOML. A missing
    /// file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let mut config: Self = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };

        config.normalize();
        config.validate()?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Apply `HMEM_TOP_*` overrides using the given variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let caps = [
            ("HMEM_TOP_NEWEST", &mut self.bulk_read.top_newest),
            ("HMEM_TOP_ACCESSED", &mut self.bulk_read.top_accessed),
            ("HMEM_TOP_OBSOLETE", &mut self.bulk_read.top_obsolete),
        ];
        for (key, slot) in caps {
            if let Some(raw) = lookup(key) {
                *slot = raw.trim().parse().map_err(|_| {
                    ConfigError::ValidationError(format!(
                        "{key} must be a non-negative integer, got {raw:?}"
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        std::env::var("HMEM_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs_home().join(".hmem"))
    }

    /// Display label for a category letter.
    pub fn label_for(&self, category: char) -> String {
        let key = category.to_ascii_uppercase();
        if let Some(custom) = self.prefixes.get(key.to_string().as_str()) {
            return custom.clone();
        }
        DEFAULT_PREFIX_LABELS
            .iter()
            .find(|(c, _)| *c == key)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| category.to_string())
    }

    /// Upper-case prefix keys so lookups are case-insensitive.
    fn normalize(&mut self) {
        let prefixes = std::mem::take(&mut self.prefixes);
        self.prefixes = prefixes
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.chars_per_token == 0 {
            return Err(ConfigError::ValidationError(
                "tokens.chars_per_token must be > 0".into(),
            ));
        }

        if let Some(bad) = self
            .prefixes
            .keys()
            .find(|k| k.chars().count() != 1 || !k.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(ConfigError::ValidationError(format!(
                "prefix keys must be a single letter, got {bad:?}"
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for hmem_core::Error {
    fn from(err: ConfigError) -> Self {
        hmem_core::Error::Config {
            message: err.to_string(),
        }
    }
}
