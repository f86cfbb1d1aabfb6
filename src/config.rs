//! Configuration primitives for the questionnaire assistant.
//!
//! Stored in a machine-readable TOML file located at:
//!   `$FORMBOT_HOME/config/config.toml` when the variable is set
//!   `<OS data dir>/FormBot/config/config.toml` otherwise
//!
//! The config tracks where the profile table lives, how the store caches and
//! when answers are persisted, plus the validation limits applied to each
//! questionnaire step. A missing file yields defaults.

use serde::{Deserialize, Serialize};

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Profile table location and store behavior.
    #[serde(default)]
    pub store: StoreSettings,
    /// Limits and keywords used by the step validators.
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// How the store keeps its in-process cache coherent after a save.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// The merged record replaces the cache entry.
    #[default]
    WriteThrough,
    /// The saved key is evicted; the next load re-reads the table.
    Invalidate,
    /// Every load reads the table.
    Disabled,
}

/// When accepted answers reach the profile table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Each accepted answer is saved as soon as it is validated.
    #[default]
    Immediate,
    /// Answers stay in the session until the user confirms the review.
    Deferred,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Table file name, resolved against the workspace root when relative.
    #[serde(default = "default_table_file")]
    pub table_file: String,
    #[serde(default)]
    pub cache_policy: CachePolicy,
    #[serde(default)]
    pub persist_policy: PersistPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            table_file: default_table_file(),
            cache_policy: CachePolicy::default(),
            persist_policy: PersistPolicy::default(),
        }
    }
}

fn default_table_file() -> String {
    "user_profiles.json".into()
}

/// Validation limits for each questionnaire step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "default_text_min")]
    pub name_min_chars: usize,
    #[serde(default = "default_text_max")]
    pub name_max_chars: usize,
    #[serde(default = "default_age_min")]
    pub age_min: u8,
    #[serde(default = "default_age_max")]
    pub age_max: u8,
    #[serde(default = "default_text_min")]
    pub city_min_chars: usize,
    #[serde(default = "default_text_max")]
    pub city_max_chars: usize,
    #[serde(default = "default_description_min_chars")]
    pub description_min_chars: usize,
    #[serde(default = "default_description_min_words")]
    pub description_min_words: usize,
    /// Case-insensitive keyword that skips the city and description steps.
    #[serde(default = "default_skip_keyword")]
    pub skip_keyword: String,
    /// Substrings rejected anywhere in a description (case-insensitive).
    #[serde(default = "default_forbidden_words")]
    pub forbidden_words: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            name_min_chars: default_text_min(),
            name_max_chars: default_text_max(),
            age_min: default_age_min(),
            age_max: default_age_max(),
            city_min_chars: default_text_min(),
            city_max_chars: default_text_max(),
            description_min_chars: default_description_min_chars(),
            description_min_words: default_description_min_words(),
            skip_keyword: default_skip_keyword(),
            forbidden_words: default_forbidden_words(),
        }
    }
}

const fn default_text_min() -> usize {
    2
}

const fn default_text_max() -> usize {
    50
}

const fn default_age_min() -> u8 {
    12
}

const fn default_age_max() -> u8 {
    99
}

const fn default_description_min_chars() -> usize {
    10
}

const fn default_description_min_words() -> usize {
    2
}

fn default_skip_keyword() -> String {
    "skip".into()
}

fn default_forbidden_words() -> Vec<String> {
    vec!["spam".into(), "advertising".into(), "obscene".into()]
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

use anyhow::{Context, Result};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Returns the root directory where FormBot stores data.
///
/// Order of precedence:
/// 1. `FORMBOT_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("FORMBOT_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("FormBot"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}

impl StoreSettings {
    /// Absolute location of the profile table for this install.
    pub fn table_path(&self) -> Result<PathBuf> {
        let path = PathBuf::from(&self.table_file);
        if path.is_absolute() {
            return Ok(path);
        }
        Ok(workspace_root()?.join(path))
    }
}
