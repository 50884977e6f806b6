use crate::index::build::DEFAULT_IGNORED_DIRS;
use crate::index::types::{DEFAULT_MAX_ANCHOR_LEN, IndexConfig};
use crate::query::{SearchOptions, SortOrder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "subdex";
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "SUBDEX_CONFIG";

/// Application configuration stored in the user config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Longest indexed substring, in chars
    #[serde(default = "default_max_anchor_len")]
    pub max_anchor_len: usize,

    /// Keep bookkeeping needed to remove names (used by the picker)
    #[serde(default = "default_support_remove")]
    pub support_remove: bool,

    /// Result ordering
    #[serde(default)]
    pub sort: SortOrder,

    /// Maximum results printed (0 = unlimited)
    #[serde(default)]
    pub limit: usize,

    /// Highlight matches in terminal output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Directory names skipped when indexing paths with `--dir`
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,
}

fn default_max_anchor_len() -> usize {
    DEFAULT_MAX_ANCHOR_LEN
}

fn default_support_remove() -> bool {
    true
}

fn default_color() -> bool {
    true
}

fn default_ignored_dirs() -> Vec<String> {
    DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_anchor_len: default_max_anchor_len(),
            support_remove: default_support_remove(),
            sort: SortOrder::default(),
            limit: 0,
            color: default_color(),
            ignored_dirs: default_ignored_dirs(),
        }
    }
}

impl AppConfig {
    /// Load config from the config directory, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Load config from an explicit path, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<PathBuf> {
        let path = get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Index parameters. A zero anchor length is raised to one.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(self.max_anchor_len.max(1), self.support_remove)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            sort: self.sort,
            limit: self.limit,
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(get_app_config_dir()?.join(CONFIG_FILE))
}

/// Get the application config directory (not created)
pub fn get_app_config_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else {
        // Linux/Unix: XDG_CONFIG_HOME or ~/.config; Windows: %APPDATA%
        dirs::config_dir()
    };

    let base = base.context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}
