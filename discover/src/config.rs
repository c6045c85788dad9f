//! Configuration for discover.
//!
//! DISCOVER_ROOT resolution order:
//! 1. Explicit path passed to Config::load_from()
//! 2. DISCOVER_ROOT environment variable
//! 3. Default: the platform data directory (e.g. ~/.local/share/discover)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of rows requested per page when a payload is built.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Relative window used when no datetime selection is present anywhere.
pub const DEFAULT_STATS_PERIOD: &str = "14d";

/// Discover configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub root: PathBuf,

    /// Rows per page for events payloads.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Relative window applied when neither view nor location has one.
    #[serde(default = "default_stats_period")]
    pub default_stats_period: String,

    /// Log level used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Date display preferences.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// User preferences for rendering dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Offset from UTC in minutes applied to displayed dates.
    #[serde(default)]
    pub timezone_offset_minutes: i32,

    /// Render times on a 24 hour clock.
    #[serde(default)]
    pub clock_24_hours: bool,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_stats_period() -> String {
    DEFAULT_STATS_PERIOD.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_root(PathBuf::new())
    }
}

impl Config {
    /// Create a config rooted at the given directory with default values.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            per_page: default_per_page(),
            default_stats_period: default_stats_period(),
            log_level: default_log_level(),
            display: DisplayConfig::default(),
        }
    }

    /// Load config from DISCOVER_ROOT/config.toml, or fall back to defaults.
    pub fn load() -> Result<Self> {
        let root = resolve_root()?;
        Self::load_from(&root)
    }

    /// Load config from a specific root directory.
    pub fn load_from(root: &Path) -> Result<Self> {
        let config_path = root.join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
            config.root = root.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::with_root(root))
        }
    }

    /// Save config to DISCOVER_ROOT/config.toml.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(self.config_path(), contents)?;
        Ok(())
    }

    /// Path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}

/// Resolve DISCOVER_ROOT using the standard resolution order.
fn resolve_root() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("DISCOVER_ROOT") {
        return Ok(PathBuf::from(path));
    }

    if let Some(proj_dirs) = ProjectDirs::from("", "", "discover") {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;
    Ok(PathBuf::from(home).join(".local/share/discover"))
}
