//! Configuration loading and resolution
//!
//! All tunables live in one explicit [`Config`] passed into components at
//! construction. Resolution follows the priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MCB_CONFIG` environment variable
//! 3. Platform config file (`~/.config/mcb/mcb-ui.toml` or equivalent)
//! 4. Compiled defaults (fallback)

use crate::types::ContentItem;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind host for the HTTP service
    pub host: String,
    /// Bind port for the HTTP service
    pub port: u16,
    /// Cache lifetime advertised on query responses (seconds).
    /// Pass-through value; the aggregation core does not interpret it.
    pub cache_max_age_secs: u64,
    /// Budget for each individual source call during fan-out (milliseconds).
    /// Must be positive; zero is a configuration error, never coerced.
    pub per_source_timeout_ms: u64,
    pub filter: FilterConfig,
    pub auth: AuthConfig,
    /// Ordered provider list. Fan-out queries every entry; merged results
    /// follow this order.
    pub sources: Vec<SourceConfig>,
    /// Pre-fetched weekly schedule entries served by the calendar listing
    pub schedule: Vec<ScheduleEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5860,
            cache_max_age_secs: 300,
            per_source_timeout_ms: 20_000,
            filter: FilterConfig::default(),
            auth: AuthConfig::default(),
            sources: Vec::new(),
            schedule: Vec::new(),
        }
    }
}

/// Category blocklist configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// When false, filtering is disabled entirely
    pub enabled: bool,
    /// Category-label substrings to block
    pub blocked_categories: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            blocked_categories: [
                "伦理片",
                "福利",
                "写真",
                "里番动漫",
                "门事件",
                "制服诱惑",
                "无码",
                "网红主播",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Session authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret for session token digests.
    /// `Some(0)` disables auth checking entirely; `None` means a random
    /// secret is generated at startup.
    pub shared_secret: Option<i64>,
    /// Maximum session token age (seconds)
    pub session_max_age_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            shared_secret: None,
            session_max_age_secs: 86_400,
        }
    }
}

/// One content provider entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique source key (also usable as a direct-browse query term)
    pub key: String,
    /// Human-readable name for diagnostics
    pub name: String,
    /// Base URL of the provider's list API
    pub api_url: String,
}

/// One pre-fetched schedule entry: a catalog item pinned to a weekday
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Weekday name, e.g. "mon" / "monday" (case-insensitive)
    pub weekday: String,
    #[serde(flatten)]
    pub item: ContentItem,
}

impl Config {
    /// Resolve configuration following the priority order documented above
    pub fn resolve(cli_path: Option<&Path>) -> Result<Config> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_path {
            info!("Loading config from command-line path: {}", path.display());
            return Self::load(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var("MCB_CONFIG") {
            info!("Loading config from MCB_CONFIG: {}", path);
            return Self::load(Path::new(&path));
        }

        // Priority 3: Platform config file
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                info!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }

        // Priority 4: Compiled defaults
        info!("No config file found, using compiled defaults");
        Ok(Config::default())
    }

    /// Default configuration file path for the platform
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mcb").join("mcb-ui.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> Result<()> {
        if self.per_source_timeout_ms == 0 {
            return Err(Error::Config(
                "per_source_timeout_ms must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.key.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Source \"{}\" has an empty key",
                    source.name
                )));
            }
            if source.api_url.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Source \"{}\" has an empty api_url",
                    source.key
                )));
            }
            if !seen.insert(source.key.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate source key: {}",
                    source.key
                )));
            }
        }

        Ok(())
    }
}
