//! Configuration schema for modcache
//!
//! Configuration is stored at `~/.config/modcache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache location and source settings
    pub cache: CacheConfig,

    /// Version-control client settings
    pub git: GitConfig,

    /// Module install settings
    pub install: InstallConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory (defaults to the platform cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Source root that short module names are expanded against
    pub default_source: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: None,
            default_source: "https://github.com/gameclosure/".to_string(),
        }
    }
}

/// Git client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Git executable
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

/// Install configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Run the descriptor's install script after a version switch
    pub run_scripts: bool,

    /// Key under the descriptor's `scripts` table to run
    pub script: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            run_scripts: true,
            script: "install".to_string(),
        }
    }
}
