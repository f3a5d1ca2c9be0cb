//! Configuration for crash reporting.
//!
//! Loads configuration from:
//! 1. `~/.crashcatcher/config.toml` (global)
//! 2. `.crashcatcher/config.toml` (project-local, overrides global)
//! 3. Environment variables (highest priority)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::error::CrashError;

/// Global config instance
static CONFIG: Lazy<RwLock<Config>> =
    Lazy::new(|| RwLock::new(Config::load().unwrap_or_default()));

/// Get global config (read-only)
pub fn config() -> RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reload config from disk
pub fn reload() -> Result<(), CrashError> {
    let new_config = Config::load()?;
    *CONFIG.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = new_config;
    Ok(())
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub termination: TerminationConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, CrashError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("Loading global config from {:?}", global_path);
                let contents = std::fs::read_to_string(&global_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        let project_path = Path::new(".crashcatcher/config.toml");
        if project_path.exists() {
            debug!("Loading project config from {:?}", project_path);
            let contents = std::fs::read_to_string(project_path)?;
            let project_config: Config = toml::from_str(&contents)?;
            config.merge(project_config);
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Global config path: ~/.crashcatcher/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".crashcatcher/config.toml"))
    }

    /// Merge a project config over this one. Report layout and exit code are
    /// replaced wholesale; storage paths only when the project sets them.
    fn merge(&mut self, other: Config) {
        self.report = other.report;
        self.termination = other.termination;
        if other.storage.cache_dir.is_some() {
            self.storage.cache_dir = other.storage.cache_dir;
        }
        if other.storage.external_cache_dir.is_some() {
            self.storage.external_cache_dir = other.storage.external_cache_dir;
        }
        self.storage.external_removable = other.storage.external_removable;
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CRASHCATCHER_CACHE_DIR") {
            self.storage.cache_dir = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("CRASHCATCHER_EXTERNAL_CACHE_DIR") {
            self.storage.external_cache_dir = Some(PathBuf::from(path));
        }
        if let Ok(code) = std::env::var("CRASHCATCHER_EXIT_CODE") {
            if let Ok(n) = code.parse() {
                self.termination.exit_code = n;
            }
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        Config::default().to_toml().unwrap_or_default()
    }
}

/// Report file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Subdirectory appended to the cache root
    pub dir_name: String,
    pub file_prefix: String,
    pub file_extension: String,
    /// chrono format string for both the file name and the first report line
    pub timestamp_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir_name: crate::path::CRASH_LOG_DIR.to_string(),
            file_prefix: "Crash".to_string(),
            file_extension: ".txt".to_string(),
            timestamp_format: "%Y年%m月%d日%H时%M分%S秒".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationConfig {
    /// Exit status used when no previous fault handler exists
    pub exit_code: i32,
    /// Forward to the std panic hook that was installed before the crash
    /// handler instead of exiting with `exit_code`
    pub chain_panic_hook: bool,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            exit_code: 10,
            chain_panic_hook: false,
        }
    }
}

/// Storage locations used by `HostContext`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Internal cache root (None = platform cache dir)
    pub cache_dir: Option<PathBuf>,
    /// External cache root, e.g. on removable media
    pub external_cache_dir: Option<PathBuf>,
    pub external_removable: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            external_cache_dir: None,
            external_removable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.dir_name, "crashLogs");
        assert_eq!(config.report.file_prefix, "Crash");
        assert_eq!(config.report.file_extension, ".txt");
        assert_eq!(config.termination.exit_code, 10);
        assert!(!config.termination.chain_panic_hook);
        assert!(config.storage.external_removable);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[termination]"));
        assert!(toml_str.contains("exit_code = 10"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: Config = toml::from_str("[termination]\nexit_code = 3\n").unwrap();
        assert_eq!(parsed.termination.exit_code, 3);
        assert_eq!(parsed.report.dir_name, "crashLogs");
    }

    #[test]
    fn test_merge_keeps_global_paths_when_project_omits_them() {
        let mut global = Config::default();
        global.storage.cache_dir = Some(PathBuf::from("/global/cache"));

        let mut project = Config::default();
        project.termination.exit_code = 42;
        global.merge(project);

        assert_eq!(global.storage.cache_dir, Some(PathBuf::from("/global/cache")));
        assert_eq!(global.termination.exit_code, 42);
    }
}
