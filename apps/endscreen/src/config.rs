//! Configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/endscreen/config.toml`
//! - Windows: `%APPDATA%/endscreen/config.toml`
//!
//! Command line flags override file values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Game log file to follow.
    #[serde(default = "default_log")]
    pub log: PathBuf,

    /// Seconds between polls for new log content.
    #[serde(default = "default_log_interval")]
    pub log_interval: f64,

    /// End screen document shown when a mission completes.
    #[serde(default = "default_screen")]
    pub screen: String,
}

fn default_log() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let local = std::env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| r"C:\Users\Default\AppData\Local".into());
        PathBuf::from(local).join("Warframe").join("EE.log")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("Warframe")
            .join("EE.log")
    }
}

fn default_log_interval() -> f64 {
    1.0
}

fn default_screen() -> String {
    "file:///default.html".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: default_log(),
            log_interval: default_log_interval(),
            screen: default_screen(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies command line flags on top of the file values.
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(log) = &args.log {
            self.log = log.clone();
        }
        if let Some(interval) = args.log_interval {
            self.log_interval = interval;
        }
        if let Some(screen) = &args.screen {
            self.screen = screen.clone();
        }
        self
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("endscreen").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("endscreen")
            .join("config.toml"))
    }
}
