//! TOML-based application configuration.
//!
//! Stores the resolution window, scan interval, and the award table.
//! Configuration is stored at `~/.config/careledger/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Goal resolution timing configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Seconds between periodic resolution scans.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
    /// Hours a goal has to be completed before it is marked overdue; also the
    /// grace window for un-checking a completed goal and for deletion refunds.
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            window_hours: default_window_hours(),
        }
    }
}

/// Point values granted by goal transitions.
///
/// Reversals (deletion refund, un-check refund) are the negation of the
/// corresponding award, so they are not configured separately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AwardConfig {
    /// Points granted when a goal is created.
    #[serde(default = "default_create_award")]
    pub create: i64,
    /// Points granted when a goal is completed within the window.
    #[serde(default = "default_complete_award")]
    pub complete: i64,
    /// Points applied (normally negative) when a goal passes the window
    /// without being completed.
    #[serde(default = "default_overdue_award")]
    pub overdue: i64,
}

impl Default for AwardConfig {
    fn default() -> Self {
        Self {
            create: default_create_award(),
            complete: default_complete_award(),
            overdue: default_overdue_award(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/careledger/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolution: ResolutionConfig,
    #[serde(default)]
    pub awards: AwardConfig,
}

fn default_scan_interval_secs() -> u64 {
    60
}

fn default_window_hours() -> i64 {
    24
}

fn default_create_award() -> i64 {
    5
}

fn default_complete_award() -> i64 {
    10
}

fn default_overdue_award() -> i64 {
    -10
}

impl Config {
    /// Path of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, substituting defaults when the file is
    /// missing or malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(toml::from_str(&content).unwrap_or_default())
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.resolution.scan_interval_secs, 60);
        assert_eq!(config.resolution.window_hours, 24);
        assert_eq!(config.awards.create, 5);
        assert_eq!(config.awards.complete, 10);
        assert_eq!(config.awards.overdue, -10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [awards]
            create = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.awards.create, 3);
        assert_eq!(config.awards.complete, 10);
        assert_eq!(config.resolution.window_hours, 24);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.resolution.scan_interval_secs = 10;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.resolution.scan_interval_secs, 10);
    }
}
