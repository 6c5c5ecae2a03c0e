//! Configuration resolution for QuickRef.
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/quickref/settings.json)
//! 3. Environment variables (highest priority)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default cache duration in hours.
const DEFAULT_CACHE_HOURS: u64 = 12;

/// User-facing settings, as persisted in the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub enable_cheat_sh: bool,
    pub enable_dev_hints: bool,
    pub enable_tldr: bool,
    /// Cache duration as a genuine number of hours, not a toggle.
    pub cache_duration_hours: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_cheat_sh: true,
            enable_dev_hints: true,
            enable_tldr: true,
            cache_duration_hours: DEFAULT_CACHE_HOURS,
        }
    }
}

impl Settings {
    /// Snapshot these settings into the per-call options the engine takes.
    pub fn to_source_options(&self) -> SourceOptions {
        SourceOptions {
            enable_cheat_sh: self.enable_cheat_sh,
            enable_dev_hints: self.enable_dev_hints,
            enable_tldr: self.enable_tldr,
            cache_duration: Duration::from_secs(self.cache_duration_hours * 60 * 60),
        }
    }
}

/// Immutable per-call snapshot controlling which sources are queried and how
/// long responses are cached.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub enable_cheat_sh: bool,
    pub enable_dev_hints: bool,
    pub enable_tldr: bool,
    pub cache_duration: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Settings::default().to_source_options()
    }
}

/// Load settings with hierarchical resolution.
pub fn load_settings() -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(path) = global_settings_path() {
        if path.exists() {
            settings = load_settings_file(&path)?;
        }
    }

    apply_env_overrides(&mut settings);

    Ok(settings)
}

/// Path of the global settings file, if a config directory exists.
pub fn global_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quickref").join("settings.json"))
}

fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Some(v) = env_bool("QUICKREF_ENABLE_CHEAT_SH") {
        settings.enable_cheat_sh = v;
    }
    if let Some(v) = env_bool("QUICKREF_ENABLE_DEV_HINTS") {
        settings.enable_dev_hints = v;
    }
    if let Some(v) = env_bool("QUICKREF_ENABLE_TLDR") {
        settings.enable_tldr = v;
    }
    if let Ok(raw) = std::env::var("QUICKREF_CACHE_HOURS") {
        if let Ok(hours) = raw.parse::<u64>() {
            settings.cache_duration_hours = hours;
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    match std::env::var(name).ok()?.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_all_sources_with_12h_cache() {
        let settings = Settings::default();
        assert!(settings.enable_cheat_sh);
        assert!(settings.enable_dev_hints);
        assert!(settings.enable_tldr);
        assert_eq!(settings.cache_duration_hours, 12);
    }

    #[test]
    fn source_options_carry_duration_in_seconds() {
        let options = Settings::default().to_source_options();
        assert_eq!(options.cache_duration, Duration::from_secs(12 * 60 * 60));
    }

    #[test]
    fn partial_settings_file_fills_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"enable_tldr": false}"#).unwrap();
        assert!(!settings.enable_tldr);
        assert!(settings.enable_cheat_sh);
        assert_eq!(settings.cache_duration_hours, 12);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            enable_cheat_sh: false,
            cache_duration_hours: 3,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.enable_cheat_sh);
        assert_eq!(back.cache_duration_hours, 3);
    }

    #[test]
    fn load_settings_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_settings_file(&path).is_err());
    }
}
