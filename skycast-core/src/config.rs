use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::model::UnitSystem;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    ///
    /// Example TOML:
    /// api_key = "..."
    /// units = "metric"
    pub api_key: Option<String>,

    /// Preferred unit system used when no explicit one is given.
    pub units: Option<UnitSystem>,
}

impl Config {
    /// Resolve the API key: the environment variable wins over the config
    /// file, so CI and one-off runs don't need a stored credential.
    pub fn api_key(&self) -> Option<String> {
        match env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(key),
            _ => self.api_key.clone(),
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = Some(units);
    }

    /// Preferred unit system, metric when never configured.
    pub fn units_or_default(&self) -> UnitSystem {
        self.units.unwrap_or_default()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_key_and_metric_units() {
        let cfg = Config::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.units_or_default(), UnitSystem::Metric);
    }

    #[test]
    fn set_api_key_and_units() {
        let mut cfg = Config::default();

        cfg.set_api_key("OPEN_KEY".into());
        cfg.set_units(UnitSystem::Imperial);

        assert_eq!(cfg.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(cfg.units_or_default(), UnitSystem::Imperial);
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.set_units(UnitSystem::Imperial);

        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml).expect("parse");

        assert_eq!(parsed.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(parsed.units, Some(UnitSystem::Imperial));
    }

    #[test]
    fn units_serialize_lowercase() {
        let mut cfg = Config::default();
        cfg.set_units(UnitSystem::Metric);

        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        assert!(toml.contains("units = \"metric\""));
    }
}
