//! Configuration for LabKit
//!
//! Supports JSON and TOML files stored in platform-specific directories.
//!
//! Configuration is organized into sections:
//! - Motion (feed rates and dwell used in generated programs)
//! - Layout (default bed, minimum bed dimension, clone offset)
//! - Controller (Moonraker endpoint)
//! - Fluidics (timed wash limits)
//! - Storage (where snapshots live)

use crate::error::{SettingsError, SettingsResult};
use labkit_core::MAX_WASH_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "labkit";

/// Feed rates and dwell for generated moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// XY feed in mm/min
    pub feed_xy: f64,
    /// Z feed in mm/min
    pub feed_z: f64,
    /// Settling pause after each move in ms
    pub dwell_ms: u64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            feed_xy: 3000.0,
            feed_z: 1500.0,
            dwell_ms: 500,
        }
    }
}

/// Layout defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub bed_width: f64,
    pub bed_height: f64,
    /// Smallest accepted bed dimension in mm
    pub min_bed_dimension: f64,
    pub clone_offset_x: f64,
    pub clone_offset_y: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            bed_width: 380.0,
            bed_height: 480.0,
            min_bed_dimension: 100.0,
            clone_offset_x: 20.0,
            clone_offset_y: 20.0,
        }
    }
}

/// Moonraker endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub host: String,
    pub port: u16,
    /// Delay before each per-command socket is closed
    pub close_delay_ms: u64,
}

impl ControllerSettings {
    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}/websocket", self.host, self.port)
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7125,
            close_delay_ms: 1000,
        }
    }
}

/// Timed wash limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidicsSettings {
    pub default_wash_secs: u64,
    pub max_wash_secs: u64,
}

impl Default for FluidicsSettings {
    fn default() -> Self {
        Self {
            default_wash_secs: 30,
            max_wash_secs: MAX_WASH_SECS,
        }
    }
}

/// Snapshot locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// Configured directory or `<data_dir>/labkit`
    pub fn resolve_data_dir(&self) -> SettingsResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| {
                    SettingsError::ConfigDirectory("no platform data directory".to_string())
                }),
        }
    }

    pub fn layout_path(&self) -> SettingsResult<PathBuf> {
        Ok(self.resolve_data_dir()?.join("layout.json"))
    }

    pub fn sequences_path(&self) -> SettingsResult<PathBuf> {
        Ok(self.resolve_data_dir()?.join("sequences.json"))
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub motion: MotionSettings,
    pub layout: LayoutSettings,
    pub controller: ControllerSettings,
    pub fluidics: FluidicsSettings,
    pub storage: StorageSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (expected .json or .toml)",
            path.display()
        ))),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/labkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no platform config directory".into()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let motion = &self.motion;
        if !(motion.feed_xy.is_finite() && motion.feed_xy > 0.0) {
            return Err(SettingsError::invalid("motion.feed_xy", "must be > 0"));
        }
        if !(motion.feed_z.is_finite() && motion.feed_z > 0.0) {
            return Err(SettingsError::invalid("motion.feed_z", "must be > 0"));
        }

        let layout = &self.layout;
        if !(layout.min_bed_dimension.is_finite() && layout.min_bed_dimension > 0.0) {
            return Err(SettingsError::invalid(
                "layout.min_bed_dimension",
                "must be > 0",
            ));
        }
        for (key, value) in [
            ("layout.bed_width", layout.bed_width),
            ("layout.bed_height", layout.bed_height),
        ] {
            if !value.is_finite() || value < layout.min_bed_dimension {
                return Err(SettingsError::invalid(
                    key,
                    format!("must be at least {}mm", layout.min_bed_dimension),
                ));
            }
        }
        if !(layout.clone_offset_x.is_finite() && layout.clone_offset_y.is_finite()) {
            return Err(SettingsError::invalid("layout.clone_offset", "must be finite"));
        }

        if self.controller.host.trim().is_empty() {
            return Err(SettingsError::invalid("controller.host", "must not be empty"));
        }
        if self.controller.port == 0 {
            return Err(SettingsError::invalid("controller.port", "must be > 0"));
        }

        let fluidics = &self.fluidics;
        if fluidics.max_wash_secs == 0 || fluidics.max_wash_secs > MAX_WASH_SECS {
            return Err(SettingsError::invalid(
                "fluidics.max_wash_secs",
                format!("must be between 1 and {MAX_WASH_SECS}"),
            ));
        }
        if fluidics.default_wash_secs == 0 || fluidics.default_wash_secs > fluidics.max_wash_secs
        {
            return Err(SettingsError::invalid(
                "fluidics.default_wash_secs",
                format!("must be between 1 and {}", fluidics.max_wash_secs),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.controller.websocket_url(),
            "ws://localhost:7125/websocket"
        );
        assert_eq!(config.fluidics.default_wash_secs, 30);
    }

    #[test]
    fn test_validate_rejects_zero_feed() {
        let mut config = Config::new();
        config.motion.feed_xy = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_small_default_bed() {
        let mut config = Config::new();
        config.layout.bed_height = 80.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("layout.bed_height"));
    }

    #[test]
    fn test_validate_rejects_wash_default_above_max() {
        let mut config = Config::new();
        config.fluidics.default_wash_secs = 301;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.fluidics.max_wash_secs = MAX_WASH_SECS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fluidics.max_wash_secs"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[controller]\nhost = \"printer.local\"\n").unwrap();
        assert_eq!(config.controller.host, "printer.local");
        assert_eq!(config.controller.port, 7125);
        assert_eq!(config.motion, MotionSettings::default());
    }

    #[test]
    fn test_storage_override() {
        let storage = StorageSettings {
            data_dir: Some(PathBuf::from("/tmp/labkit-test")),
        };
        assert_eq!(
            storage.sequences_path().unwrap(),
            PathBuf::from("/tmp/labkit-test/sequences.json")
        );
    }
}
