// src/config.rs
//! Configuration management for the mapper front end

use crate::error::{GpsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest log accepted by default, in bytes
pub const DEFAULT_MAX_INPUT_BYTES: usize = 4_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub max_input_bytes: usize,
    /// View shown when a log yields no track
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_zoom: u8,
    pub max_zoom: u8,
    /// Map widget size in pixels, used to pick a zoom level that fits the track
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            default_latitude: 34.14,
            default_longitude: -118.15,
            default_zoom: 12,
            max_zoom: 18,
            viewport_width: 500,
            viewport_height: 300,
        }
    }
}

impl MapperConfig {
    /// Load configuration from the user config file, or defaults if there is none
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| GpsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| GpsError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GpsError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| GpsError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| GpsError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| GpsError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("nmea-mapper").join("config.json"))
    }

    /// Check values that would make the front end misbehave
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(GpsError::Config("max_input_bytes must be positive".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.default_latitude) {
            return Err(GpsError::Config(format!(
                "default_latitude {} out of range",
                self.default_latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.default_longitude) {
            return Err(GpsError::Config(format!(
                "default_longitude {} out of range",
                self.default_longitude
            )));
        }
        if self.default_zoom > self.max_zoom {
            return Err(GpsError::Config(format!(
                "default_zoom {} exceeds max_zoom {}",
                self.default_zoom, self.max_zoom
            )));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(GpsError::Config("viewport size must be positive".to_string()));
        }
        Ok(())
    }

    /// Update the size limit applied before parsing
    pub fn update_max_input_bytes(&mut self, limit: usize) {
        self.max_input_bytes = limit;
    }

    /// Update the fallback view
    pub fn update_default_view(&mut self, latitude: f64, longitude: f64, zoom: u8) {
        self.default_latitude = latitude;
        self.default_longitude = longitude;
        self.default_zoom = zoom;
    }
}
