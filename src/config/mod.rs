//! Configuration management for Strata
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines settings for window defaults, snap zones,
//! and layout persistence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct containing all Strata settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StrataConfig {
    /// Window defaults (fallback geometry for new windows)
    #[serde(default)]
    pub window: WindowConfig,

    /// Snap-zone geometry settings
    #[serde(default)]
    pub zone: ZoneConfig,

    /// Layout persistence settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Window defaults applied when a registration descriptor omits geometry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Fallback x position for new windows
    pub default_x: i32,

    /// Fallback y position for new windows
    pub default_y: i32,

    /// Fallback width for new windows (pixels)
    pub default_width: u32,

    /// Fallback height for new windows (pixels)
    pub default_height: u32,
}

/// The rectangular region windows are placed against (the usable screen
/// area, excluding panels and docks).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Snap-zone configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneConfig {
    /// Work area that zone geometry is computed against
    pub work_area: WorkArea,

    /// Gap between zone edges and the work-area border (pixels)
    pub gap: u32,
}

/// Layout persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Directory used by the file-backed layout store
    pub directory: String,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            default_x: 0,
            default_y: 0,
            default_width: 400,
            default_height: 300,
        }
    }
}

impl Default for WorkArea {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            work_area: WorkArea::default(),
            gap: 10,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            directory: "~/.local/share/strata/layouts".to_string(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { debug: false }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.to_string_lossy().starts_with('~') {
        let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
        Ok(Path::new(&home).join(path.strip_prefix("~").unwrap_or(path)))
    } else {
        Ok(path.to_path_buf())
    }
}

impl StrataConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path)?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: StrataConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.window.default_width == 0 || self.window.default_height == 0 {
            anyhow::bail!("Invalid window defaults: width and height must be non-zero");
        }

        let area = &self.zone.work_area;
        if area.width == 0 || area.height == 0 {
            anyhow::bail!("Invalid work area: width and height must be non-zero");
        }

        // Halving the work area must leave room for the gaps on both sides
        let min_dim = area.width.min(area.height);
        if self.zone.gap * 3 >= min_dim {
            anyhow::bail!(
                "Invalid zone gap: {} is too large for a {}x{} work area",
                self.zone.gap,
                area.width,
                area.height
            );
        }

        if self.layout.directory.is_empty() {
            anyhow::bail!("Invalid layout directory: must not be empty");
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
