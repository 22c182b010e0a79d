//! Drawer settings
//!
//! Fonts, stroke, colours and builder spacing, read from a JSON file. Every
//! field has a default so a partial file only overrides what it names.

use crate::error::FormulaResult;
use crate::render::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the default settings file
pub const CONFIG_ENV_VAR: &str = "FORMULA_DRAWER_CONFIG";

/// Main settings container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DrawerSettings {
    pub font: FontSettings,
    pub stroke: StrokeSettings,
    pub colors: ColorSettings,
    pub layout: LayoutSettings,
}

/// Formula font selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontSettings {
    /// Family name, or a generic name such as "serif"
    pub family: String,
    /// Font file to load instead of a discovered family
    pub path: Option<PathBuf>,
    /// Size in pixels of unscaled text
    pub size: f32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "serif".to_string(),
            path: None,
            size: 50.0,
        }
    }
}

/// Stroke used for dividers and bracket glyphs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrokeSettings {
    /// Width in units at scale 1
    pub width: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self { width: 3.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorSettings {
    pub foreground: Color,
    pub background: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

/// Spacing used by the box builder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// How far exponents are raised and indices lowered
    pub script_shift: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { script_shift: 20.0 }
    }
}

/// Reads and writes [`DrawerSettings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    path: PathBuf,
}

impl SettingsLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for the file named by [`CONFIG_ENV_VAR`], if set
    pub fn from_env() -> Option<Self> {
        std::env::var_os(CONFIG_ENV_VAR).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, or return defaults if the file doesn't exist
    pub fn load(&self) -> FormulaResult<DrawerSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(DrawerSettings::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<DrawerSettings>(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings file {}, using defaults: {}",
                    self.path.display(),
                    e
                );
                Ok(DrawerSettings::default())
            }
        }
    }

    pub fn save(&self, settings: &DrawerSettings) -> FormulaResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
