//! YAML configuration for the animation.
//!
//! Precedence is CLI > file > defaults. Every field has a default, so an empty
//! file (or no file at all) yields the standard 800x500 chart ticking every
//! 100 ms.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartLayout, Margin};
use crate::data::DEFAULT_BASE_YEAR;
use crate::error::{Error, Result};

/// Timer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Calendar year of the first timeline entry, used when the dataset
    /// carries no year labels.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
}

fn default_tick_ms() -> u64 {
    100
}
fn default_base_year() -> i32 {
    DEFAULT_BASE_YEAR
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { tick_ms: default_tick_ms(), base_year: default_base_year() }
    }
}

/// Margins around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    /// Left margin; holds the y axis and its label.
    #[serde(default = "default_margin_left")]
    pub left: u32,
    /// Right margin.
    #[serde(default = "default_margin_small")]
    pub right: u32,
    /// Top margin.
    #[serde(default = "default_margin_small")]
    pub top: u32,
    /// Bottom margin; holds the x axis and its label.
    #[serde(default = "default_margin_bottom")]
    pub bottom: u32,
}

fn default_margin_left() -> u32 {
    100
}
fn default_margin_small() -> u32 {
    10
}
fn default_margin_bottom() -> u32 {
    100
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            left: default_margin_left(),
            right: default_margin_small(),
            top: default_margin_small(),
            bottom: default_margin_bottom(),
        }
    }
}

impl From<MarginConfig> for Margin {
    fn from(m: MarginConfig) -> Self {
        Self { left: m.left, right: m.right, top: m.top, bottom: m.bottom }
    }
}

/// Chart geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Outer width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Outer height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Margins around the plot area.
    #[serde(default)]
    pub margin: MarginConfig,
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    500
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { width: default_width(), height: default_height(), margin: MarginConfig::default() }
    }
}

impl ChartConfig {
    /// Build the chart layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins leave no plot area.
    pub fn layout(&self) -> Result<ChartLayout> {
        ChartLayout::new(self.width, self.height, self.margin.into())
    }
}

/// Dataset location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON dataset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long to wait for the dataset before giving up, in milliseconds.
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

fn default_load_timeout_ms() -> u64 {
    10_000
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: None, load_timeout_ms: default_load_timeout_ms() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Timer settings.
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Chart geometry.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Dataset location.
    #[serde(default)]
    pub data: DataConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            animation: AnimationConfig::default(),
            chart: ChartConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file cannot be read, or a
    /// parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the offending line number.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "using default configuration");
            Self::default()
        })
    }

    /// `<config dir>/gapminder-viz/config.yaml`, if the platform has a
    /// config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gapminder-viz").join("config.yaml"))
    }

    /// Checks values that parse but cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] or [`Error::InvalidDimensions`].
    pub fn validate(&self) -> Result<()> {
        if self.animation.tick_ms == 0 {
            return Err(Error::ConfigInvalid {
                key: "animation.tick_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.data.load_timeout_ms == 0 {
            return Err(Error::ConfigInvalid {
                key: "data.load_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        self.chart.layout()?;
        Ok(())
    }

    /// Tick period.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.animation.tick_ms)
    }

    /// Dataset load timeout.
    #[must_use]
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.data.load_timeout_ms)
    }
}
