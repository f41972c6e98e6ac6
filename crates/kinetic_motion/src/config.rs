//! Motion configuration
//!
//! A single TOML document carrying the defaults for every hook. All sections
//! and fields are optional:
//!
//! ```toml
//! [screen]
//! width = 390.0
//! height = 844.0
//!
//! [entrance]
//! duration_ms = 600.0
//! translate_y_offset = 30.0
//!
//! [bottom_sheet]
//! duration_ms = 300.0
//! close_duration_ms = 250.0
//!
//! [readiness]
//! delay_ms = 500.0
//! frames = 3
//!
//! [presets]
//! timing = "normal"
//! spring = "springGentle"
//! ```

use crate::bottom_sheet::BottomSheetOptions;
use crate::entrance::EntranceOptions;
use crate::error::{MotionError, Result};
use crate::readiness::ReadinessConfig;
use crate::splash::SplashOptions;
use kinetic_animation::{SpringPresetName, TimingPresetName};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Logical screen size in points
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

/// Default preset names, kept as strings until resolved
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    pub timing: String,
    pub spring: String,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            timing: TimingPresetName::default().to_string(),
            spring: SpringPresetName::default().to_string(),
        }
    }
}

impl PresetsConfig {
    pub fn timing(&self) -> Result<TimingPresetName> {
        Ok(self.timing.parse()?)
    }

    pub fn spring(&self) -> Result<SpringPresetName> {
        Ok(self.spring.parse()?)
    }
}

/// Top-level motion configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub screen: ScreenMetrics,
    pub entrance: EntranceOptions,
    pub bottom_sheet: BottomSheetOptions,
    pub splash: SplashOptions,
    pub readiness: ReadinessConfig,
    pub presets: PresetsConfig,
}

impl MotionConfig {
    /// Parse from TOML; preset names are checked here
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: MotionConfig = toml::from_str(source)?;
        config.presets.timing()?;
        config.presets.spring()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| MotionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded motion config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
