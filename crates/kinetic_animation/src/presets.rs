//! Named animation presets
//!
//! A fixed table of timing and spring configurations, plus the two factory
//! functions that turn a scalar and a target into a startable [`Animation`].
//!
//! | name         | kind   | parameters                |
//! |--------------|--------|---------------------------|
//! | fast         | timing | 200 ms, ease-out          |
//! | normal       | timing | 300 ms, ease-in-out       |
//! | slow         | timing | 500 ms, ease-in-out       |
//! | springGentle | spring | tension 40, friction 7    |
//! | springBouncy | spring | tension 100, friction 5   |
//! | springStiff  | spring | tension 200, friction 20  |
//!
//! Every preset uses the native driver.

use crate::composition::Animation;
use crate::easing::Easing;
use crate::scalar::AnimatedScalar;
use crate::spring::SpringConfig;
use crate::timing::TimingConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing a preset name from a string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("unknown timing preset `{0}` (expected fast, normal or slow)")]
    UnknownTiming(String),

    #[error("unknown spring preset `{0}` (expected springGentle, springBouncy or springStiff)")]
    UnknownSpring(String),
}

/// Timing preset entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingPreset {
    pub duration_ms: f32,
    pub easing: Easing,
    pub use_native_driver: bool,
}

impl TimingPreset {
    pub fn config(&self) -> TimingConfig {
        TimingConfig {
            duration_ms: self.duration_ms,
            easing: self.easing,
            use_native_driver: self.use_native_driver,
        }
    }
}

/// Spring preset entry, in origami tension/friction units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringPreset {
    pub tension: f32,
    pub friction: f32,
    pub use_native_driver: bool,
}

impl SpringPreset {
    pub fn config(&self) -> SpringConfig {
        SpringConfig::from_tension_friction(self.tension, self.friction)
            .with_native_driver(self.use_native_driver)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimingPresetName {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl TimingPresetName {
    pub const ALL: [TimingPresetName; 3] = [Self::Fast, Self::Normal, Self::Slow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Slow => "slow",
        }
    }
}

impl fmt::Display for TimingPresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimingPresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" => Ok(Self::Fast),
            "normal" => Ok(Self::Normal),
            "slow" => Ok(Self::Slow),
            other => Err(PresetError::UnknownTiming(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringPresetName {
    #[default]
    #[serde(rename = "springGentle", alias = "gentle")]
    Gentle,
    #[serde(rename = "springBouncy", alias = "bouncy")]
    Bouncy,
    #[serde(rename = "springStiff", alias = "stiff")]
    Stiff,
}

impl SpringPresetName {
    pub const ALL: [SpringPresetName; 3] = [Self::Gentle, Self::Bouncy, Self::Stiff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gentle => "springGentle",
            Self::Bouncy => "springBouncy",
            Self::Stiff => "springStiff",
        }
    }
}

impl fmt::Display for SpringPresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpringPresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "springGentle" | "gentle" => Ok(Self::Gentle),
            "springBouncy" | "bouncy" => Ok(Self::Bouncy),
            "springStiff" | "stiff" => Ok(Self::Stiff),
            other => Err(PresetError::UnknownSpring(other.to_string())),
        }
    }
}

pub fn resolve_timing(name: TimingPresetName) -> TimingPreset {
    match name {
        TimingPresetName::Fast => TimingPreset {
            duration_ms: 200.0,
            easing: Easing::EaseOut,
            use_native_driver: true,
        },
        TimingPresetName::Normal => TimingPreset {
            duration_ms: 300.0,
            easing: Easing::EaseInOut,
            use_native_driver: true,
        },
        TimingPresetName::Slow => TimingPreset {
            duration_ms: 500.0,
            easing: Easing::EaseInOut,
            use_native_driver: true,
        },
    }
}

pub fn resolve_spring(name: SpringPresetName) -> SpringPreset {
    match name {
        SpringPresetName::Gentle => SpringPreset {
            tension: 40.0,
            friction: 7.0,
            use_native_driver: true,
        },
        SpringPresetName::Bouncy => SpringPreset {
            tension: 100.0,
            friction: 5.0,
            use_native_driver: true,
        },
        SpringPresetName::Stiff => SpringPreset {
            tension: 200.0,
            friction: 20.0,
            use_native_driver: true,
        },
    }
}

/// Per-call adjustments to a timing preset
///
/// Every supplied field replaces the preset's; the rest come from `base`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimingOverride {
    pub base: TimingPresetName,
    pub duration_ms: Option<f32>,
    pub easing: Option<Easing>,
    pub use_native_driver: Option<bool>,
}

impl TimingOverride {
    pub fn duration(duration_ms: f32) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            ..Self::default()
        }
    }

    pub fn apply(&self) -> TimingConfig {
        let preset = resolve_timing(self.base);
        TimingConfig {
            duration_ms: self.duration_ms.unwrap_or(preset.duration_ms),
            easing: self.easing.unwrap_or(preset.easing),
            use_native_driver: self.use_native_driver.unwrap_or(preset.use_native_driver),
        }
    }
}

impl From<TimingPresetName> for TimingOverride {
    fn from(base: TimingPresetName) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

/// Per-call adjustments to a spring preset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringOverride {
    pub base: SpringPresetName,
    pub tension: Option<f32>,
    pub friction: Option<f32>,
    pub use_native_driver: Option<bool>,
}

impl SpringOverride {
    pub fn apply(&self) -> SpringConfig {
        let preset = resolve_spring(self.base);
        SpringConfig::from_tension_friction(
            self.tension.unwrap_or(preset.tension),
            self.friction.unwrap_or(preset.friction),
        )
        .with_native_driver(self.use_native_driver.unwrap_or(preset.use_native_driver))
    }
}

impl From<SpringPresetName> for SpringOverride {
    fn from(base: SpringPresetName) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

/// Timing transition of `scalar` to `target`, "normal" unless overridden
pub fn create_timing_animation(
    scalar: &AnimatedScalar,
    target: f32,
    overrides: Option<TimingOverride>,
) -> Animation {
    let config = overrides.unwrap_or_default().apply();
    scalar.timing_to(target, config)
}

/// Spring transition of `scalar` to `target`, "springGentle" unless overridden
pub fn create_spring_animation(
    scalar: &AnimatedScalar,
    target: f32,
    overrides: Option<SpringOverride>,
) -> Animation {
    let config = overrides.unwrap_or_default().apply();
    scalar.spring_to(target, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;

    fn timing_config(animation: &Animation) -> TimingConfig {
        match animation {
            Animation::Timing { config, .. } => *config,
            other => panic!("expected a timing leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_preset_table() {
        assert_eq!(resolve_timing(TimingPresetName::Fast).duration_ms, 200.0);
        assert_eq!(resolve_timing(TimingPresetName::Fast).easing, Easing::EaseOut);
        assert_eq!(resolve_timing(TimingPresetName::Normal).duration_ms, 300.0);
        assert_eq!(resolve_timing(TimingPresetName::Slow).duration_ms, 500.0);

        let bouncy = resolve_spring(SpringPresetName::Bouncy);
        assert_eq!((bouncy.tension, bouncy.friction), (100.0, 5.0));
        let stiff = resolve_spring(SpringPresetName::Stiff);
        assert_eq!((stiff.tension, stiff.friction), (200.0, 20.0));

        for name in TimingPresetName::ALL {
            assert!(resolve_timing(name).use_native_driver);
        }
        for name in SpringPresetName::ALL {
            assert!(resolve_spring(name).use_native_driver);
        }
    }

    #[test]
    fn test_timing_factory_defaults_to_normal() {
        let scheduler = AnimationScheduler::new();
        let scalar = AnimatedScalar::new(&scheduler.handle(), 0.0);

        let animation = create_timing_animation(&scalar, 1.0, None);
        let config = timing_config(&animation);
        assert_eq!(config.duration_ms, 300.0);
        assert_eq!(config.easing, Easing::EaseInOut);
        assert!(config.use_native_driver);
    }

    #[test]
    fn test_timing_override_replaces_supplied_fields() {
        let scheduler = AnimationScheduler::new();
        let scalar = AnimatedScalar::new(&scheduler.handle(), 0.0);

        let animation = create_timing_animation(&scalar, 1.0, Some(TimingOverride::duration(50.0)));
        let config = timing_config(&animation);
        assert_eq!(config.duration_ms, 50.0);
        assert_eq!(config.easing, Easing::EaseInOut);

        let animation = create_timing_animation(
            &scalar,
            1.0,
            Some(TimingOverride {
                base: TimingPresetName::Fast,
                use_native_driver: Some(false),
                ..TimingOverride::default()
            }),
        );
        let config = timing_config(&animation);
        assert_eq!(config.duration_ms, 200.0);
        assert_eq!(config.easing, Easing::EaseOut);
        assert!(!config.use_native_driver);
    }

    #[test]
    fn test_timing_factory_runs_for_preset_duration() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let scalar = AnimatedScalar::new(&handle, 0.0);

        create_timing_animation(&scalar, 1.0, None).start(&handle);
        scheduler.advance(299.0);
        assert!(scalar.get() < 1.0);
        scheduler.advance(1.0);
        assert_eq!(scalar.get(), 1.0);
    }

    #[test]
    fn test_spring_factory_defaults_to_gentle() {
        let scheduler = AnimationScheduler::new();
        let scalar = AnimatedScalar::new(&scheduler.handle(), 0.0);

        match create_spring_animation(&scalar, 1.0, None) {
            Animation::Spring { target, config, .. } => {
                assert_eq!(target, 1.0);
                assert_eq!(config, SpringConfig::from_tension_friction(40.0, 7.0));
            }
            other => panic!("expected a spring leaf, got {other:?}"),
        }

        let overrides = SpringOverride {
            friction: Some(12.0),
            ..SpringPresetName::Bouncy.into()
        };
        match create_spring_animation(&scalar, 1.0, Some(overrides)) {
            Animation::Spring { config, .. } => {
                assert_eq!(config, SpringConfig::from_tension_friction(100.0, 12.0));
            }
            other => panic!("expected a spring leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_spring_override_carries_driver_flag() {
        assert!(resolve_spring(SpringPresetName::Gentle).config().use_native_driver);
        assert!(SpringOverride::default().apply().use_native_driver);

        let config = SpringOverride {
            use_native_driver: Some(false),
            ..SpringPresetName::Stiff.into()
        }
        .apply();
        assert!(!config.use_native_driver);
        assert_eq!(config, SpringConfig::from_tension_friction(200.0, 20.0).with_native_driver(false));
        assert!(!SpringConfig::worklet().use_native_driver);
    }

    #[test]
    fn test_preset_names_parse() {
        assert_eq!("fast".parse::<TimingPresetName>(), Ok(TimingPresetName::Fast));
        assert_eq!("springGentle".parse::<SpringPresetName>(), Ok(SpringPresetName::Gentle));
        assert_eq!("stiff".parse::<SpringPresetName>(), Ok(SpringPresetName::Stiff));
        assert_eq!(
            "snappy".parse::<TimingPresetName>(),
            Err(PresetError::UnknownTiming("snappy".to_string()))
        );
        for name in SpringPresetName::ALL {
            assert_eq!(name.to_string().parse::<SpringPresetName>(), Ok(name));
        }
    }
}
