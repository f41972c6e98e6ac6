//! `kinetic presets`

use anyhow::Result;
use kinetic_animation::{resolve_spring, resolve_timing, SpringPresetName, TimingPresetName};
use kinetic_motion::MotionConfig;
use std::io::{self, Write};

pub fn print(config: &MotionConfig) -> Result<()> {
    let default_timing = config.presets.timing()?;
    let default_spring = config.presets.spring()?;
    let mut out = io::stdout().lock();

    writeln!(out, "  {:<14} {:<7} parameters", "name", "kind")?;
    for name in TimingPresetName::ALL {
        let preset = resolve_timing(name);
        writeln!(
            out,
            "{} {:<14} {:<7} {} ms, {:?}",
            marker(name == default_timing),
            name.as_str(),
            "timing",
            preset.duration_ms,
            preset.easing,
        )?;
    }
    for name in SpringPresetName::ALL {
        let preset = resolve_spring(name);
        writeln!(
            out,
            "{} {:<14} {:<7} tension {}, friction {}",
            marker(name == default_spring),
            name.as_str(),
            "spring",
            preset.tension,
            preset.friction,
        )?;
    }
    Ok(())
}

fn marker(is_default: bool) -> char {
    if is_default {
        '*'
    } else {
        ' '
    }
}
