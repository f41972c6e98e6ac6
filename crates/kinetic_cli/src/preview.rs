//! `kinetic preview`
//!
//! Mounts one hook under a fixed instance key, re-renders it every frame the
//! way a UI would, and prints the sampled values.

use anyhow::Result;
use clap::ValueEnum;
use kinetic_animation::AnimationScheduler;
use kinetic_motion::declarative::{
    DEFAULT_DURATION_MS, DEFAULT_SCALE_OUT_MS, DEFAULT_SLIDE_DISTANCE, DEFAULT_SPIN_MS,
};
use kinetic_motion::{
    use_bottom_sheet, use_declarative_animation, use_entrance_animation, use_readiness,
    use_splash_animation, DeclarativeAnimation, InstanceKey, MotionConfig, MotionContext, Sample,
    Sampled,
};
use serde::ser::{Serialize, Serializer};
use std::io::{self, Write};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HookKind {
    Entrance,
    Splash,
    BottomSheet,
    Readiness,
    Declarative,
}

impl HookKind {
    fn default_duration_ms(self, config: &MotionConfig) -> f32 {
        match self {
            Self::Entrance => 3000.0,
            Self::Splash => config.splash.fade_duration_ms.max(config.splash.slide_duration_ms) + 500.0,
            Self::BottomSheet => {
                2.0 * config.bottom_sheet.duration_ms.max(config.bottom_sheet.close_duration_ms) + 200.0
            }
            Self::Readiness => config.readiness.delay_ms + 200.0,
            Self::Declarative => 1500.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Transition {
    FadeIn,
    FadeOut,
    SlideInLeft,
    SlideInRight,
    SlideInUp,
    SlideInDown,
    ScaleIn,
    ScaleOut,
    Bounce,
    Shake,
    Pulse,
    Spin,
}

impl Transition {
    fn start(self, animation: &DeclarativeAnimation) {
        let started = match self {
            Self::FadeIn => animation.fade_in(DEFAULT_DURATION_MS),
            Self::FadeOut => animation.fade_out(DEFAULT_DURATION_MS),
            Self::SlideInLeft => animation.slide_in_left(DEFAULT_SLIDE_DISTANCE, DEFAULT_DURATION_MS),
            Self::SlideInRight => animation.slide_in_right(DEFAULT_SLIDE_DISTANCE, DEFAULT_DURATION_MS),
            Self::SlideInUp => animation.slide_in_up(DEFAULT_SLIDE_DISTANCE, DEFAULT_DURATION_MS),
            Self::SlideInDown => animation.slide_in_down(DEFAULT_SLIDE_DISTANCE, DEFAULT_DURATION_MS),
            Self::ScaleIn => animation.scale_in(),
            Self::ScaleOut => animation.scale_out(DEFAULT_SCALE_OUT_MS),
            Self::Bounce => animation.bounce(),
            Self::Shake => animation.shake(),
            Self::Pulse => animation.pulse(None),
            Self::Spin => animation.spin(DEFAULT_SPIN_MS, None),
        };
        debug!(transition = ?self, composition = ?started, "transition started");
    }
}

#[derive(Debug)]
pub struct PreviewOptions {
    pub hook: HookKind,
    pub fps: u32,
    pub duration_ms: Option<f32>,
    pub every: u32,
    pub json: bool,
    pub transition: Transition,
}

/// Longest simulated run accepted on the command line (ten minutes)
pub const MAX_DURATION_MS: f32 = 600_000.0;

/// `--duration-ms` parser: finite, non-negative and at most [`MAX_DURATION_MS`]
pub fn parse_duration_ms(arg: &str) -> Result<f32, String> {
    let value: f32 = arg.parse().map_err(|err| format!("{err}"))?;
    if !value.is_finite() || !(0.0..=MAX_DURATION_MS).contains(&value) {
        return Err(format!("expected a duration between 0 and {MAX_DURATION_MS} ms"));
    }
    Ok(value)
}

/// Sample values as a JSON object, in the order the hook declares them
struct Values<'a>(&'a Sample);

impl Serialize for Values<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (*name, *value)))
    }
}

#[derive(serde::Serialize)]
struct Row<'a> {
    frame: u64,
    t_ms: f64,
    values: Values<'a>,
}

fn json_row(frame: u64, t_ms: f64, sample: &Sample) -> serde_json::Result<String> {
    serde_json::to_string(&Row {
        frame,
        t_ms,
        values: Values(sample),
    })
}

/// Renders the hook for the given elapsed time and samples it
type Render<'a> = Box<dyn FnMut(f64) -> Sample + 'a>;

fn renderer<'a>(
    hook: HookKind,
    config: &'a MotionConfig,
    ctx: &'a MotionContext,
    key: &'a InstanceKey,
    transition: Transition,
) -> Render<'a> {
    match hook {
        HookKind::Entrance => Box::new(move |_: f64| {
            use_entrance_animation(&ctx.scope(key), config.entrance).sample()
        }),
        HookKind::Splash => {
            Box::new(move |_: f64| use_splash_animation(&ctx.scope(key), config.splash).sample())
        }
        HookKind::BottomSheet => {
            // Open, then close once the opening has had time to finish
            let close_at = f64::from(config.bottom_sheet.duration_ms) + 100.0;
            Box::new(move |elapsed: f64| {
                let visible = elapsed < close_at;
                use_bottom_sheet(&ctx.scope(key), visible, config.bottom_sheet).sample()
            })
        }
        HookKind::Readiness => Box::new(move |_: f64| {
            let flag = use_readiness(&ctx.scope(key), config.readiness);
            let mut sample = Sample::new();
            sample.push(("ready", if flag.is_ready() { 1.0 } else { 0.0 }));
            sample
        }),
        HookKind::Declarative => {
            let animation = use_declarative_animation(&ctx.scope(key));
            transition.start(&animation);
            Box::new(move |_: f64| use_declarative_animation(&ctx.scope(key)).sample())
        }
    }
}

pub fn run(config: &MotionConfig, options: PreviewOptions) -> Result<()> {
    let scheduler = AnimationScheduler::new();
    let ctx = MotionContext::new(scheduler.handle(), config.screen);
    let key = InstanceKey::explicit("preview");

    let dt_ms = 1000.0 / options.fps as f32;
    let duration_ms = options
        .duration_ms
        .unwrap_or_else(|| options.hook.default_duration_ms(config))
        .clamp(0.0, MAX_DURATION_MS);
    let frames = (duration_ms / dt_ms).ceil() as u64;
    info!(
        "Previewing {:?} for {} ms ({} frames at {} fps)",
        options.hook, duration_ms, frames, options.fps
    );

    let mut render = renderer(options.hook, config, &ctx, &key, options.transition);
    let mut out = io::stdout().lock();

    for frame in 0..=frames {
        let elapsed = scheduler.elapsed_ms();
        let sample = render(elapsed);

        if frame % u64::from(options.every) == 0 || frame == frames {
            if options.json {
                writeln!(out, "{}", json_row(frame, elapsed, &sample)?)?;
            } else {
                write!(out, "{frame:>5} {elapsed:>9.1}ms")?;
                for (name, value) in &sample {
                    write!(out, "  {name}={value:.3}")?;
                }
                writeln!(out)?;
            }
        }

        if frame < frames {
            scheduler.advance(dt_ms);
        }
    }

    drop(render);
    ctx.unmount(&key);
    info!(
        "Preview finished; {} animations still active",
        if scheduler.has_active_animations() { "some" } else { "no" }
    );
    Ok(())
}
