//! Staggered onboarding entrance
//!
//! Four layers (icon, title, description, features) fade and slide in one
//! after another. Each stage is a parallel pair of an opacity timing and a
//! spring, and the stages run as a strict sequence, so the title does not
//! start until the icon's spring has settled.

use crate::store::Scope;
use crate::style::{MotionStyle, Sample, Sampled};
use kinetic_animation::{AnimatedScalar, Animation, Easing, SpringConfig, TimingConfig};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceOptions {
    /// Accepted for compatibility; the sequence starts without delay
    pub delay_ms: f32,
    pub duration_ms: f32,
    pub translate_y_offset: f32,
    pub enabled: bool,
}

impl Default for EntranceOptions {
    fn default() -> Self {
        Self {
            delay_ms: 100.0,
            duration_ms: 600.0,
            translate_y_offset: 30.0,
            enabled: true,
        }
    }
}

/// Scalars of the entrance sequence
#[derive(Clone, Debug)]
pub struct EntranceAnimation {
    pub icon_scale: AnimatedScalar,
    pub icon_opacity: AnimatedScalar,
    pub title_opacity: AnimatedScalar,
    pub title_translate_y: AnimatedScalar,
    pub description_opacity: AnimatedScalar,
    pub description_translate_y: AnimatedScalar,
    pub features_opacity: AnimatedScalar,
    pub features_translate_y: AnimatedScalar,
}

fn icon_spring() -> SpringConfig {
    SpringConfig::from_tension_friction(50.0, 7.0)
}

fn slide_spring() -> SpringConfig {
    SpringConfig::from_tension_friction(50.0, 8.0)
}

impl EntranceAnimation {
    /// `(scalar, terminal value)` in declaration order
    fn terminal_values(&self) -> [(&AnimatedScalar, f32); 8] {
        [
            (&self.icon_scale, 1.0),
            (&self.icon_opacity, 1.0),
            (&self.title_opacity, 1.0),
            (&self.title_translate_y, 0.0),
            (&self.description_opacity, 1.0),
            (&self.description_translate_y, 0.0),
            (&self.features_opacity, 1.0),
            (&self.features_translate_y, 0.0),
        ]
    }

    /// The full entrance: icon, then title, then description, then features
    pub fn composition(&self, options: &EntranceOptions) -> Animation {
        let fade = |scalar: &AnimatedScalar, duration_ms: f32| {
            scalar.timing_to(1.0, TimingConfig::new(duration_ms, Easing::EaseInOut))
        };
        let layer = |opacity: &AnimatedScalar, translate_y: &AnimatedScalar| {
            Animation::parallel([
                fade(opacity, options.duration_ms),
                translate_y.spring_to(0.0, slide_spring()),
            ])
        };

        Animation::sequence([
            Animation::parallel([
                fade(&self.icon_opacity, options.duration_ms * 0.8),
                self.icon_scale.spring_to(1.0, icon_spring()),
            ]),
            layer(&self.title_opacity, &self.title_translate_y),
            layer(&self.description_opacity, &self.description_translate_y),
            layer(&self.features_opacity, &self.features_translate_y),
        ])
    }

    /// Jump every scalar to where the entrance would end
    pub fn finish_immediately(&self) {
        for (scalar, value) in self.terminal_values() {
            scalar.set_value(value);
        }
    }

    pub fn icon_style(&self) -> MotionStyle {
        MotionStyle {
            opacity: self.icon_opacity.get(),
            scale: self.icon_scale.get(),
            ..MotionStyle::IDENTITY
        }
    }

    pub fn title_style(&self) -> MotionStyle {
        layer_style(&self.title_opacity, &self.title_translate_y)
    }

    pub fn description_style(&self) -> MotionStyle {
        layer_style(&self.description_opacity, &self.description_translate_y)
    }

    pub fn features_style(&self) -> MotionStyle {
        layer_style(&self.features_opacity, &self.features_translate_y)
    }
}

fn layer_style(opacity: &AnimatedScalar, translate_y: &AnimatedScalar) -> MotionStyle {
    MotionStyle {
        opacity: opacity.get(),
        translate_y: translate_y.get(),
        ..MotionStyle::IDENTITY
    }
}

impl Sampled for EntranceAnimation {
    fn sample(&self) -> Sample {
        smallvec![
            ("icon_scale", self.icon_scale.get()),
            ("icon_opacity", self.icon_opacity.get()),
            ("title_opacity", self.title_opacity.get()),
            ("title_translate_y", self.title_translate_y.get()),
            ("description_opacity", self.description_opacity.get()),
            ("description_translate_y", self.description_translate_y.get()),
            ("features_opacity", self.features_opacity.get()),
            ("features_translate_y", self.features_translate_y.get()),
        ]
    }
}

/// Staggered entrance, started once when the instance mounts
pub fn use_entrance_animation(scope: &Scope<'_>, options: EntranceOptions) -> EntranceAnimation {
    let offset = options.translate_y_offset;
    let entrance = EntranceAnimation {
        icon_scale: scope.use_scalar("entrance.icon_scale", 0.5),
        icon_opacity: scope.use_scalar("entrance.icon_opacity", 0.0),
        title_opacity: scope.use_scalar("entrance.title_opacity", 0.0),
        title_translate_y: scope.use_scalar("entrance.title_translate_y", offset),
        description_opacity: scope.use_scalar("entrance.description_opacity", 0.0),
        description_translate_y: scope.use_scalar("entrance.description_translate_y", offset),
        features_opacity: scope.use_scalar("entrance.features_opacity", 0.0),
        features_translate_y: scope.use_scalar("entrance.features_translate_y", offset),
    };

    scope.use_effect_once("entrance.mount", || {
        if !options.enabled {
            entrance.finish_immediately();
            return;
        }
        tracing::debug!(
            instance = %scope.instance(),
            duration_ms = options.duration_ms,
            "starting entrance sequence"
        );
        entrance.composition(&options).start(scope.handle());
    });

    entrance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::store::{InstanceKey, MotionContext};
    use kinetic_animation::AnimationScheduler;

    const FRAME_MS: f32 = 16.0;

    fn mount(
        scheduler: &AnimationScheduler,
        options: EntranceOptions,
    ) -> (MotionContext, EntranceAnimation) {
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let entrance = use_entrance_animation(&ctx.scope(&InstanceKey::explicit("intro")), options);
        (ctx, entrance)
    }

    fn values(entrance: &EntranceAnimation) -> Vec<f32> {
        entrance.sample().iter().map(|(_, value)| *value).collect()
    }

    /// Advance until `done` holds, returning the number of frames taken
    fn advance_until(
        scheduler: &AnimationScheduler,
        mut done: impl FnMut() -> bool,
    ) -> usize {
        let mut frames = 0;
        while !done() {
            scheduler.advance(FRAME_MS);
            frames += 1;
            assert!(frames < 2000, "condition never reached");
        }
        frames
    }

    #[test]
    fn test_initial_values() {
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let scope = ctx.scope(&InstanceKey::explicit("intro"));
        let options = EntranceOptions {
            enabled: true,
            ..EntranceOptions::default()
        };

        let entrance = use_entrance_animation(&scope, options);
        // Leaves that have not been issued yet still hold their initial values
        assert_eq!(entrance.title_opacity.get(), 0.0);
        assert_eq!(entrance.title_translate_y.get(), 30.0);
        assert_eq!(entrance.features_opacity.get(), 0.0);
        assert_eq!(entrance.features_translate_y.get(), 30.0);
        assert_eq!(entrance.icon_scale.get(), 0.5);
        assert_eq!(entrance.icon_opacity.get(), 0.0);
    }

    #[test]
    fn test_disabled_jumps_to_terminal_values() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, entrance) = mount(
            &scheduler,
            EntranceOptions {
                enabled: false,
                ..EntranceOptions::default()
            },
        );

        assert_eq!(values(&entrance), vec![1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_stages_run_in_order() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, entrance) = mount(&scheduler, EntranceOptions::default());

        // Icon stage issued on mount, nothing else yet
        assert!(entrance.icon_opacity.is_animating());
        assert!(entrance.icon_scale.is_animating());
        assert!(!entrance.title_opacity.is_animating());

        // Icon fade lasts 480 ms but the stage waits for the spring as well
        advance_until(&scheduler, || entrance.title_opacity.is_animating());
        assert_eq!(entrance.icon_opacity.get(), 1.0);
        assert_eq!(entrance.icon_scale.get(), 1.0);
        assert_eq!(entrance.description_opacity.get(), 0.0);

        advance_until(&scheduler, || entrance.description_opacity.is_animating());
        assert_eq!(entrance.title_opacity.get(), 1.0);
        assert_eq!(entrance.title_translate_y.get(), 0.0);
        assert_eq!(entrance.features_translate_y.get(), 30.0);

        advance_until(&scheduler, || !scheduler.has_active_animations());
        assert_eq!(values(&entrance), vec![1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_title_stage_outlasts_icon_fade() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, entrance) = mount(&scheduler, EntranceOptions::default());

        let frames = advance_until(&scheduler, || entrance.title_opacity.is_animating());
        // Strictly after the 480 ms icon fade
        assert!(frames as f32 * FRAME_MS >= 480.0);
    }

    #[test]
    fn test_delay_option_is_ignored() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, entrance) = mount(
            &scheduler,
            EntranceOptions {
                delay_ms: 5_000.0,
                ..EntranceOptions::default()
            },
        );

        // Starts on mount regardless of the configured delay
        assert!(entrance.icon_opacity.is_animating());
        scheduler.advance(FRAME_MS);
        assert!(entrance.icon_opacity.get() > 0.0);
    }

    #[test]
    fn test_remount_render_does_not_restart() {
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let key = InstanceKey::explicit("intro");

        let first = use_entrance_animation(&ctx.scope(&key), EntranceOptions::default());
        for _ in 0..10 {
            scheduler.advance(FRAME_MS);
        }
        let before = first.icon_opacity.get();

        let second = use_entrance_animation(&ctx.scope(&key), EntranceOptions::default());
        assert!(first.icon_opacity.ptr_eq(&second.icon_opacity));
        assert_eq!(second.icon_opacity.get(), before);
        assert_eq!(scheduler.composition_count(), 1);
    }

    #[test]
    fn test_two_mounts_are_independent_and_identical() {
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());

        let a = use_entrance_animation(
            &ctx.scope(&InstanceKey::explicit("a")),
            EntranceOptions::default(),
        );
        let b = use_entrance_animation(
            &ctx.scope(&InstanceKey::explicit("b")),
            EntranceOptions::default(),
        );
        assert!(!a.icon_scale.ptr_eq(&b.icon_scale));

        for _ in 0..40 {
            scheduler.advance(FRAME_MS);
            assert_eq!(values(&a), values(&b));
        }
    }

    #[test]
    fn test_unmount_mid_sequence() {
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let key = InstanceKey::explicit("intro");

        let entrance = use_entrance_animation(&ctx.scope(&key), EntranceOptions::default());
        scheduler.advance(FRAME_MS);
        drop(entrance);
        ctx.unmount(&key);

        scheduler.advance(FRAME_MS);
        assert_eq!(scheduler.scalar_count(), 0);
        assert_eq!(scheduler.composition_count(), 0);
    }

    #[test]
    fn test_styles() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, entrance) = mount(
            &scheduler,
            EntranceOptions {
                enabled: false,
                ..EntranceOptions::default()
            },
        );

        assert!(entrance.icon_style().is_identity());
        assert!(entrance.title_style().is_identity());
        assert!(entrance.features_style().is_identity());
    }
}
