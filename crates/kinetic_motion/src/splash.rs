//! Splash screen reveal: fade in, spring up to full size, slide into place

use crate::store::Scope;
use crate::style::{MotionStyle, Sample, Sampled};
use kinetic_animation::{
    AnimatedScalar, Animation, CompositionId, Easing, SchedulerHandle, SpringConfig, TimingConfig,
};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashOptions {
    pub fade_duration_ms: f32,
    pub spring_tension: f32,
    pub spring_friction: f32,
    pub slide_duration_ms: f32,
    pub slide_offset: f32,
    pub enabled: bool,
}

impl Default for SplashOptions {
    fn default() -> Self {
        Self {
            fade_duration_ms: 1000.0,
            spring_tension: 100.0,
            spring_friction: 8.0,
            slide_duration_ms: 800.0,
            slide_offset: 50.0,
            enabled: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SplashAnimation {
    pub fade: AnimatedScalar,
    pub scale: AnimatedScalar,
    pub slide: AnimatedScalar,
    /// The reveal started on mount, if any
    pub composition: Option<CompositionId>,
}

impl SplashAnimation {
    /// The three reveal transitions as one parallel group
    pub fn reveal(&self, options: &SplashOptions) -> Animation {
        Animation::parallel([
            self.fade.timing_to(
                1.0,
                TimingConfig::new(options.fade_duration_ms, Easing::EaseInOut),
            ),
            self.scale.spring_to(
                1.0,
                SpringConfig::from_tension_friction(options.spring_tension, options.spring_friction),
            ),
            self.slide.timing_to(
                0.0,
                TimingConfig::new(options.slide_duration_ms, Easing::EaseInOut),
            ),
        ])
    }

    /// Whether the reveal is still running; false once settled or if never started
    pub fn is_running(&self, handle: &SchedulerHandle) -> bool {
        self.composition
            .map(|id| handle.is_composition_running(id))
            .unwrap_or(false)
    }

    pub fn style(&self) -> MotionStyle {
        MotionStyle {
            opacity: self.fade.get(),
            translate_y: self.slide.get(),
            scale: self.scale.get(),
            ..MotionStyle::IDENTITY
        }
    }
}

impl Sampled for SplashAnimation {
    fn sample(&self) -> Sample {
        smallvec![
            ("fade", self.fade.get()),
            ("scale", self.scale.get()),
            ("slide", self.slide.get()),
        ]
    }
}

/// Splash reveal, started once when the instance mounts
pub fn use_splash_animation(scope: &Scope<'_>, options: SplashOptions) -> SplashAnimation {
    let mut splash = SplashAnimation {
        fade: scope.use_scalar("splash.fade", 0.0),
        scale: scope.use_scalar("splash.scale", 0.8),
        slide: scope.use_scalar("splash.slide", options.slide_offset),
        composition: None,
    };

    let started: Option<CompositionId> = scope.use_slot("splash.composition", || {
        if !options.enabled {
            splash.fade.set_value(1.0);
            splash.scale.set_value(1.0);
            splash.slide.set_value(0.0);
            return None;
        }
        tracing::debug!(instance = %scope.instance(), "starting splash reveal");
        splash.reveal(&options).start(scope.handle())
    });
    splash.composition = started;

    splash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::store::{InstanceKey, MotionContext};
    use kinetic_animation::AnimationScheduler;

    fn mount(scheduler: &AnimationScheduler, options: SplashOptions) -> (MotionContext, SplashAnimation) {
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let splash = use_splash_animation(&ctx.scope(&InstanceKey::explicit("splash")), options);
        (ctx, splash)
    }

    #[test]
    fn test_disabled_jumps_synchronously() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, splash) = mount(
            &scheduler,
            SplashOptions {
                enabled: false,
                ..SplashOptions::default()
            },
        );

        assert_eq!(splash.sample().as_slice(), &[("fade", 1.0), ("scale", 1.0), ("slide", 0.0)]);
        assert!(splash.composition.is_none());
        assert!(!scheduler.has_active_animations());
        assert!(splash.style().is_identity());
    }

    #[test]
    fn test_enabled_initial_values_and_concurrency() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, splash) = mount(&scheduler, SplashOptions::default());

        assert_eq!(splash.fade.get(), 0.0);
        assert_eq!(splash.scale.get(), 0.8);
        assert_eq!(splash.slide.get(), 50.0);

        // All three issued on mount, in the same tick
        assert!(splash.fade.is_animating());
        assert!(splash.scale.is_animating());
        assert!(splash.slide.is_animating());

        scheduler.advance(16.0);
        assert!(splash.fade.get() > 0.0);
        assert!(splash.scale.get() > 0.8);
        assert!(splash.slide.get() < 50.0);
    }

    #[test]
    fn test_independent_completion_times() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let (_ctx, splash) = mount(&scheduler, SplashOptions::default());

        scheduler.advance(800.0);
        assert_eq!(splash.slide.get(), 0.0);
        assert!(!splash.slide.is_animating());
        assert!(splash.fade.is_animating());
        assert!(splash.is_running(&handle));

        scheduler.advance(200.0);
        assert_eq!(splash.fade.get(), 1.0);

        let mut frames = 0;
        while splash.is_running(&handle) {
            scheduler.advance(16.0);
            frames += 1;
            assert!(frames < 1000, "splash never settled");
        }
        assert_eq!(splash.scale.get(), 1.0);
    }

    #[test]
    fn test_custom_slide_offset() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, splash) = mount(
            &scheduler,
            SplashOptions {
                slide_offset: 120.0,
                ..SplashOptions::default()
            },
        );
        assert_eq!(splash.slide.get(), 120.0);
    }

    #[test]
    fn test_rerender_keeps_composition() {
        let scheduler = AnimationScheduler::new();
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let key = InstanceKey::explicit("splash");

        let first = use_splash_animation(&ctx.scope(&key), SplashOptions::default());
        let second = use_splash_animation(&ctx.scope(&key), SplashOptions::default());
        assert_eq!(first.composition, second.composition);
        assert_eq!(scheduler.composition_count(), 1);
    }
}
