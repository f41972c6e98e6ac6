//! Declarative transitions
//!
//! Five raw scalars (opacity, translate x/y, scale, rotation) and a set of
//! named one-call transitions over them. Every transition replaces whatever
//! was driving the scalars it touches and returns the started composition.
//!
//! Springs here are configured by stiffness and damping directly rather than
//! through the tension/friction presets.

use crate::store::Scope;
use crate::style::{MotionStyle, Sample, Sampled};
use kinetic_animation::{
    AnimatedScalar, Animation, CompositionId, Easing, SchedulerHandle, SpringConfig, TimingConfig,
};
use smallvec::smallvec;

/// Default duration of fades and slides
pub const DEFAULT_DURATION_MS: f32 = 300.0;
/// Default distance of the slide-in transitions
pub const DEFAULT_SLIDE_DISTANCE: f32 = 100.0;
/// Default duration of `scale_out`
pub const DEFAULT_SCALE_OUT_MS: f32 = 200.0;
/// Default duration of one `spin` revolution
pub const DEFAULT_SPIN_MS: f32 = 1000.0;

const BOUNCE_HEIGHT: f32 = -20.0;
const BOUNCE_UP_MS: f32 = 150.0;
const SHAKE_OFFSETS: [f32; 5] = [-10.0, 10.0, -10.0, 10.0, 0.0];
const SHAKE_STEP_MS: f32 = 50.0;
const PULSE_SCALE: f32 = 1.1;
const PULSE_HALF_MS: f32 = 500.0;

/// Direction a slide-in enters from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideFrom {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct DeclarativeAnimation {
    pub opacity: AnimatedScalar,
    pub translate_x: AnimatedScalar,
    pub translate_y: AnimatedScalar,
    pub scale: AnimatedScalar,
    /// Rotation in degrees
    pub rotation: AnimatedScalar,
    handle: SchedulerHandle,
}

fn timing(duration_ms: f32) -> TimingConfig {
    TimingConfig::new(duration_ms, Easing::EaseInOut)
}

impl DeclarativeAnimation {
    fn run(&self, animation: Animation) -> Option<CompositionId> {
        animation.start(&self.handle)
    }

    pub fn fade_in(&self, duration_ms: f32) -> Option<CompositionId> {
        self.run(self.opacity.timing_to(1.0, timing(duration_ms)))
    }

    pub fn fade_out(&self, duration_ms: f32) -> Option<CompositionId> {
        self.run(self.opacity.timing_to(0.0, timing(duration_ms)))
    }

    /// Jump off-screen along one axis, then slide back to 0 while fading in
    pub fn slide_in(&self, from: SlideFrom, distance: f32, duration_ms: f32) -> Option<CompositionId> {
        let (axis, start) = match from {
            SlideFrom::Left => (&self.translate_x, -distance),
            SlideFrom::Right => (&self.translate_x, distance),
            SlideFrom::Top => (&self.translate_y, -distance),
            SlideFrom::Bottom => (&self.translate_y, distance),
        };
        self.run(Animation::parallel([
            Animation::sequence([axis.set_to(start), axis.timing_to(0.0, timing(duration_ms))]),
            self.opacity.timing_to(1.0, timing(duration_ms)),
        ]))
    }

    pub fn slide_in_left(&self, distance: f32, duration_ms: f32) -> Option<CompositionId> {
        self.slide_in(SlideFrom::Left, distance, duration_ms)
    }

    pub fn slide_in_right(&self, distance: f32, duration_ms: f32) -> Option<CompositionId> {
        self.slide_in(SlideFrom::Right, distance, duration_ms)
    }

    /// Enters from above
    pub fn slide_in_up(&self, distance: f32, duration_ms: f32) -> Option<CompositionId> {
        self.slide_in(SlideFrom::Top, distance, duration_ms)
    }

    /// Enters from below
    pub fn slide_in_down(&self, distance: f32, duration_ms: f32) -> Option<CompositionId> {
        self.slide_in(SlideFrom::Bottom, distance, duration_ms)
    }

    /// Pop in from nothing on the default spring
    pub fn scale_in(&self) -> Option<CompositionId> {
        self.run(Animation::sequence([
            self.scale.set_to(0.0),
            self.scale.spring_to(1.0, SpringConfig::worklet()),
        ]))
    }

    /// Shrink away while fading out
    pub fn scale_out(&self, duration_ms: f32) -> Option<CompositionId> {
        self.run(Animation::parallel([
            self.scale.timing_to(0.0, timing(duration_ms)),
            self.opacity.timing_to(0.0, timing(duration_ms)),
        ]))
    }

    pub fn bounce(&self) -> Option<CompositionId> {
        self.run(Animation::sequence([
            self.translate_y.timing_to(BOUNCE_HEIGHT, timing(BOUNCE_UP_MS)),
            self.translate_y.spring_to(0.0, SpringConfig::worklet()),
        ]))
    }

    pub fn shake(&self) -> Option<CompositionId> {
        self.run(Animation::sequence(SHAKE_OFFSETS.map(|offset| {
            self.translate_x.timing_to(offset, timing(SHAKE_STEP_MS))
        })))
    }

    /// Breathe the scale; `None` repeats until replaced
    pub fn pulse(&self, iterations: Option<u32>) -> Option<CompositionId> {
        self.run(
            Animation::sequence([
                self.scale.timing_to(PULSE_SCALE, timing(PULSE_HALF_MS)),
                self.scale.timing_to(1.0, timing(PULSE_HALF_MS)),
            ])
            .repeat(iterations),
        )
    }

    /// Full turns at constant speed; `None` repeats until replaced
    pub fn spin(&self, duration_ms: f32, iterations: Option<u32>) -> Option<CompositionId> {
        self.run(
            Animation::sequence([
                self.rotation.set_to(0.0),
                self.rotation.timing_to(360.0, TimingConfig::linear(duration_ms)),
            ])
            .repeat(iterations),
        )
    }

    pub fn style(&self) -> MotionStyle {
        MotionStyle {
            opacity: self.opacity.get(),
            translate_x: self.translate_x.get(),
            translate_y: self.translate_y.get(),
            scale: self.scale.get(),
            rotation_deg: self.rotation.get(),
        }
    }
}

impl Sampled for DeclarativeAnimation {
    fn sample(&self) -> Sample {
        smallvec![
            ("opacity", self.opacity.get()),
            ("translate_x", self.translate_x.get()),
            ("translate_y", self.translate_y.get()),
            ("scale", self.scale.get()),
            ("rotation", self.rotation.get()),
        ]
    }
}

/// Raw scalars plus named transitions; nothing starts on mount
pub fn use_declarative_animation(scope: &Scope<'_>) -> DeclarativeAnimation {
    DeclarativeAnimation {
        opacity: scope.use_scalar("declarative.opacity", 1.0),
        translate_x: scope.use_scalar("declarative.translate_x", 0.0),
        translate_y: scope.use_scalar("declarative.translate_y", 0.0),
        scale: scope.use_scalar("declarative.scale", 1.0),
        rotation: scope.use_scalar("declarative.rotation", 0.0),
        handle: scope.handle().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::store::{InstanceKey, MotionContext};
    use kinetic_animation::AnimationScheduler;

    const FRAME_MS: f32 = 16.0;

    fn mount(scheduler: &AnimationScheduler) -> (MotionContext, DeclarativeAnimation) {
        let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
        let motion = use_declarative_animation(&ctx.scope(&InstanceKey::explicit("card")));
        (ctx, motion)
    }

    fn settle(scheduler: &AnimationScheduler) {
        let mut frames = 0;
        while scheduler.has_active_animations() {
            scheduler.advance(FRAME_MS);
            frames += 1;
            assert!(frames < 2000, "animations never settled");
        }
    }

    #[test]
    fn test_initial_style_is_identity() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);
        assert!(motion.style().is_identity());
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_fade_out_then_in() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.fade_out(DEFAULT_DURATION_MS);
        scheduler.advance(300.0);
        assert_eq!(motion.opacity.get(), 0.0);

        motion.fade_in(100.0);
        scheduler.advance(50.0);
        assert!((motion.opacity.get() - 0.5).abs() < 1e-4);
        scheduler.advance(50.0);
        assert_eq!(motion.opacity.get(), 1.0);
    }

    #[test]
    fn test_slide_in_directions() {
        let cases = [
            (SlideFrom::Left, -100.0, true),
            (SlideFrom::Right, 100.0, true),
            (SlideFrom::Top, -100.0, false),
            (SlideFrom::Bottom, 100.0, false),
        ];
        for (from, start, horizontal) in cases {
            let scheduler = AnimationScheduler::new();
            let (_ctx, motion) = mount(&scheduler);
            motion.opacity.set_value(0.0);

            motion.slide_in(from, DEFAULT_SLIDE_DISTANCE, DEFAULT_DURATION_MS);
            let axis = if horizontal {
                &motion.translate_x
            } else {
                &motion.translate_y
            };
            assert_eq!(axis.get(), start, "{from:?}");
            assert!(axis.is_animating());
            assert!(motion.opacity.is_animating());

            scheduler.advance(300.0);
            assert_eq!(axis.get(), 0.0);
            assert_eq!(motion.opacity.get(), 1.0);
        }
    }

    #[test]
    fn test_slide_in_shorthands() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.slide_in_left(40.0, 100.0);
        assert_eq!(motion.translate_x.get(), -40.0);
        motion.slide_in_right(40.0, 100.0);
        assert_eq!(motion.translate_x.get(), 40.0);
        motion.slide_in_up(40.0, 100.0);
        assert_eq!(motion.translate_y.get(), -40.0);
        motion.slide_in_down(40.0, 100.0);
        assert_eq!(motion.translate_y.get(), 40.0);
    }

    #[test]
    fn test_scale_in_starts_from_zero() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.scale_in();
        assert_eq!(motion.scale.get(), 0.0);
        settle(&scheduler);
        assert_eq!(motion.scale.get(), 1.0);
    }

    #[test]
    fn test_scale_out() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.scale_out(DEFAULT_SCALE_OUT_MS);
        scheduler.advance(200.0);
        assert_eq!(motion.scale.get(), 0.0);
        assert_eq!(motion.opacity.get(), 0.0);
    }

    #[test]
    fn test_bounce_goes_up_then_springs_back() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.bounce();
        scheduler.advance(150.0);
        assert_eq!(motion.translate_y.get(), -20.0);
        settle(&scheduler);
        assert_eq!(motion.translate_y.get(), 0.0);
    }

    #[test]
    fn test_shake_visits_each_offset() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.shake();
        for expected in SHAKE_OFFSETS {
            scheduler.advance(SHAKE_STEP_MS);
            assert_eq!(motion.translate_x.get(), expected);
        }
        scheduler.advance(FRAME_MS);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_finite_pulse() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        let id = motion.pulse(Some(2)).unwrap();
        scheduler.advance(500.0);
        assert!((motion.scale.get() - 1.1).abs() < 1e-5);

        settle(&scheduler);
        assert!(!scheduler.handle().is_composition_running(id));
        assert_eq!(motion.scale.get(), 1.0);
    }

    #[test]
    fn test_infinite_spin_until_replaced() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        let id = motion.spin(DEFAULT_SPIN_MS, None).unwrap();
        for _ in 0..500 {
            scheduler.advance(FRAME_MS);
        }
        assert!(scheduler.handle().is_composition_running(id));
        let angle = motion.rotation.get();
        assert!((0.0..=360.0).contains(&angle));

        // Taking over the rotation interrupts the loop
        motion.rotation.set_value(45.0);
        scheduler.advance(FRAME_MS);
        assert!(!scheduler.handle().is_composition_running(id));
        assert_eq!(motion.rotation.get(), 45.0);
    }

    #[test]
    fn test_spin_rotation_is_linear() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        motion.spin(1000.0, Some(1));
        scheduler.advance(250.0);
        assert!((motion.rotation.get() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_new_transition_replaces_running_one() {
        let scheduler = AnimationScheduler::new();
        let (_ctx, motion) = mount(&scheduler);

        let fade_out = motion.fade_out(1000.0).unwrap();
        scheduler.advance(500.0);
        let mid = motion.opacity.get();

        motion.fade_in(1000.0);
        assert_eq!(motion.opacity.get(), mid);
        scheduler.advance(FRAME_MS);
        assert!(!scheduler.handle().is_composition_running(fade_out));
        assert!(motion.opacity.get() > mid);
    }
}
