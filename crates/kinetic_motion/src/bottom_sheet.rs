//! Bottom sheet slide and backdrop
//!
//! The sheet rests one screen height below its open position. Every change
//! of `visible` (including the first value observed after mount) replaces
//! the running pair with a new one heading the other way, starting from
//! wherever the scalars are.

use crate::store::Scope;
use crate::style::{MotionStyle, Sample, Sampled};
use kinetic_animation::{AnimatedScalar, Animation, CompositionId, Easing, TimingConfig};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottomSheetOptions {
    /// Opening duration
    pub duration_ms: f32,
    pub close_duration_ms: f32,
}

impl Default for BottomSheetOptions {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            close_duration_ms: 250.0,
        }
    }
}

#[derive(Debug, Default)]
struct SheetState {
    last_visible: Option<bool>,
    running: Option<CompositionId>,
}

#[derive(Clone, Debug)]
pub struct BottomSheet {
    /// Vertical offset from the open position; screen height when closed
    pub slide: AnimatedScalar,
    pub backdrop_opacity: AnimatedScalar,
}

impl BottomSheet {
    pub fn sheet_style(&self) -> MotionStyle {
        MotionStyle {
            translate_y: self.slide.get(),
            ..MotionStyle::IDENTITY
        }
    }

    pub fn backdrop_style(&self) -> MotionStyle {
        MotionStyle {
            opacity: self.backdrop_opacity.get(),
            ..MotionStyle::IDENTITY
        }
    }
}

impl Sampled for BottomSheet {
    fn sample(&self) -> Sample {
        smallvec![
            ("slide", self.slide.get()),
            ("backdrop_opacity", self.backdrop_opacity.get()),
        ]
    }
}

/// Slide/backdrop pair following `visible`
pub fn use_bottom_sheet(scope: &Scope<'_>, visible: bool, options: BottomSheetOptions) -> BottomSheet {
    let height = scope.screen().height;
    let sheet = BottomSheet {
        slide: scope.use_scalar("bottom_sheet.slide", height),
        backdrop_opacity: scope.use_scalar("bottom_sheet.backdrop_opacity", 0.0),
    };
    let state: Arc<Mutex<SheetState>> = scope.use_slot("bottom_sheet.state", Default::default);

    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.last_visible == Some(visible) {
        return sheet;
    }
    state.last_visible = Some(visible);

    let handle = scope.handle();
    if let Some(previous) = state.running.take() {
        handle.stop_composition(previous);
    }

    let (slide_to, backdrop_to, duration_ms) = if visible {
        (0.0, 1.0, options.duration_ms)
    } else {
        (height, 0.0, options.close_duration_ms)
    };
    let config = TimingConfig::new(duration_ms, Easing::EaseInOut);

    tracing::debug!(instance = %scope.instance(), visible, duration_ms, "bottom sheet transition");
    state.running = Animation::parallel([
        sheet.slide.timing_to(slide_to, config),
        sheet.backdrop_opacity.timing_to(backdrop_to, config),
    ])
    .start(handle);
    drop(state);

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::store::{InstanceKey, MotionContext};
    use kinetic_animation::AnimationScheduler;

    const HEIGHT: f32 = 800.0;

    fn context(scheduler: &AnimationScheduler) -> MotionContext {
        MotionContext::new(
            scheduler.handle(),
            ScreenMetrics {
                width: 400.0,
                height: HEIGHT,
            },
        )
    }

    #[test]
    fn test_initial_values() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let sheet = use_bottom_sheet(
            &ctx.scope(&InstanceKey::explicit("sheet")),
            false,
            BottomSheetOptions::default(),
        );
        assert_eq!(sheet.slide.get(), HEIGHT);
        assert_eq!(sheet.backdrop_opacity.get(), 0.0);
    }

    #[test]
    fn test_open_takes_duration() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let sheet = use_bottom_sheet(
            &ctx.scope(&InstanceKey::explicit("sheet")),
            true,
            BottomSheetOptions::default(),
        );

        assert!(sheet.slide.is_animating());
        scheduler.advance(299.0);
        assert!(sheet.slide.get() > 0.0);
        assert!(sheet.backdrop_opacity.get() < 1.0);

        scheduler.advance(1.0);
        assert_eq!(sheet.slide.get(), 0.0);
        assert_eq!(sheet.backdrop_opacity.get(), 1.0);
    }

    #[test]
    fn test_close_uses_close_duration() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let key = InstanceKey::explicit("sheet");

        use_bottom_sheet(&ctx.scope(&key), true, BottomSheetOptions::default());
        scheduler.advance(300.0);

        let sheet = use_bottom_sheet(&ctx.scope(&key), false, BottomSheetOptions::default());
        scheduler.advance(249.0);
        assert!(sheet.slide.get() < HEIGHT);
        scheduler.advance(1.0);
        assert_eq!(sheet.slide.get(), HEIGHT);
        assert_eq!(sheet.backdrop_opacity.get(), 0.0);
    }

    #[test]
    fn test_first_observation_triggers_close_animation() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let sheet = use_bottom_sheet(
            &ctx.scope(&InstanceKey::explicit("sheet")),
            false,
            BottomSheetOptions::default(),
        );

        // Already at rest, but a closing pair is still issued
        assert!(sheet.slide.is_animating());
        assert_eq!(scheduler.composition_count(), 1);
    }

    #[test]
    fn test_same_value_does_not_restart() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let key = InstanceKey::explicit("sheet");

        use_bottom_sheet(&ctx.scope(&key), true, BottomSheetOptions::default());
        scheduler.advance(150.0);
        let sheet = use_bottom_sheet(
            &ctx.scope(&key),
            true,
            BottomSheetOptions {
                duration_ms: 10_000.0,
                ..BottomSheetOptions::default()
            },
        );

        // Still on the original 300 ms schedule
        scheduler.advance(150.0);
        assert_eq!(sheet.slide.get(), 0.0);
    }

    #[test]
    fn test_changed_duration_applies_at_next_toggle() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let key = InstanceKey::explicit("sheet");
        let slow = BottomSheetOptions {
            duration_ms: 1000.0,
            close_duration_ms: 1000.0,
        };

        use_bottom_sheet(&ctx.scope(&key), true, BottomSheetOptions::default());
        scheduler.advance(300.0);
        let sheet = use_bottom_sheet(&ctx.scope(&key), false, slow);

        scheduler.advance(500.0);
        assert!(sheet.slide.get() < HEIGHT);
        scheduler.advance(500.0);
        assert_eq!(sheet.slide.get(), HEIGHT);
    }

    #[test]
    fn test_retoggle_restarts_from_live_value() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let key = InstanceKey::explicit("sheet");

        use_bottom_sheet(&ctx.scope(&key), true, BottomSheetOptions::default());
        scheduler.advance(150.0);
        let midway = ctx.scope(&key).use_scalar("bottom_sheet.slide", HEIGHT).get();
        assert!(midway > 0.0 && midway < HEIGHT);

        let sheet = use_bottom_sheet(&ctx.scope(&key), false, BottomSheetOptions::default());
        // No jump back to either end
        assert_eq!(sheet.slide.get(), midway);
        assert_eq!(scheduler.composition_count(), 1);

        scheduler.advance(16.0);
        assert!(sheet.slide.get() > midway);
        scheduler.advance(250.0);
        assert_eq!(sheet.slide.get(), HEIGHT);
    }

    #[test]
    fn test_styles() {
        let scheduler = AnimationScheduler::new();
        let ctx = context(&scheduler);
        let sheet = use_bottom_sheet(
            &ctx.scope(&InstanceKey::explicit("sheet")),
            true,
            BottomSheetOptions::default(),
        );
        scheduler.advance(300.0);

        assert!(sheet.sheet_style().is_identity());
        assert!(sheet.backdrop_style().is_identity());
    }
}
