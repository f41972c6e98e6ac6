//! Gesture-driven transforms
//!
//! [`use_gestures`] wires four recognizers to three scalars:
//! - pan moves `translate_x` / `translate_y`
//! - pinch scales `scale`
//! - tap and long-press only report through their callbacks
//!
//! Pan and pinch keep a saved value between gestures, so a second drag
//! continues from where the first one left off. Each saved value is written
//! only by its own gesture (and by [`Gestures::reset`]).

mod long_press;
mod pan;
mod pinch;
mod recognizer;
mod tap;
mod touch;

pub use long_press::{LongPressOptions, LongPressRecognizer};
pub use pan::{PanOptions, PanRecognizer};
pub use pinch::{PinchOptions, PinchRecognizer};
pub use recognizer::{GestureCallback, GestureCallbacks, GestureEvent, GestureRecognizer, GestureState};
pub use tap::{TapOptions, TapRecognizer};
pub use touch::{ActiveTouches, TouchEvent, TouchPhase, TouchPoint};

use crate::store::Scope;
use crate::style::{MotionStyle, Sample, Sampled};
use kinetic_animation::{AnimatedScalar, Animation, CompositionId, SchedulerHandle, SpringConfig};
use recognizer::GesturePhase;
use smallvec::smallvec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Per-gesture options for [`use_gestures`]
#[derive(Debug, Default)]
pub struct GestureOptions {
    pub tap: TapOptions,
    pub pan: PanOptions,
    pub pinch: PinchOptions,
    pub long_press: LongPressOptions,
}

/// Values carried from one gesture to the next
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for SavedTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

type SharedSaved = Arc<Mutex<SavedTransform>>;

fn lock(saved: &SharedSaved) -> MutexGuard<'_, SavedTransform> {
    saved.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct Gestures {
    pub tap: TapRecognizer,
    pub pan: PanRecognizer,
    pub pinch: PinchRecognizer,
    pub long_press: LongPressRecognizer,
    pub translate_x: AnimatedScalar,
    pub translate_y: AnimatedScalar,
    pub scale: AnimatedScalar,
    saved: SharedSaved,
    handle: SchedulerHandle,
}

impl Gestures {
    /// Feed a touch change to every recognizer
    pub fn process(&mut self, event: &TouchEvent) {
        self.tap.process(event);
        self.pan.process(event);
        self.pinch.process(event);
        self.long_press.process(event);
    }

    /// Let time-based recognizers fire without a touch change
    pub fn tick(&mut self, now_ms: f64) {
        self.tap.tick(now_ms);
        self.pan.tick(now_ms);
        self.pinch.tick(now_ms);
        self.long_press.tick(now_ms);
    }

    pub fn saved(&self) -> SavedTransform {
        *lock(&self.saved)
    }

    /// Spring back to the identity transform and forget saved values
    pub fn reset(&self) -> Option<CompositionId> {
        *lock(&self.saved) = SavedTransform::default();
        Animation::parallel([
            self.translate_x.spring_to(0.0, SpringConfig::worklet()),
            self.translate_y.spring_to(0.0, SpringConfig::worklet()),
            self.scale.spring_to(1.0, SpringConfig::worklet()),
        ])
        .start(&self.handle)
    }

    pub fn style(&self) -> MotionStyle {
        MotionStyle {
            translate_x: self.translate_x.get(),
            translate_y: self.translate_y.get(),
            scale: self.scale.get(),
            ..MotionStyle::IDENTITY
        }
    }
}

impl Sampled for Gestures {
    fn sample(&self) -> Sample {
        smallvec![
            ("translate_x", self.translate_x.get()),
            ("translate_y", self.translate_y.get()),
            ("scale", self.scale.get()),
        ]
    }
}

fn bind_pan(pan: &mut PanRecognizer, x: AnimatedScalar, y: AnimatedScalar, saved: SharedSaved) {
    pan.emitter_mut().set_binding(Box::new(move |phase, event| match phase {
        GesturePhase::Start => {
            let mut saved = lock(&saved);
            saved.translate_x = x.get();
            saved.translate_y = y.get();
        }
        GesturePhase::Update => {
            let saved = *lock(&saved);
            x.set_value(saved.translate_x + event.translation_x);
            y.set_value(saved.translate_y + event.translation_y);
        }
        GesturePhase::End => {
            let mut saved = lock(&saved);
            saved.translate_x = x.get();
            saved.translate_y = y.get();
        }
    }));
}

fn bind_pinch(pinch: &mut PinchRecognizer, scale: AnimatedScalar, saved: SharedSaved) {
    pinch.emitter_mut().set_binding(Box::new(move |phase, event| match phase {
        GesturePhase::Start | GesturePhase::End => lock(&saved).scale = scale.get(),
        GesturePhase::Update => {
            let base = lock(&saved).scale;
            scale.set_value(base * event.scale);
        }
    }));
}

/// Pan / pinch / tap / long-press recognizers bound to a transform
///
/// Recognizers are rebuilt on every call with the given callbacks; the
/// scalars and saved values persist for the instance.
pub fn use_gestures(scope: &Scope<'_>, options: GestureOptions) -> Gestures {
    let translate_x = scope.use_scalar("gestures.translate_x", 0.0);
    let translate_y = scope.use_scalar("gestures.translate_y", 0.0);
    let scale = scope.use_scalar("gestures.scale", 1.0);
    let saved: SharedSaved = scope.use_slot("gestures.saved", Default::default);

    let mut pan = PanRecognizer::new(options.pan);
    bind_pan(&mut pan, translate_x.clone(), translate_y.clone(), Arc::clone(&saved));
    let mut pinch = PinchRecognizer::new(options.pinch);
    bind_pinch(&mut pinch, scale.clone(), Arc::clone(&saved));

    Gestures {
        tap: TapRecognizer::new(options.tap),
        pan,
        pinch,
        long_press: LongPressRecognizer::new(options.long_press),
        translate_x,
        translate_y,
        scale,
        saved,
        handle: scope.handle().clone(),
    }
}
