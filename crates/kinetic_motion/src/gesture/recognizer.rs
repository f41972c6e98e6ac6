//! Shared recognizer plumbing: states, event payloads and callbacks

use super::touch::TouchEvent;
use std::fmt;

/// Recognizer state, following the usual platform state machine
///
/// Discrete gestures (tap) go `Possible -> Ended` or `Possible -> Failed`;
/// continuous ones go through `Began` and `Changed` first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Failed,
    Cancelled,
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::Began | GestureState::Changed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GestureState::Ended | GestureState::Failed | GestureState::Cancelled
        )
    }
}

/// Payload passed to gesture callbacks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    /// Focal point (touch position, or the midpoint of a pinch)
    pub x: f32,
    pub y: f32,
    /// Offset from where the gesture started
    pub translation_x: f32,
    pub translation_y: f32,
    /// Pinch scale relative to the initial distance; 1 for other gestures
    pub scale: f32,
    /// Time since the first touch of the gesture
    pub duration_ms: f64,
}

impl GestureEvent {
    pub(crate) fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            translation_x: 0.0,
            translation_y: 0.0,
            scale: 1.0,
            duration_ms: 0.0,
        }
    }
}

pub type GestureCallback = Box<dyn FnMut(&GestureEvent) + Send>;

/// Optional start / update / end callbacks of one gesture
#[derive(Default)]
pub struct GestureCallbacks {
    pub on_start: Option<GestureCallback>,
    pub on_update: Option<GestureCallback>,
    pub on_end: Option<GestureCallback>,
}

impl fmt::Debug for GestureCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

/// Phase reported to callbacks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GesturePhase {
    Start,
    Update,
    End,
}

/// Internal reaction to a gesture, run before the user's callback
pub(crate) type Binding = Box<dyn FnMut(GesturePhase, &GestureEvent) + Send>;

/// Dispatches phases to the binding and then to the user callbacks
#[derive(Default)]
pub(crate) struct Emitter {
    callbacks: GestureCallbacks,
    binding: Option<Binding>,
}

impl Emitter {
    pub(crate) fn new(callbacks: GestureCallbacks) -> Self {
        Self {
            callbacks,
            binding: None,
        }
    }

    pub(crate) fn set_binding(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    pub(crate) fn emit(&mut self, phase: GesturePhase, event: &GestureEvent) {
        if let Some(binding) = self.binding.as_mut() {
            binding(phase, event);
        }
        let callback = match phase {
            GesturePhase::Start => self.callbacks.on_start.as_mut(),
            GesturePhase::Update => self.callbacks.on_update.as_mut(),
            GesturePhase::End => self.callbacks.on_end.as_mut(),
        };
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("callbacks", &self.callbacks)
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

/// A recognizer fed with raw touches
pub trait GestureRecognizer {
    /// Feed one touch change
    fn process(&mut self, event: &TouchEvent);

    /// Advance time without a touch change; only time-based gestures care
    fn tick(&mut self, _now_ms: f64) {}

    fn state(&self) -> GestureState;

    /// Drop any in-progress gesture and return to `Possible`
    fn reset(&mut self);
}

/// Builder methods for option structs carrying a `callbacks` field
macro_rules! impl_gesture_callbacks {
    ($($options:ty),* $(,)?) => {
        $(
            impl $options {
                pub fn on_start<F>(mut self, callback: F) -> Self
                where
                    F: FnMut(&$crate::gesture::GestureEvent) + Send + 'static,
                {
                    self.callbacks.on_start = Some(Box::new(callback));
                    self
                }

                pub fn on_update<F>(mut self, callback: F) -> Self
                where
                    F: FnMut(&$crate::gesture::GestureEvent) + Send + 'static,
                {
                    self.callbacks.on_update = Some(Box::new(callback));
                    self
                }

                pub fn on_end<F>(mut self, callback: F) -> Self
                where
                    F: FnMut(&$crate::gesture::GestureEvent) + Send + 'static,
                {
                    self.callbacks.on_end = Some(Box::new(callback));
                    self
                }
            }
        )*
    };
}

pub(crate) use impl_gesture_callbacks;
