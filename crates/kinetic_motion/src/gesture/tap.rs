//! Tap: a single touch released quickly, close to where it went down

use super::recognizer::{
    impl_gesture_callbacks, Emitter, GestureCallbacks, GestureEvent, GesturePhase,
    GestureRecognizer, GestureState,
};
use super::touch::{distance, ActiveTouches, TouchEvent, TouchPhase};

#[derive(Debug)]
pub struct TapOptions {
    /// Longest press that still counts as a tap
    pub max_duration_ms: f64,
    /// Farthest the touch may travel, in points
    pub max_distance: f32,
    pub callbacks: GestureCallbacks,
}

impl Default for TapOptions {
    fn default() -> Self {
        Self {
            max_duration_ms: 250.0,
            max_distance: 10.0,
            callbacks: GestureCallbacks::default(),
        }
    }
}

impl_gesture_callbacks!(TapOptions);

#[derive(Clone, Copy, Debug)]
struct TapStart {
    id: u64,
    x: f32,
    y: f32,
    time_ms: f64,
}

/// Reports start and end together when a tap completes
#[derive(Debug)]
pub struct TapRecognizer {
    max_duration_ms: f64,
    max_distance: f32,
    emitter: Emitter,
    touches: ActiveTouches,
    start: Option<TapStart>,
    state: GestureState,
}

impl TapRecognizer {
    pub fn new(options: TapOptions) -> Self {
        Self {
            max_duration_ms: options.max_duration_ms,
            max_distance: options.max_distance,
            emitter: Emitter::new(options.callbacks),
            touches: ActiveTouches::default(),
            start: None,
            state: GestureState::Possible,
        }
    }

    fn fail(&mut self) {
        self.state = GestureState::Failed;
        self.start = None;
    }
}

impl GestureRecognizer for TapRecognizer {
    fn process(&mut self, event: &TouchEvent) {
        let down_before = self.touches.apply(event);
        let tracked = self.start.filter(|start| start.id == event.id);

        match event.phase {
            TouchPhase::Began => {
                if down_before == 0 {
                    self.state = GestureState::Possible;
                    self.start = Some(TapStart {
                        id: event.id,
                        x: event.x,
                        y: event.y,
                        time_ms: event.time_ms,
                    });
                } else if self.state == GestureState::Possible {
                    // A second finger turns it into something else
                    self.fail();
                }
            }
            TouchPhase::Moved => {
                if let Some(start) = tracked {
                    if distance((start.x, start.y), (event.x, event.y)) > self.max_distance {
                        self.fail();
                    }
                }
            }
            TouchPhase::Ended => {
                let Some(start) = tracked else {
                    return;
                };
                let duration_ms = event.time_ms - start.time_ms;
                let travelled = distance((start.x, start.y), (event.x, event.y));
                if self.state != GestureState::Possible
                    || duration_ms > self.max_duration_ms
                    || travelled > self.max_distance
                {
                    self.fail();
                    return;
                }

                self.state = GestureState::Ended;
                self.start = None;
                let payload = GestureEvent {
                    duration_ms,
                    ..GestureEvent::at(event.x, event.y)
                };
                self.emitter.emit(GesturePhase::Start, &payload);
                self.emitter.emit(GesturePhase::End, &payload);
            }
            TouchPhase::Cancelled => {
                if tracked.is_some() {
                    self.state = GestureState::Cancelled;
                    self.start = None;
                }
            }
        }
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn reset(&mut self) {
        self.touches.clear();
        self.start = None;
        self.state = GestureState::Possible;
    }
}
