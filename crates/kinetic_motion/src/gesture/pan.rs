//! Pan: a single touch dragged across the surface

use super::recognizer::{
    impl_gesture_callbacks, Emitter, GestureCallbacks, GestureEvent, GesturePhase,
    GestureRecognizer, GestureState,
};
use super::touch::{distance, TouchEvent, TouchPhase};

#[derive(Debug, Default)]
pub struct PanOptions {
    /// Travel needed before the pan activates, in points
    pub min_distance: f32,
    pub callbacks: GestureCallbacks,
}

impl_gesture_callbacks!(PanOptions);

#[derive(Clone, Copy, Debug)]
struct PanTrack {
    id: u64,
    start_x: f32,
    start_y: f32,
    start_ms: f64,
}

/// Tracks the first touch down; later touches are ignored
#[derive(Debug)]
pub struct PanRecognizer {
    min_distance: f32,
    emitter: Emitter,
    track: Option<PanTrack>,
    last: Option<GestureEvent>,
    state: GestureState,
}

impl PanRecognizer {
    pub fn new(options: PanOptions) -> Self {
        Self {
            min_distance: options.min_distance,
            emitter: Emitter::new(options.callbacks),
            track: None,
            last: None,
            state: GestureState::Possible,
        }
    }

    pub(crate) fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn payload(track: &PanTrack, event: &TouchEvent) -> GestureEvent {
        GestureEvent {
            translation_x: event.x - track.start_x,
            translation_y: event.y - track.start_y,
            duration_ms: event.time_ms - track.start_ms,
            ..GestureEvent::at(event.x, event.y)
        }
    }

    fn finish(&mut self, state: GestureState) {
        if self.state.is_active() {
            self.state = state;
            if let Some(last) = self.last {
                self.emitter.emit(GesturePhase::End, &last);
            }
        } else {
            self.state = GestureState::Failed;
        }
        self.track = None;
        self.last = None;
    }
}

impl GestureRecognizer for PanRecognizer {
    fn process(&mut self, event: &TouchEvent) {
        match event.phase {
            TouchPhase::Began => {
                if self.track.is_none() {
                    self.state = GestureState::Possible;
                    self.track = Some(PanTrack {
                        id: event.id,
                        start_x: event.x,
                        start_y: event.y,
                        start_ms: event.time_ms,
                    });
                }
            }
            TouchPhase::Moved => {
                let Some(track) = self.track.filter(|track| track.id == event.id) else {
                    return;
                };
                let payload = Self::payload(&track, event);
                match self.state {
                    GestureState::Possible => {
                        let travelled =
                            distance((track.start_x, track.start_y), (event.x, event.y));
                        if travelled < self.min_distance {
                            return;
                        }
                        self.state = GestureState::Began;
                        self.emitter.emit(GesturePhase::Start, &payload);
                        self.emitter.emit(GesturePhase::Update, &payload);
                    }
                    GestureState::Began | GestureState::Changed => {
                        self.state = GestureState::Changed;
                        self.emitter.emit(GesturePhase::Update, &payload);
                    }
                    _ => return,
                }
                self.last = Some(payload);
            }
            TouchPhase::Ended => {
                if let Some(track) = self.track.filter(|track| track.id == event.id) {
                    if self.state.is_active() {
                        self.last = Some(Self::payload(&track, event));
                    }
                    self.finish(GestureState::Ended);
                }
            }
            TouchPhase::Cancelled => {
                if self.track.is_some_and(|track| track.id == event.id) {
                    self.finish(GestureState::Cancelled);
                }
            }
        }
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn reset(&mut self) {
        self.track = None;
        self.last = None;
        self.state = GestureState::Possible;
    }
}
