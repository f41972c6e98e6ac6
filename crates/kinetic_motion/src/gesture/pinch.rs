//! Pinch: two touches moving apart or together

use super::recognizer::{
    impl_gesture_callbacks, Emitter, GestureCallbacks, GestureEvent, GesturePhase,
    GestureRecognizer, GestureState,
};
use super::touch::{ActiveTouches, TouchEvent, TouchPhase, TouchPoint};

/// Below this initial distance the scale is pinned to 1
const MIN_PINCH_DISTANCE: f32 = 1e-3;

#[derive(Debug, Default)]
pub struct PinchOptions {
    pub callbacks: GestureCallbacks,
}

impl_gesture_callbacks!(PinchOptions);

#[derive(Clone, Copy, Debug)]
struct PinchPair {
    first: u64,
    second: u64,
    initial_distance: f32,
    start_ms: f64,
}

/// Activates as soon as a second touch goes down
#[derive(Debug)]
pub struct PinchRecognizer {
    emitter: Emitter,
    touches: ActiveTouches,
    pair: Option<PinchPair>,
    last: Option<GestureEvent>,
    state: GestureState,
}

impl PinchRecognizer {
    pub fn new(options: PinchOptions) -> Self {
        Self {
            emitter: Emitter::new(options.callbacks),
            touches: ActiveTouches::default(),
            pair: None,
            last: None,
            state: GestureState::Possible,
        }
    }

    pub(crate) fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn points(&self, pair: &PinchPair) -> Option<(TouchPoint, TouchPoint)> {
        Some((*self.touches.get(pair.first)?, *self.touches.get(pair.second)?))
    }

    fn payload(&self, pair: &PinchPair, time_ms: f64) -> Option<GestureEvent> {
        let (a, b) = self.points(pair)?;
        let scale = if pair.initial_distance > MIN_PINCH_DISTANCE {
            a.distance_to(&b) / pair.initial_distance
        } else {
            1.0
        };
        Some(GestureEvent {
            scale,
            duration_ms: time_ms - pair.start_ms,
            ..GestureEvent::at((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
        })
    }
}

impl GestureRecognizer for PinchRecognizer {
    fn process(&mut self, event: &TouchEvent) {
        let down_before = self.touches.apply(event);

        match event.phase {
            TouchPhase::Began => {
                if down_before == 0 {
                    self.state = GestureState::Possible;
                } else if down_before == 1 && self.pair.is_none() {
                    let Some(first) = self.touches.first_other(event.id).copied() else {
                        return;
                    };
                    let second = TouchPoint {
                        id: event.id,
                        x: event.x,
                        y: event.y,
                    };
                    let pair = PinchPair {
                        first: first.id,
                        second: event.id,
                        initial_distance: first.distance_to(&second),
                        start_ms: event.time_ms,
                    };
                    self.pair = Some(pair);
                    self.state = GestureState::Began;
                    if let Some(payload) = self.payload(&pair, event.time_ms) {
                        self.emitter.emit(GesturePhase::Start, &payload);
                        self.last = Some(payload);
                    }
                }
            }
            TouchPhase::Moved => {
                let Some(pair) = self.pair else {
                    return;
                };
                if event.id != pair.first && event.id != pair.second {
                    return;
                }
                if let Some(payload) = self.payload(&pair, event.time_ms) {
                    self.state = GestureState::Changed;
                    self.emitter.emit(GesturePhase::Update, &payload);
                    self.last = Some(payload);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                let Some(pair) = self.pair else {
                    return;
                };
                if event.id != pair.first && event.id != pair.second {
                    return;
                }
                self.state = if event.phase == TouchPhase::Ended {
                    GestureState::Ended
                } else {
                    GestureState::Cancelled
                };
                if let Some(last) = self.last.take() {
                    self.emitter.emit(GesturePhase::End, &last);
                }
                self.pair = None;
            }
        }
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn reset(&mut self) {
        self.touches.clear();
        self.pair = None;
        self.last = None;
        self.state = GestureState::Possible;
    }
}
