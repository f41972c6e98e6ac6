//! Long press: a single touch held in place

use super::recognizer::{
    impl_gesture_callbacks, Emitter, GestureCallbacks, GestureEvent, GesturePhase,
    GestureRecognizer, GestureState,
};
use super::touch::{distance, ActiveTouches, TouchEvent, TouchPhase};

#[derive(Debug)]
pub struct LongPressOptions {
    /// How long the touch must be held
    pub min_duration_ms: f64,
    /// Farthest the touch may drift before recognition, in points
    pub max_distance: f32,
    pub callbacks: GestureCallbacks,
}

impl Default for LongPressOptions {
    fn default() -> Self {
        Self {
            min_duration_ms: 500.0,
            max_distance: 10.0,
            callbacks: GestureCallbacks::default(),
        }
    }
}

impl_gesture_callbacks!(LongPressOptions);

#[derive(Clone, Copy, Debug)]
struct Press {
    id: u64,
    start_x: f32,
    start_y: f32,
    x: f32,
    y: f32,
    start_ms: f64,
}

impl Press {
    fn payload(&self, now_ms: f64) -> GestureEvent {
        GestureEvent {
            translation_x: self.x - self.start_x,
            translation_y: self.y - self.start_y,
            duration_ms: now_ms - self.start_ms,
            ..GestureEvent::at(self.x, self.y)
        }
    }
}

/// Recognised by time: either on [`GestureRecognizer::tick`] or on the next
/// touch event past the threshold
#[derive(Debug)]
pub struct LongPressRecognizer {
    min_duration_ms: f64,
    max_distance: f32,
    emitter: Emitter,
    touches: ActiveTouches,
    press: Option<Press>,
    state: GestureState,
}

impl LongPressRecognizer {
    pub fn new(options: LongPressOptions) -> Self {
        Self {
            min_duration_ms: options.min_duration_ms,
            max_distance: options.max_distance,
            emitter: Emitter::new(options.callbacks),
            touches: ActiveTouches::default(),
            press: None,
            state: GestureState::Possible,
        }
    }

    fn check_held(&mut self, now_ms: f64) {
        if self.state != GestureState::Possible {
            return;
        }
        let Some(press) = self.press else {
            return;
        };
        if now_ms - press.start_ms >= self.min_duration_ms {
            self.state = GestureState::Began;
            self.emitter.emit(GesturePhase::Start, &press.payload(now_ms));
        }
    }

    fn fail(&mut self) {
        self.state = GestureState::Failed;
        self.press = None;
    }
}

impl GestureRecognizer for LongPressRecognizer {
    fn process(&mut self, event: &TouchEvent) {
        // Time passes before the event is applied
        self.check_held(event.time_ms);
        let down_before = self.touches.apply(event);
        let tracked = self.press.filter(|press| press.id == event.id);

        match event.phase {
            TouchPhase::Began => {
                if down_before == 0 {
                    self.state = GestureState::Possible;
                    self.press = Some(Press {
                        id: event.id,
                        start_x: event.x,
                        start_y: event.y,
                        x: event.x,
                        y: event.y,
                        start_ms: event.time_ms,
                    });
                } else if self.state == GestureState::Possible {
                    self.fail();
                }
            }
            TouchPhase::Moved => {
                let Some(mut press) = tracked else {
                    return;
                };
                press.x = event.x;
                press.y = event.y;
                self.press = Some(press);

                if self.state == GestureState::Possible {
                    if distance((press.start_x, press.start_y), (event.x, event.y))
                        > self.max_distance
                    {
                        self.fail();
                    }
                } else if self.state.is_active() {
                    self.state = GestureState::Changed;
                    self.emitter
                        .emit(GesturePhase::Update, &press.payload(event.time_ms));
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                let Some(press) = tracked else {
                    return;
                };
                if self.state.is_active() {
                    self.state = if event.phase == TouchPhase::Ended {
                        GestureState::Ended
                    } else {
                        GestureState::Cancelled
                    };
                    self.emitter.emit(GesturePhase::End, &press.payload(event.time_ms));
                    self.press = None;
                } else {
                    self.fail();
                }
            }
        }
    }

    fn tick(&mut self, now_ms: f64) {
        self.check_held(now_ms);
    }

    fn state(&self) -> GestureState {
        self.state
    }

    fn reset(&mut self) {
        self.touches.clear();
        self.press = None;
        self.state = GestureState::Possible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn logging_press() -> (LongPressRecognizer, Arc<Mutex<Vec<(&'static str, f64)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (start, end) = (Arc::clone(&log), Arc::clone(&log));
        let press = LongPressRecognizer::new(
            LongPressOptions::default()
                .on_start(move |e| start.lock().unwrap().push(("start", e.duration_ms)))
                .on_end(move |e| end.lock().unwrap().push(("end", e.duration_ms))),
        );
        (press, log)
    }

    #[test]
    fn test_recognised_on_tick() {
        let (mut press, log) = logging_press();
        press.process(&TouchEvent::began(1, 0.0, 0.0, 1000.0));

        press.tick(1499.0);
        assert_eq!(press.state(), GestureState::Possible);
        press.tick(1500.0);
        assert_eq!(press.state(), GestureState::Began);

        press.process(&TouchEvent::ended(1, 0.0, 0.0, 1800.0));
        assert_eq!(press.state(), GestureState::Ended);
        assert_eq!(*log.lock().unwrap(), vec![("start", 500.0), ("end", 800.0)]);
    }

    #[test]
    fn test_recognised_on_next_event() {
        let (mut press, log) = logging_press();
        press.process(&TouchEvent::began(1, 0.0, 0.0, 0.0));
        press.process(&TouchEvent::ended(1, 0.0, 0.0, 600.0));

        assert_eq!(press.state(), GestureState::Ended);
        assert_eq!(*log.lock().unwrap(), vec![("start", 600.0), ("end", 600.0)]);
    }

    #[test]
    fn test_short_press_fails() {
        let (mut press, log) = logging_press();
        press.process(&TouchEvent::began(1, 0.0, 0.0, 0.0));
        press.process(&TouchEvent::ended(1, 0.0, 0.0, 300.0));
        press.tick(1000.0);

        assert_eq!(press.state(), GestureState::Failed);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drift_before_recognition_fails() {
        let (mut press, log) = logging_press();
        press.process(&TouchEvent::began(1, 0.0, 0.0, 0.0));
        press.process(&TouchEvent::moved(1, 0.0, 15.0, 100.0));
        press.tick(600.0);

        assert_eq!(press.state(), GestureState::Failed);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_small_drift_is_tolerated() {
        let (mut press, _log) = logging_press();
        press.process(&TouchEvent::began(1, 0.0, 0.0, 0.0));
        press.process(&TouchEvent::moved(1, 6.0, 6.0, 100.0));
        press.tick(500.0);
        assert_eq!(press.state(), GestureState::Began);
    }
}
