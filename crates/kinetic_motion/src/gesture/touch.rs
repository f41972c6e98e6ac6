//! Raw touch input
//!
//! One event per touch change, the way platform layers report them.

use smallvec::SmallVec;

/// Touch phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Touch began
    Began,
    /// Touch moved
    Moved,
    /// Touch ended
    Ended,
    /// Touch cancelled by the system
    Cancelled,
}

/// A single touch change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Unique identifier of the touch for as long as it is down
    pub id: u64,
    /// X position in logical points
    pub x: f32,
    /// Y position in logical points
    pub y: f32,
    pub phase: TouchPhase,
    /// Event time in milliseconds, on any monotonic clock
    pub time_ms: f64,
}

impl TouchEvent {
    pub fn new(id: u64, x: f32, y: f32, phase: TouchPhase, time_ms: f64) -> Self {
        Self {
            id,
            x,
            y,
            phase,
            time_ms,
        }
    }

    pub fn began(id: u64, x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(id, x, y, TouchPhase::Began, time_ms)
    }

    pub fn moved(id: u64, x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(id, x, y, TouchPhase::Moved, time_ms)
    }

    pub fn ended(id: u64, x: f32, y: f32, time_ms: f64) -> Self {
        Self::new(id, x, y, TouchPhase::Ended, time_ms)
    }

    pub fn cancelled(id: u64, time_ms: f64) -> Self {
        Self::new(id, 0.0, 0.0, TouchPhase::Cancelled, time_ms)
    }
}

/// Position of a touch that is currently down
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn distance_to(&self, other: &TouchPoint) -> f32 {
        distance((self.x, self.y), (other.x, other.y))
    }
}

pub(crate) fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Touches currently down, in the order they began
#[derive(Clone, Debug, Default)]
pub struct ActiveTouches {
    touches: SmallVec<[TouchPoint; 4]>,
}

impl ActiveTouches {
    /// Update from an event; returns the number of touches down before it
    pub fn apply(&mut self, event: &TouchEvent) -> usize {
        let before = self.touches.len();
        match event.phase {
            TouchPhase::Began => self.touches.push(TouchPoint {
                id: event.id,
                x: event.x,
                y: event.y,
            }),
            TouchPhase::Moved => {
                if let Some(touch) = self.touches.iter_mut().find(|t| t.id == event.id) {
                    touch.x = event.x;
                    touch.y = event.y;
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|t| t.id != event.id);
            }
        }
        before
    }

    pub fn get(&self, id: u64) -> Option<&TouchPoint> {
        self.touches.iter().find(|t| t.id == id)
    }

    /// Earliest touch still down other than `id`
    pub fn first_other(&self, id: u64) -> Option<&TouchPoint> {
        self.touches.iter().find(|t| t.id != id)
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}
