//! Readiness gate
//!
//! A one-shot flag that turns true once a delay has elapsed on the
//! scheduler's frame clock and a few more frames have been produced after
//! it. Used to hold back work until the first frames of a screen are on
//! screen.
//!
//! ```text
//! NotReady --(delay elapsed, then `frames` ticks)--> Ready
//! ```
//!
//! Ready is terminal for the lifetime of the instance. The pending tick
//! callback is owned by the instance's hook slot, so unmounting before the
//! flip removes it and the flag never changes afterwards.

use crate::store::Scope;
use kinetic_animation::{FrameInfo, SchedulerHandle, TickCallbackId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub delay_ms: f32,
    /// Frame ticks to wait once the delay has elapsed
    pub frames: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500.0,
            frames: 3,
        }
    }
}

/// Observable side of the gate
#[derive(Clone, Debug, Default)]
pub struct ReadinessFlag {
    ready: Arc<AtomicBool>,
}

impl ReadinessFlag {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Counts frames towards the flip
struct Countdown {
    config: ReadinessConfig,
    elapsed_ms: f64,
    frames_after_delay: Option<u32>,
}

impl Countdown {
    fn new(config: ReadinessConfig) -> Self {
        Self {
            config,
            elapsed_ms: 0.0,
            frames_after_delay: None,
        }
    }

    /// Feed one frame; true on the frame the gate opens
    fn on_frame(&mut self, frame: FrameInfo) -> bool {
        match self.frames_after_delay.as_mut() {
            None => {
                self.elapsed_ms += f64::from(frame.dt_ms);
                if self.elapsed_ms >= f64::from(self.config.delay_ms) {
                    self.frames_after_delay = Some(0);
                    return self.config.frames == 0;
                }
                false
            }
            Some(count) => {
                *count += 1;
                *count >= self.config.frames
            }
        }
    }
}

/// Removes the tick callback when the owning slot is dropped
struct TickRegistration {
    handle: SchedulerHandle,
    id: Option<TickCallbackId>,
}

impl Drop for TickRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_tick_callback(id);
        }
    }
}

#[derive(Clone)]
struct ReadinessSlot {
    flag: ReadinessFlag,
    _registration: Arc<TickRegistration>,
}

/// One-shot readiness flag for this instance
pub fn use_readiness(scope: &Scope<'_>, config: ReadinessConfig) -> ReadinessFlag {
    use_readiness_with(scope, config, || {})
}

/// Like [`use_readiness`], calling `on_ready` exactly once when the gate opens
pub fn use_readiness_with<F>(scope: &Scope<'_>, config: ReadinessConfig, on_ready: F) -> ReadinessFlag
where
    F: FnOnce() + Send + 'static,
{
    let slot = scope.use_slot("readiness.gate", || {
        let flag = ReadinessFlag::default();
        let handle = scope.handle().clone();

        let ready = Arc::clone(&flag.ready);
        let redraw = handle.clone();
        let mut countdown = Countdown::new(config);
        let mut on_ready = Some(on_ready);
        let id = handle.register_tick_callback(move |frame| {
            if !countdown.on_frame(frame) {
                return true;
            }
            ready.store(true, Ordering::Release);
            tracing::debug!(frame = frame.frame, "readiness gate opened");
            if let Some(callback) = on_ready.take() {
                callback();
            }
            redraw.request_redraw();
            false
        });

        ReadinessSlot {
            flag,
            _registration: Arc::new(TickRegistration { handle, id }),
        }
    });
    slot.flag
}
