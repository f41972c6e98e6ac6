//! Animation scheduler
//!
//! Owns every animatable scalar, every running composition and every
//! frame-tick callback, and advances them once per frame.
//!
//! Frames come from one of:
//! - [`AnimationScheduler::tick`] - wall-clock delta since the previous frame
//! - [`AnimationScheduler::advance`] - explicit delta, for deterministic hosts and tests
//! - [`AnimationScheduler::start_background`] - a 120fps background thread
//!
//! Submitting work never blocks: [`SchedulerHandle::start`] issues the first
//! drivers of a composition and returns immediately.

use crate::composition::{Animation, Progress, RunNode};
use crate::scalar::ScalarArena;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to an animatable scalar
    pub struct ScalarId;
    /// Handle to a submitted composition
    pub struct CompositionId;
    /// Handle to a registered frame-tick callback
    pub struct TickCallbackId;
}

/// Information passed to tick callbacks for each frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frame counter, starting at 1 for the first advanced frame
    pub frame: u64,
    /// Delta since the previous frame in milliseconds
    pub dt_ms: f32,
    /// Total frame time elapsed in milliseconds
    pub elapsed_ms: f64,
}

/// Callback run once per frame, after animations were advanced
///
/// Return `false` to unregister.
pub type TickCallback = Box<dyn FnMut(FrameInfo) -> bool + Send>;

/// Out-of-band completion hook for a composition (`true` when it finished,
/// `false` when it was interrupted or stopped)
pub type CompletionCallback = Box<dyn FnOnce(bool) + Send>;

/// Callback type for waking up the main thread from the animation thread
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

type SharedTickCallback = Arc<Mutex<TickCallback>>;

struct CompositionRun {
    root: RunNode,
    on_complete: Option<CompletionCallback>,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    scalars: ScalarArena,
    compositions: SlotMap<CompositionId, CompositionRun>,
    tick_callbacks: SlotMap<TickCallbackId, SharedTickCallback>,
    last_frame: Instant,
    frame: u64,
    elapsed_ms: f64,
}

impl SchedulerInner {
    fn has_active(&self) -> bool {
        self.scalars.has_active() || !self.compositions.is_empty()
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Milliseconds since the previous frame; restarts the frame clock
fn wall_clock_delta(inner: &Mutex<SchedulerInner>) -> f32 {
    let mut guard = lock(inner);
    let now = Instant::now();
    let dt = now.duration_since(guard.last_frame);
    guard.last_frame = now;
    dt.as_secs_f32() * 1000.0
}

/// Advance everything by `dt_ms`, then run callbacks with the lock released
///
/// Returns true if animations are still active.
fn advance_frame(inner: &Mutex<SchedulerInner>, dt_ms: f32) -> bool {
    let (frame_info, completions, callbacks) = {
        let mut guard = lock(inner);
        let state = &mut *guard;
        state.frame += 1;
        state.elapsed_ms += f64::from(dt_ms);

        state.scalars.step(dt_ms);

        let mut settled = Vec::new();
        for (id, run) in state.compositions.iter_mut() {
            let progress = run.root.poll(dt_ms, &mut state.scalars);
            if progress != Progress::Running {
                settled.push((id, progress == Progress::Finished));
            }
        }

        let mut completions = Vec::new();
        for (id, finished) in settled {
            if let Some(run) = state.compositions.remove(id) {
                tracing::trace!(?id, finished, "composition settled");
                if let Some(callback) = run.on_complete {
                    completions.push((callback, finished));
                }
            }
        }

        let callbacks: Vec<(TickCallbackId, SharedTickCallback)> = state
            .tick_callbacks
            .iter()
            .map(|(id, callback)| (id, Arc::clone(callback)))
            .collect();

        let frame_info = FrameInfo {
            frame: state.frame,
            dt_ms,
            elapsed_ms: state.elapsed_ms,
        };
        (frame_info, completions, callbacks)
    };

    for (callback, finished) in completions {
        callback(finished);
    }

    let mut expired = Vec::new();
    for (id, callback) in callbacks {
        let keep = {
            let mut callback = callback.lock().unwrap_or_else(PoisonError::into_inner);
            (*callback)(frame_info)
        };
        if !keep {
            expired.push(id);
        }
    }

    // Removed callbacks may own scalars whose drop takes the lock again
    let (removed, active) = {
        let mut guard = lock(inner);
        let removed: Vec<SharedTickCallback> = expired
            .into_iter()
            .filter_map(|id| guard.tick_callbacks.remove(id))
            .collect();
        (removed, guard.has_active())
    };
    drop(removed);
    active
}

/// The animation scheduler that advances all scalars and compositions
///
/// Typically held by the application; components get a [`SchedulerHandle`].
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
///
/// // In the frame loop
/// if scheduler.tick() {
///     window.request_redraw();
/// }
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set when a redraw is wanted; the main thread checks and clears it
    needs_redraw: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
    /// Optional callback to wake up the main thread
    wake_callback: Option<WakeCallback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                scalars: ScalarArena::default(),
                compositions: SlotMap::with_key(),
                tick_callbacks: SlotMap::with_key(),
                last_frame: Instant::now(),
                frame: 0,
                elapsed_ms: 0.0,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a wake callback invoked from the background thread while
    /// animations are active
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start the scheduler on a background thread at 120fps
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        tracing::debug!("animation scheduler: background thread started");
        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / 120);

            while !stop_flag.load(Ordering::Relaxed) {
                let started = Instant::now();

                let active = advance_frame(&inner, wall_clock_delta(&inner));
                if active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(wake) = wake_callback.as_deref() {
                        wake();
                    }
                }

                if let Some(rest) = frame_duration.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
            needs_redraw: Arc::clone(&self.needs_redraw),
        }
    }

    /// Advance by the wall-clock time since the previous frame
    ///
    /// Returns true if any animations are still active.
    pub fn tick(&self) -> bool {
        advance_frame(&self.inner, wall_clock_delta(&self.inner))
    }

    /// Advance by an explicit frame delta in milliseconds
    ///
    /// Returns true if any animations are still active.
    pub fn advance(&self, dt_ms: f32) -> bool {
        lock(&self.inner).last_frame = Instant::now();
        advance_frame(&self.inner, dt_ms)
    }

    /// Check if any scalar is being driven or any composition is running
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        lock(&self.inner).frame
    }

    /// Frame time elapsed so far in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        lock(&self.inner).elapsed_ms
    }

    pub fn scalar_count(&self) -> usize {
        lock(&self.inner).scalars.len()
    }

    pub fn composition_count(&self) -> usize {
        lock(&self.inner).compositions.len()
    }

    pub fn tick_callback_count(&self) -> usize {
        lock(&self.inner).tick_callbacks.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("scalars", &self.scalar_count())
            .field("compositions", &self.composition_count())
            .field("background", &self.is_background_running())
            .finish()
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that create scalars and start animations. It does
/// not keep the scheduler alive; once the scheduler is dropped every
/// operation is a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
    needs_redraw: Arc<AtomicBool>,
}

impl SchedulerHandle {
    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        self.inner.upgrade().map(|inner| f(&mut lock(&inner)))
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Ask the host to redraw on its next loop iteration
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    /// Register a scalar and return its ID
    pub fn create_scalar(&self, initial: f32) -> Option<ScalarId> {
        self.with_inner(|inner| inner.scalars.insert(initial))
    }

    /// Get a scalar's current value
    pub fn scalar_value(&self, id: ScalarId) -> Option<f32> {
        self.with_inner(|inner| inner.scalars.value(id)).flatten()
    }

    /// Jump a scalar to `value`, cancelling its driver
    pub fn set_scalar_value(&self, id: ScalarId, value: f32) {
        self.with_inner(|inner| inner.scalars.jump(id, value));
    }

    /// Check if a driver is currently moving the scalar
    pub fn is_scalar_animating(&self, id: ScalarId) -> bool {
        self.with_inner(|inner| inner.scalars.is_animating(id))
            .unwrap_or(false)
    }

    /// Remove a scalar
    pub fn remove_scalar(&self, id: ScalarId) {
        self.with_inner(|inner| inner.scalars.remove(id));
    }

    // =========================================================================
    // Compositions
    // =========================================================================

    /// Submit a composition; its first drivers are issued before returning
    ///
    /// Fire-and-forget: nothing waits for completion. Returns `None` if the
    /// scheduler is gone.
    pub fn start(&self, animation: Animation) -> Option<CompositionId> {
        self.submit(animation, None)
    }

    /// Submit a composition with a completion callback
    ///
    /// The callback runs on the frame the composition settles, outside the
    /// scheduler lock.
    pub fn start_with_callback<F>(&self, animation: Animation, on_complete: F) -> Option<CompositionId>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.submit(animation, Some(Box::new(on_complete)))
    }

    fn submit(
        &self,
        animation: Animation,
        on_complete: Option<CompletionCallback>,
    ) -> Option<CompositionId> {
        let leaves = animation.leaf_count();
        let id = self.with_inner(|inner| {
            // Prevent a huge first delta when the host ticks by wall clock
            inner.last_frame = Instant::now();
            let root = RunNode::launch(animation, &mut inner.scalars);
            inner.compositions.insert(CompositionRun { root, on_complete })
        });
        if let Some(id) = id {
            tracing::trace!(?id, leaves, "composition started");
            self.request_redraw();
        }
        id
    }

    /// Check if a composition is still running
    pub fn is_composition_running(&self, id: CompositionId) -> bool {
        self.with_inner(|inner| inner.compositions.contains_key(id))
            .unwrap_or(false)
    }

    /// Stop tracking a composition
    ///
    /// Drivers already issued keep moving their scalars; a new animation on
    /// the same scalars replaces them. The completion callback, if any, is
    /// called with `false`.
    pub fn stop_composition(&self, id: CompositionId) {
        let run = self.with_inner(|inner| inner.compositions.remove(id)).flatten();
        if let Some(callback) = run.and_then(|run| run.on_complete) {
            callback(false);
        }
    }

    // =========================================================================
    // Tick callbacks
    // =========================================================================

    /// Register a callback run once per frame after animations advance
    pub fn register_tick_callback<F>(&self, callback: F) -> Option<TickCallbackId>
    where
        F: FnMut(FrameInfo) -> bool + Send + 'static,
    {
        let callback: TickCallback = Box::new(callback);
        self.with_inner(|inner| {
            inner.last_frame = Instant::now();
            inner.tick_callbacks.insert(Arc::new(Mutex::new(callback)))
        })
    }

    /// Remove a tick callback; it will not run on any later frame
    pub fn remove_tick_callback(&self, id: TickCallbackId) {
        self.with_inner(|inner| inner.tick_callbacks.remove(id));
    }

    /// Check if a tick callback is still registered
    pub fn has_tick_callback(&self, id: TickCallbackId) -> bool {
        self.with_inner(|inner| inner.tick_callbacks.contains_key(id))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
