//! Animatable scalars
//!
//! A scalar is a numeric cell owned by the scheduler and driven by at most
//! one timing or spring driver at a time. Starting a new driver on a scalar
//! replaces the old one; the replacement starts from the live value.
//!
//! [`AnimatedScalar`] is the user-facing handle. Clones share the same cell,
//! and the cell is released when the last clone is dropped.

use crate::composition::{Animation, Progress};
use crate::scheduler::{ScalarId, SchedulerHandle};
use crate::spring::{Spring, SpringConfig};
use crate::timing::{Timing, TimingConfig};
use slotmap::SlotMap;
use std::sync::Arc;

/// Largest spring integration step, in seconds
const MAX_SPRING_STEP_SECS: f32 = 1.0 / 120.0;

#[derive(Clone, Copy, Debug)]
pub(crate) enum DriverKind {
    Timing(Timing),
    Spring(Spring),
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Driver {
    token: u64,
    kind: DriverKind,
}

#[derive(Debug)]
pub(crate) struct ScalarCell {
    value: f32,
    driver: Option<Driver>,
    /// Token of the last driver that ran to completion on this cell
    completed: Option<u64>,
}

impl ScalarCell {
    fn new(value: f32) -> Self {
        Self {
            value,
            driver: None,
            completed: None,
        }
    }

    fn step(&mut self, dt_ms: f32) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };

        let done = match &mut driver.kind {
            DriverKind::Timing(timing) => {
                timing.step(dt_ms);
                self.value = timing.value();
                timing.is_finished()
            }
            DriverKind::Spring(spring) => {
                // Long frames are integrated in sub-steps to keep RK4 stable
                let mut remaining = dt_ms.max(0.0) / 1000.0;
                loop {
                    let h = remaining.min(MAX_SPRING_STEP_SECS);
                    spring.step(h);
                    remaining -= h;
                    if remaining <= 0.0 || spring.is_settled() {
                        break;
                    }
                }
                self.value = spring.value();
                spring.is_settled()
            }
        };

        if done {
            self.completed = Some(driver.token);
            self.driver = None;
        }
    }
}

/// Arena of every scalar registered with a scheduler
#[derive(Debug, Default)]
pub(crate) struct ScalarArena {
    cells: SlotMap<ScalarId, ScalarCell>,
    next_token: u64,
}

impl ScalarArena {
    pub(crate) fn insert(&mut self, initial: f32) -> ScalarId {
        self.cells.insert(ScalarCell::new(initial))
    }

    pub(crate) fn remove(&mut self, id: ScalarId) {
        self.cells.remove(id);
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn value(&self, id: ScalarId) -> Option<f32> {
        self.cells.get(id).map(|cell| cell.value)
    }

    /// Set the value immediately, cancelling any driver
    pub(crate) fn jump(&mut self, id: ScalarId, value: f32) -> bool {
        match self.cells.get_mut(id) {
            Some(cell) => {
                cell.driver = None;
                cell.value = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn begin_timing(
        &mut self,
        id: ScalarId,
        target: f32,
        config: TimingConfig,
    ) -> Option<u64> {
        let from = self.value(id)?;
        Some(self.install(id, DriverKind::Timing(Timing::new(from, target, config))))
    }

    pub(crate) fn begin_spring(
        &mut self,
        id: ScalarId,
        target: f32,
        config: SpringConfig,
    ) -> Option<u64> {
        let mut spring = Spring::new(config, self.value(id)?);
        spring.set_target(target);
        Some(self.install(id, DriverKind::Spring(spring)))
    }

    fn install(&mut self, id: ScalarId, kind: DriverKind) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(cell) = self.cells.get_mut(id) {
            if cell.driver.is_some() {
                tracing::trace!(?id, "replacing in-flight driver");
            }
            cell.driver = Some(Driver { token, kind });
        }
        token
    }

    /// Where the driver identified by `token` stands on scalar `id`
    pub(crate) fn status(&self, id: ScalarId, token: u64) -> Progress {
        match self.cells.get(id) {
            Some(cell) if cell.driver.map(|d| d.token) == Some(token) => Progress::Running,
            Some(cell) if cell.completed == Some(token) => Progress::Finished,
            _ => Progress::Interrupted,
        }
    }

    pub(crate) fn is_animating(&self, id: ScalarId) -> bool {
        self.cells
            .get(id)
            .map(|cell| cell.driver.is_some())
            .unwrap_or(false)
    }

    pub(crate) fn has_active(&self) -> bool {
        self.cells.values().any(|cell| cell.driver.is_some())
    }

    pub(crate) fn step(&mut self, dt_ms: f32) {
        for cell in self.cells.values_mut() {
            cell.step(dt_ms);
        }
    }
}

// ============================================================================
// Animated Scalar (user-facing handle)
// ============================================================================

struct ScalarSlot {
    handle: SchedulerHandle,
    id: Option<ScalarId>,
    initial: f32,
}

impl Drop for ScalarSlot {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove_scalar(id);
        }
    }
}

/// Handle to an animatable scalar registered with a scheduler
///
/// # Example
///
/// ```ignore
/// let opacity = AnimatedScalar::new(&handle, 0.0);
/// opacity.timing_to(1.0, TimingConfig::default()).start(&handle);
///
/// // Sampled every frame by the renderer
/// let current = opacity.get();
/// ```
#[derive(Clone)]
pub struct AnimatedScalar {
    slot: Arc<ScalarSlot>,
}

impl AnimatedScalar {
    /// Register a new scalar with the given initial value
    ///
    /// If the scheduler is gone the handle still works but stays at `initial`.
    pub fn new(handle: &SchedulerHandle, initial: f32) -> Self {
        Self {
            slot: Arc::new(ScalarSlot {
                handle: handle.clone(),
                id: handle.create_scalar(initial),
                initial,
            }),
        }
    }

    /// Arena key, or the null key when the scheduler was already dropped
    pub fn id(&self) -> ScalarId {
        self.slot.id.unwrap_or_default()
    }

    /// Current (interpolated) value
    pub fn get(&self) -> f32 {
        self.slot
            .id
            .and_then(|id| self.slot.handle.scalar_value(id))
            .unwrap_or(self.slot.initial)
    }

    /// Jump to `value` without animating, cancelling any driver
    pub fn set_value(&self, value: f32) {
        if let Some(id) = self.slot.id {
            self.slot.handle.set_scalar_value(id, value);
        }
    }

    /// Check if a driver is currently moving this scalar
    pub fn is_animating(&self) -> bool {
        self.slot
            .id
            .map(|id| self.slot.handle.is_scalar_animating(id))
            .unwrap_or(false)
    }

    /// Whether both handles refer to the same cell
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Timing transition from the live value to `target`
    pub fn timing_to(&self, target: f32, config: TimingConfig) -> Animation {
        Animation::Timing {
            scalar: self.id(),
            target,
            config,
        }
    }

    /// Spring transition from the live value to `target`
    pub fn spring_to(&self, target: f32, config: SpringConfig) -> Animation {
        Animation::Spring {
            scalar: self.id(),
            target,
            config,
        }
    }

    /// Instant jump, as a composition step
    pub fn set_to(&self, value: f32) -> Animation {
        Animation::Set {
            scalar: self.id(),
            value,
        }
    }
}

impl std::fmt::Debug for AnimatedScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedScalar")
            .field("id", &self.slot.id)
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;

    #[test]
    fn test_initial_value() {
        let scheduler = AnimationScheduler::new();
        let scalar = AnimatedScalar::new(&scheduler.handle(), 0.8);
        assert_eq!(scalar.get(), 0.8);
        assert!(!scalar.is_animating());
        assert_eq!(scheduler.scalar_count(), 1);
    }

    #[test]
    fn test_last_clone_releases_cell() {
        let scheduler = AnimationScheduler::new();
        let scalar = AnimatedScalar::new(&scheduler.handle(), 0.0);
        let clone = scalar.clone();
        assert!(clone.ptr_eq(&scalar));

        drop(scalar);
        assert_eq!(scheduler.scalar_count(), 1);
        drop(clone);
        assert_eq!(scheduler.scalar_count(), 0);
    }

    #[test]
    fn test_new_driver_replaces_old_from_live_value() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let scalar = AnimatedScalar::new(&handle, 0.0);

        scalar
            .timing_to(100.0, TimingConfig::linear(1000.0))
            .start(&handle);
        scheduler.advance(500.0);
        assert!((scalar.get() - 50.0).abs() < 1e-3);

        // Heading back down starts where the first driver left off
        scalar
            .timing_to(0.0, TimingConfig::linear(1000.0))
            .start(&handle);
        assert!((scalar.get() - 50.0).abs() < 1e-3);
        scheduler.advance(500.0);
        assert!((scalar.get() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_value_cancels_driver() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let scalar = AnimatedScalar::new(&handle, 0.0);

        scalar
            .spring_to(1.0, SpringConfig::worklet())
            .start(&handle);
        assert!(scalar.is_animating());

        scalar.set_value(0.25);
        assert!(!scalar.is_animating());
        scheduler.advance(16.0);
        assert_eq!(scalar.get(), 0.25);
    }

    #[test]
    fn test_long_frame_keeps_spring_stable() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let scalar = AnimatedScalar::new(&handle, 0.8);

        scalar
            .spring_to(1.0, SpringConfig::from_tension_friction(200.0, 8.0))
            .start(&handle);
        scheduler.advance(800.0);
        assert!((scalar.get() - 1.0).abs() < 0.05);

        scheduler.advance(5000.0);
        assert_eq!(scalar.get(), 1.0);
        assert!(!scalar.is_animating());
    }

    #[test]
    fn test_scalar_outlives_scheduler() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };
        let scalar = AnimatedScalar::new(&handle, 3.0);
        scalar.set_value(5.0);
        assert_eq!(scalar.get(), 3.0);
        assert!(!scalar.is_animating());
    }
}
