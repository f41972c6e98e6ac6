//! Per-instance hook state
//!
//! Every mounted component instance owns a set of named slots in the
//! [`HookStore`]. A slot is created the first time a hook asks for it and the
//! same value is handed back on every later call, so scalars stay
//! referentially stable across re-renders. Unmounting an instance drops all
//! of its slots, which releases its scalars and cancels anything a slot owns
//! (such as a pending readiness callback).
//!
//! ```ignore
//! let ctx = MotionContext::new(scheduler.handle(), ScreenMetrics::default());
//! let key = InstanceKey::explicit("onboarding");
//!
//! let scope = ctx.scope(&key);
//! let entrance = use_entrance_animation(&scope, EntranceOptions::default());
//!
//! // Later, when the component goes away
//! ctx.unmount(&key);
//! ```

use crate::config::ScreenMetrics;
use kinetic_animation::{AnimatedScalar, SchedulerHandle};
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Stable identity of a mounted component instance
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey(Arc<str>);

impl InstanceKey {
    /// Create with an explicit key
    ///
    /// Use this for instances created in loops, where call sites repeat.
    pub fn explicit(key: impl Into<String>) -> Self {
        Self(Arc::from(key.into()))
    }

    /// Create from the caller's source location: `{prefix}:{file}:{line}:{col}`
    #[track_caller]
    pub fn from_caller(prefix: &'static str) -> Self {
        let loc = std::panic::Location::caller();
        Self::explicit(format!(
            "{}:{}:{}:{}",
            prefix,
            loc.file(),
            loc.line(),
            loc.column()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceKey({})", self.0)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slot address: instance, slot name and stored type
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SlotKey {
    instance: InstanceKey,
    name: &'static str,
    type_id: TypeId,
}

impl SlotKey {
    fn new<T: 'static>(instance: &InstanceKey, name: &'static str) -> Self {
        Self {
            instance: instance.clone(),
            name,
            type_id: TypeId::of::<T>(),
        }
    }
}

type SlotValue = Box<dyn Any + Send>;

/// Arena of hook slots for every mounted instance
#[derive(Default)]
pub struct HookStore {
    slots: FxHashMap<SlotKey, SlotValue>,
}

impl HookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn get<T: Clone + 'static>(&self, key: &SlotKey) -> Option<T> {
        self.slots
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Insert unless another caller got there first; returns the stored value
    fn get_or_insert<T: Clone + Send + 'static>(&mut self, key: SlotKey, value: T) -> T {
        let stored = self.slots.entry(key).or_insert_with(|| Box::new(value));
        match stored.downcast_ref::<T>() {
            Some(value) => value.clone(),
            // Keys carry the TypeId, so the downcast always matches
            None => unreachable!("hook slot type mismatch"),
        }
    }

    fn remove_instance(&mut self, instance: &InstanceKey) -> Vec<SlotValue> {
        let keys: Vec<SlotKey> = self
            .slots
            .keys()
            .filter(|key| &key.instance == instance)
            .cloned()
            .collect();
        keys.iter()
            .filter_map(|key| self.slots.remove(key))
            .collect()
    }

    fn contains_instance(&self, instance: &InstanceKey) -> bool {
        self.slots.keys().any(|key| &key.instance == instance)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Shared hook state for the application
pub type SharedHookStore = Arc<Mutex<HookStore>>;

/// Everything hooks need: the scheduler, the hook arena and screen metrics
#[derive(Clone)]
pub struct MotionContext {
    handle: SchedulerHandle,
    hooks: SharedHookStore,
    screen: ScreenMetrics,
}

impl MotionContext {
    pub fn new(handle: SchedulerHandle, screen: ScreenMetrics) -> Self {
        Self {
            handle,
            hooks: Arc::new(Mutex::new(HookStore::new())),
            screen,
        }
    }

    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }

    pub fn screen(&self) -> ScreenMetrics {
        self.screen
    }

    fn hooks(&self) -> MutexGuard<'_, HookStore> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hook scope for one render of `instance`
    pub fn scope(&self, instance: &InstanceKey) -> Scope<'_> {
        Scope {
            ctx: self,
            instance: instance.clone(),
        }
    }

    /// Drop every slot of `instance`
    ///
    /// Slot values are dropped after the store lock is released, so their
    /// destructors may call back into the scheduler.
    pub fn unmount(&self, instance: &InstanceKey) {
        let removed = self.hooks().remove_instance(instance);
        tracing::debug!(%instance, slots = removed.len(), "unmounted motion instance");
        drop(removed);
    }

    pub fn is_mounted(&self, instance: &InstanceKey) -> bool {
        self.hooks().contains_instance(instance)
    }

    /// Total number of live slots across all instances
    pub fn slot_count(&self) -> usize {
        self.hooks().len()
    }
}

impl fmt::Debug for MotionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionContext")
            .field("screen", &self.screen)
            .field("slots", &self.slot_count())
            .finish()
    }
}

/// Hook access for a single instance
pub struct Scope<'a> {
    ctx: &'a MotionContext,
    instance: InstanceKey,
}

impl<'a> Scope<'a> {
    pub fn instance(&self) -> &InstanceKey {
        &self.instance
    }

    pub fn handle(&self) -> &SchedulerHandle {
        self.ctx.handle()
    }

    pub fn screen(&self) -> ScreenMetrics {
        self.ctx.screen()
    }

    /// Get the slot `name`, creating it with `init` on first use
    ///
    /// `init` runs without the store lock held.
    pub fn use_slot<T, F>(&self, name: &'static str, init: F) -> T
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> T,
    {
        let key = SlotKey::new::<T>(&self.instance, name);
        if let Some(existing) = self.ctx.hooks().get::<T>(&key) {
            return existing;
        }
        let value = init();
        self.ctx.hooks().get_or_insert(key, value)
    }

    /// Scalar slot with the given initial value
    pub fn use_scalar(&self, name: &'static str, initial: f32) -> AnimatedScalar {
        self.use_slot(name, || AnimatedScalar::new(self.handle(), initial))
    }

    /// Run `effect` the first time this slot is seen for the instance
    ///
    /// Returns true if the effect ran on this call.
    pub fn use_effect_once<F>(&self, name: &'static str, effect: F) -> bool
    where
        F: FnOnce(),
    {
        let key = SlotKey::new::<EffectMarker>(&self.instance, name);
        let first = {
            let mut hooks = self.ctx.hooks();
            if hooks.slots.contains_key(&key) {
                false
            } else {
                hooks.slots.insert(key, Box::new(EffectMarker));
                true
            }
        };
        if first {
            effect();
        }
        first
    }
}

#[derive(Clone, Copy)]
struct EffectMarker;
