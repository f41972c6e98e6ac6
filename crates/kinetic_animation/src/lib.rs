//! Kinetic Animation Engine
//!
//! Timing and spring drivers over scheduler-owned scalars, composed into
//! sequence / parallel trees and advanced once per frame.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs, configured directly or via
//!   tension/friction
//! - **Timing**: fixed-duration interpolation with easing curves
//! - **Compositions**: sequence, parallel, delay, set and loop nodes
//! - **Cancel-and-replace**: a new driver on a scalar takes over from the
//!   live value
//! - **Presets**: the fast / normal / slow and gentle / bouncy / stiff table
//! - **Deterministic frames**: `advance(dt_ms)` next to wall-clock `tick()`

pub mod composition;
pub mod easing;
pub mod presets;
pub mod scalar;
pub mod scheduler;
pub mod spring;
pub mod timing;

pub use composition::Animation;
pub use easing::Easing;
pub use presets::{
    create_spring_animation, create_timing_animation, resolve_spring, resolve_timing,
    PresetError, SpringOverride, SpringPreset, SpringPresetName, TimingOverride, TimingPreset,
    TimingPresetName,
};
pub use scalar::AnimatedScalar;
pub use scheduler::{
    AnimationScheduler, CompletionCallback, CompositionId, FrameInfo, ScalarId, SchedulerHandle,
    TickCallback, TickCallbackId,
};
pub use spring::{Spring, SpringConfig};
pub use timing::{Timing, TimingConfig};
