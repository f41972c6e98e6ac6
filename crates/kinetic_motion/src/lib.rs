//! Kinetic Motion
//!
//! Reusable motion hooks built on `kinetic_animation`. Each hook owns a
//! handful of scalars stored per instance in a [`MotionContext`], starts its
//! compositions once, and hands back the scalars plus ready-made styles.
//!
//! # Example
//!
//! ```ignore
//! use kinetic_animation::AnimationScheduler;
//! use kinetic_motion::{use_entrance_animation, EntranceOptions, InstanceKey, MotionContext};
//!
//! let scheduler = AnimationScheduler::new();
//! let ctx = MotionContext::new(scheduler.handle(), Default::default());
//! let key = InstanceKey::explicit("onboarding");
//!
//! let entrance = use_entrance_animation(&ctx.scope(&key), EntranceOptions::default());
//! scheduler.advance(16.0);
//! let icon = entrance.icon_style();
//! ```

pub mod bottom_sheet;
pub mod config;
pub mod declarative;
pub mod entrance;
pub mod error;
pub mod gesture;
pub mod readiness;
pub mod splash;
pub mod store;
pub mod style;

pub use bottom_sheet::{use_bottom_sheet, BottomSheet, BottomSheetOptions};
pub use config::{MotionConfig, PresetsConfig, ScreenMetrics};
pub use declarative::{use_declarative_animation, DeclarativeAnimation, SlideFrom};
pub use entrance::{use_entrance_animation, EntranceAnimation, EntranceOptions};
pub use error::{MotionError, Result};
pub use gesture::{
    use_gestures, GestureEvent, GestureOptions, GestureRecognizer, GestureState, Gestures,
    LongPressOptions, PanOptions, PinchOptions, SavedTransform, TapOptions, TouchEvent,
    TouchPhase,
};
pub use readiness::{use_readiness, use_readiness_with, ReadinessConfig, ReadinessFlag};
pub use splash::{use_splash_animation, SplashAnimation, SplashOptions};
pub use store::{HookStore, InstanceKey, MotionContext, Scope, SharedHookStore};
pub use style::{MotionStyle, Sample, Sampled};
