//! Fixed-duration timing animation

use crate::easing::Easing;

/// Parameters of a timing transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingConfig {
    /// Duration in milliseconds
    pub duration_ms: f32,
    pub easing: Easing,
    /// Carried for parity with native-driver presets; interpolation always
    /// happens on the scheduler
    pub use_native_driver: bool,
}

impl TimingConfig {
    pub fn new(duration_ms: f32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
            use_native_driver: true,
        }
    }

    pub fn linear(duration_ms: f32) -> Self {
        Self::new(duration_ms, Easing::Linear)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(300.0, Easing::EaseInOut)
    }
}

/// Interpolates from a start value to a target over `duration_ms`
///
/// A non-positive duration completes on the first step, landing on the target.
#[derive(Clone, Copy, Debug)]
pub struct Timing {
    from: f32,
    to: f32,
    config: TimingConfig,
    elapsed_ms: f32,
}

impl Timing {
    pub fn new(from: f32, to: f32, config: TimingConfig) -> Self {
        Self {
            from,
            to,
            config,
            elapsed_ms: 0.0,
        }
    }

    /// Progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.config.duration_ms <= 0.0 {
            return if self.elapsed_ms > 0.0 { 1.0 } else { 0.0 };
        }
        (self.elapsed_ms / self.config.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> f32 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.config.easing.apply(progress)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advance by `dt_ms` milliseconds
    pub fn step(&mut self, dt_ms: f32) {
        // Zero-length frames still count as a step so instant timings finish
        self.elapsed_ms += dt_ms.max(f32::MIN_POSITIVE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_timing() {
        let mut timing = Timing::new(0.0, 100.0, TimingConfig::linear(1000.0));
        assert_eq!(timing.value(), 0.0);

        timing.step(500.0);
        assert!((timing.value() - 50.0).abs() < 1e-4);
        assert!(!timing.is_finished());

        timing.step(500.0);
        assert_eq!(timing.value(), 100.0);
        assert!(timing.is_finished());
    }

    #[test]
    fn test_overshooting_step_lands_on_target() {
        let mut timing = Timing::new(1.0, 0.0, TimingConfig::default());
        timing.step(10_000.0);
        assert_eq!(timing.value(), 0.0);
    }

    #[test]
    fn test_non_positive_duration_finishes_on_first_step() {
        for duration in [0.0, -250.0] {
            let mut timing = Timing::new(0.0, 1.0, TimingConfig::linear(duration));
            assert!(!timing.is_finished());
            timing.step(16.0);
            assert!(timing.is_finished());
            assert_eq!(timing.value(), 1.0);
        }
    }
}
