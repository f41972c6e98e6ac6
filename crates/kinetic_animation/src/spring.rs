//! Spring physics animation
//!
//! RK4-integrated damped spring used by `spring` transitions.
//! Configs can be written directly as stiffness/damping (worklet style) or
//! derived from the tension/friction pairs used by native-driver presets.

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target under which the spring may come to rest
    pub rest_displacement: f32,
    /// Speed (units per second) under which the spring may come to rest
    pub rest_speed: f32,
    /// Carried for parity with native-driver presets; integration always
    /// happens on the scheduler
    pub use_native_driver: bool,
}

/// Rest thresholds shared by every preset
const DEFAULT_REST_DISPLACEMENT: f32 = 0.001;
const DEFAULT_REST_SPEED: f32 = 0.001;

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_speed: DEFAULT_REST_SPEED,
            use_native_driver: false,
        }
    }

    /// Build a config from a tension/friction pair
    ///
    /// Uses the origami conversion that tension/friction springs have always
    /// been expressed in, so `tension: 40, friction: 7` feels the same here as
    /// on a native driver.
    pub fn from_tension_friction(tension: f32, friction: f32) -> Self {
        Self::new(
            (tension - 30.0) * 3.62 + 194.0,
            (friction - 8.0) * 3.0 + 25.0,
            1.0,
        )
        .with_native_driver(true)
    }

    /// Default worklet spring (stiffness 100, damping 10)
    pub fn worklet() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }

    /// Override the rest thresholds
    pub fn with_rest_thresholds(mut self, displacement: f32, speed: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_speed = speed;
        self
    }

    pub fn with_native_driver(mut self, use_native_driver: bool) -> Self {
        self.use_native_driver = use_native_driver;
        self
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::worklet()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within the rest thresholds of its target)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_displacement
            && self.velocity.abs() < self.config.rest_speed
    }

    /// Step the spring simulation using RK4 integration
    ///
    /// `dt` is in seconds.
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        // Snap on the frame we come to rest so callers see the exact target
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
