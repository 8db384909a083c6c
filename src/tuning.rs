//! Data-driven game balance
//!
//! Every number that shapes how the game feels lives here so it can be
//! tweaked from a JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Per-craft constants, fixed for the lifetime of a craft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftTuning {
    /// Steering added per step while a steer key is held
    pub steer_speed: f32,
    /// Fraction of steering kept each step (spring return, < 1)
    pub steer_return: f32,
    /// Couples forward speed and steering into a turn rate
    pub grip: f32,
    /// Lateral speed kept each step
    pub friction_x: f32,
    /// Vertical speed kept each step (ground craft ignores it)
    pub friction_y: f32,
    /// Forward speed kept each step
    pub friction_z: f32,
    /// Forward acceleration per step
    pub max_acceleration: f32,
    /// Vertical acceleration per step (flight only)
    pub max_flight_acceleration: f32,
}

impl CraftTuning {
    /// Planar craft
    pub fn ground() -> Self {
        Self {
            steer_speed: 3.1,
            steer_return: 0.93,
            grip: 0.45,
            // strong lateral friction, little drift
            friction_x: 0.9,
            friction_y: 1.0,
            friction_z: 0.991,
            max_acceleration: 0.0058,
            max_flight_acceleration: 0.0,
        }
    }

    /// Free-flight craft: faster, with climb/descent
    pub fn flight() -> Self {
        Self {
            max_acceleration: 0.0116,
            max_flight_acceleration: 0.045,
            friction_y: crate::consts::FLY_FRICTION,
            ..Self::ground()
        }
    }

    /// Steering value the spring return converges to while a key is held
    pub fn max_steering(&self) -> f32 {
        self.steer_speed * self.steer_return / (1.0 - self.steer_return)
    }

    fn validate(&self) -> Result<(), String> {
        // steering only springs back when some of it is lost every step
        if !(0.0..1.0).contains(&self.steer_return) {
            return Err(format!("steer_return {} not in [0, 1)", self.steer_return));
        }
        for (name, f) in [
            ("friction_x", self.friction_x),
            ("friction_y", self.friction_y),
            ("friction_z", self.friction_z),
        ] {
            if !(0.0..=1.0).contains(&f) {
                return Err(format!("{name} {f} not in [0, 1]"));
            }
        }
        for (name, v) in [
            ("steer_speed", self.steer_speed),
            ("grip", self.grip),
            ("max_acceleration", self.max_acceleration),
            ("max_flight_acceleration", self.max_flight_acceleration),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} {v} must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

/// Course layout balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseTuning {
    pub num_rings: usize,
    pub num_obstacles: usize,
    /// Outer radius of a ring torus
    pub ring_radius: f32,
    /// Half extent of an obstacle cube
    pub obstacle_half_size: f32,
    /// Outer radius of the final gate
    pub gate_radius: f32,
    /// Half side of the playable floor
    pub floor_size: f32,
    /// Highest altitude a flight-mode checkpoint may be placed at
    pub sky_height: f32,
}

impl CourseTuning {
    fn validate(&self) -> Result<(), String> {
        // a course without rings can never be finished
        if self.num_rings == 0 {
            return Err("num_rings must be at least 1".to_string());
        }
        for (name, v) in [
            ("ring_radius", self.ring_radius),
            ("obstacle_half_size", self.obstacle_half_size),
            ("gate_radius", self.gate_radius),
            ("floor_size", self.floor_size),
            ("sky_height", self.sky_height),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(format!("{name} {v} must be positive"));
            }
        }
        Ok(())
    }
}

impl Default for CourseTuning {
    fn default() -> Self {
        Self {
            num_rings: 8,
            num_obstacles: 10,
            ring_radius: 3.0,
            obstacle_half_size: 1.5,
            gate_radius: 5.0,
            floor_size: 100.0,
            sky_height: 30.0,
        }
    }
}

/// Countdown and scoring balance, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingTuning {
    /// Time budget when a session starts
    pub initial_deadline_ms: f64,
    /// Added to the deadline for every ring in ground mode
    pub ring_bonus_ms: f64,
    /// Added to the deadline for every ring in flight mode
    pub flight_ring_bonus_ms: f64,
    /// Penalty countdown set by an obstacle hit
    pub penalty_ms: f64,
    /// Subtracted from the penalty countdown every physics step
    pub penalty_decrement_ms: f64,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            initial_deadline_ms: 15_000.0,
            ring_bonus_ms: 4_000.0,
            flight_ring_bonus_ms: 6_000.0,
            penalty_ms: 1_500.0,
            penalty_decrement_ms: crate::consts::PHYS_STEP_MS,
        }
    }
}

impl TimingTuning {
    fn validate(&self) -> Result<(), String> {
        if !(self.initial_deadline_ms.is_finite() && self.initial_deadline_ms > 0.0) {
            return Err(format!(
                "initial_deadline_ms {} must be positive",
                self.initial_deadline_ms
            ));
        }
        for (name, v) in [
            ("ring_bonus_ms", self.ring_bonus_ms),
            ("flight_ring_bonus_ms", self.flight_ring_bonus_ms),
            ("penalty_ms", self.penalty_ms),
            ("penalty_decrement_ms", self.penalty_decrement_ms),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} {v} must be finite and non-negative"));
            }
        }
        Ok(())
    }

    pub fn ring_bonus(&self, flight_mode: bool) -> f64 {
        if flight_mode {
            self.flight_ring_bonus_ms
        } else {
            self.ring_bonus_ms
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default = "CraftTuning::ground")]
    pub ground: CraftTuning,
    #[serde(default = "CraftTuning::flight")]
    pub flight: CraftTuning,
    #[serde(default)]
    pub course: CourseTuning,
    #[serde(default)]
    pub timing: TimingTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ground: CraftTuning::ground(),
            flight: CraftTuning::flight(),
            course: CourseTuning::default(),
            timing: TimingTuning::default(),
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults when the file
    /// is missing, malformed or holds values the game can't run with
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Self>(&json) {
                Ok(tuning) => match tuning.validate() {
                    Ok(()) => {
                        log::info!("Loaded tuning from {}", path.display());
                        tuning
                    }
                    Err(e) => {
                        log::warn!("Rejected tuning file {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Malformed tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Check every value against what the simulation can run with
    pub fn validate(&self) -> Result<(), String> {
        self.ground.validate().map_err(|e| format!("ground: {e}"))?;
        self.flight.validate().map_err(|e| format!("flight: {e}"))?;
        self.course.validate().map_err(|e| format!("course: {e}"))?;
        self.timing.validate().map_err(|e| format!("timing: {e}"))
    }

    pub fn craft(&self, flight_mode: bool) -> CraftTuning {
        if flight_mode { self.flight } else { self.ground }
    }
}
