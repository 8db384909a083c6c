//! Craft kinematics
//!
//! The craft is steered through four latched motions (throttle, steer left,
//! steer right, brake). Input handling enqueues `(Motion, on/off)` commands;
//! every physics step drains the queue, then integrates steering, velocity and
//! position with constant per-step increments.
//!
//! Velocity is kept in world space. Each step projects it into the ship frame
//! using the facing from before the step, applies thrust and per-axis friction
//! there, then rotates it back with that same angle. A turning craft therefore
//! carries some sideways speed into the next step, which lateral friction
//! damps.
//!
//! Two variants share the same planar model:
//! - `Ground`: motion constrained to the plane at spawn height
//! - `Flight`: throttle/brake also climb/descend against gravity

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{CRAFT_MIN_HEIGHT, GRAVITY, REVERSE_SNAP_SPEED};
use crate::tuning::CraftTuning;
use crate::{ship_to_world, world_to_ship};

/// Motions the craft can be commanded to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    Throttle,
    SteerLeft,
    SteerRight,
    Brake,
}

impl Motion {
    pub const ALL: [Motion; 4] = [
        Motion::Throttle,
        Motion::SteerLeft,
        Motion::SteerRight,
        Motion::Brake,
    ];

    /// Map a raw input code to a motion
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Motion::Throttle => "THROTTLE",
            Motion::SteerLeft => "LEFT STEERING",
            Motion::SteerRight => "RIGHT STEERING",
            Motion::Brake => "BRAKE",
        }
    }
}

/// A queued on/off request for one motion
pub type Command = (Motion, bool);

/// Which motions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionState {
    pub throttle: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub brake: bool,
}

impl MotionState {
    pub fn get(&self, motion: Motion) -> bool {
        match motion {
            Motion::Throttle => self.throttle,
            Motion::SteerLeft => self.steer_left,
            Motion::SteerRight => self.steer_right,
            Motion::Brake => self.brake,
        }
    }

    pub fn set(&mut self, motion: Motion, on: bool) {
        match motion {
            Motion::Throttle => self.throttle = on,
            Motion::SteerLeft => self.steer_left = on,
            Motion::SteerRight => self.steer_right = on,
            Motion::Brake => self.brake = on,
        }
    }

    /// +1 when only throttle is held, -1 when only brake is held
    fn thrust(&self) -> Option<f32> {
        match (self.throttle, self.brake) {
            (true, false) => Some(1.0),
            (false, true) => Some(-1.0),
            _ => None,
        }
    }

    /// +1 when only left is held, -1 when only right is held
    fn steer(&self) -> Option<f32> {
        match (self.steer_left, self.steer_right) {
            (true, false) => Some(1.0),
            (false, true) => Some(-1.0),
            _ => None,
        }
    }
}

/// Variant-specific craft state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CraftKind {
    Ground,
    Flight {
        /// Nose pitch, spring-returning like steering (visual only)
        steer_flight: f32,
    },
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Craft {
    pos: Vec3,
    /// Heading in degrees around the vertical axis
    facing: f32,
    /// Spring-return control deflection
    steering: f32,
    /// World-frame velocity, applied to the position once per step
    velocity: Vec3,
    kind: CraftKind,
    tuning: CraftTuning,
    held: MotionState,
    #[serde(skip)]
    commands: VecDeque<Command>,
}

impl Craft {
    pub fn ground(tuning: CraftTuning) -> Self {
        Self::with_kind(CraftKind::Ground, tuning)
    }

    pub fn flight(tuning: CraftTuning) -> Self {
        Self::with_kind(CraftKind::Flight { steer_flight: 0.0 }, tuning)
    }

    pub fn new(flight_mode: bool, tuning: CraftTuning) -> Self {
        if flight_mode {
            Self::flight(tuning)
        } else {
            Self::ground(tuning)
        }
    }

    fn with_kind(kind: CraftKind, tuning: CraftTuning) -> Self {
        Self {
            pos: Vec3::new(0.0, CRAFT_MIN_HEIGHT, 0.0),
            facing: 0.0,
            steering: 0.0,
            velocity: Vec3::ZERO,
            kind,
            tuning,
            held: MotionState::default(),
            commands: VecDeque::new(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn steering(&self) -> f32 {
        self.steering
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity in the ship frame: x lateral, y vertical, z forward
    /// (negative = ahead)
    pub fn local_velocity(&self) -> Vec3 {
        world_to_ship(self.velocity, self.facing)
    }

    /// Forward speed along ship-local Z
    pub fn forward_speed(&self) -> f32 {
        self.local_velocity().z
    }

    /// Sideways speed along ship-local X
    pub fn lateral_speed(&self) -> f32 {
        self.local_velocity().x
    }

    pub fn steer_flight(&self) -> f32 {
        match self.kind {
            CraftKind::Flight { steer_flight } => steer_flight,
            CraftKind::Ground => 0.0,
        }
    }

    pub fn kind(&self) -> CraftKind {
        self.kind
    }

    pub fn is_flight(&self) -> bool {
        matches!(self.kind, CraftKind::Flight { .. })
    }

    pub fn tuning(&self) -> &CraftTuning {
        &self.tuning
    }

    pub fn is_held(&self, motion: Motion) -> bool {
        self.held.get(motion)
    }

    pub fn held(&self) -> MotionState {
        self.held
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Queue a command for the next physics step
    pub fn send_command(&mut self, motion: Motion, on: bool) {
        self.commands.push_back((motion, on));
    }

    /// Queue a command from a raw motion code.
    ///
    /// # Panics
    /// An unknown code means the input layer is broken; this aborts.
    pub fn send_raw_command(&mut self, code: u8, on: bool) {
        match Motion::from_code(code) {
            Some(motion) => self.send_command(motion, on),
            None => panic!("unrecognized motion code {code}"),
        }
    }

    /// Advance the craft by one physics step
    pub fn execute(&mut self) {
        self.process_commands();
        let mut local = self.local_velocity();
        if self.compute_physics(&mut local) {
            self.update_position(local);
        }
    }

    fn process_commands(&mut self) {
        while let Some((motion, on)) = self.commands.pop_front() {
            log::debug!("Craft command {} {}", motion.as_str(), if on { "on" } else { "off" });
            self.held.set(motion, on);
        }
    }

    /// Returns true if anything moved and the position needs integrating
    fn compute_physics(&mut self, local: &mut Vec3) -> bool {
        let steering = self.update_steering();
        let velocity = match self.kind {
            CraftKind::Ground => self.update_ground_velocity(local),
            CraftKind::Flight { .. } => {
                let pitch = self.update_steer_flight(local.z);
                let velocity = self.update_flight_velocity(local);
                pitch || velocity
            }
        };
        steering || velocity
    }

    fn update_steering(&mut self) -> bool {
        if self.steering == 0.0 && !self.held.steer_left && !self.held.steer_right {
            return false;
        }

        if let Some(sign) = self.held.steer() {
            self.steering += sign * self.tuning.steer_speed;
        }
        self.steering *= self.tuning.steer_return;
        true
    }

    fn update_ground_velocity(&self, local: &mut Vec3) -> bool {
        let thrust_keys = self.held.throttle || self.held.brake;
        if local.x == 0.0 && local.z == 0.0 && !thrust_keys {
            return false;
        }

        if let Some(sign) = self.held.thrust() {
            // ahead is negative Z
            local.z -= sign * self.tuning.max_acceleration;
            snap_reverse(local);
        }

        local.x *= self.tuning.friction_x;
        local.z *= self.tuning.friction_z;
        true
    }

    fn update_flight_velocity(&self, local: &mut Vec3) -> bool {
        let thrust_keys = self.held.throttle || self.held.brake;
        let resting = local.x == 0.0
            && local.z == 0.0
            && local.y == 0.0
            && self.pos.y <= CRAFT_MIN_HEIGHT;
        if resting && !thrust_keys {
            return false;
        }

        if let Some(sign) = self.held.thrust() {
            local.y += sign * self.tuning.max_flight_acceleration;
            local.z -= sign * self.tuning.max_acceleration;
            snap_reverse(local);
        }

        local.x *= self.tuning.friction_x;
        local.z *= self.tuning.friction_z;

        local.y *= self.tuning.friction_y;
        local.y -= GRAVITY;
        true
    }

    fn update_steer_flight(&mut self, forward: f32) -> bool {
        let CraftKind::Flight { mut steer_flight } = self.kind else {
            return false;
        };
        let thrust_keys = self.held.throttle || self.held.brake;
        if steer_flight == 0.0 && forward == 0.0 && !thrust_keys {
            return false;
        }

        if let Some(sign) = self.held.thrust() {
            steer_flight += sign * self.tuning.steer_speed;
        }
        steer_flight *= self.tuning.steer_return;
        self.kind = CraftKind::Flight { steer_flight };
        true
    }

    /// Rotate the ship-frame velocity back with the facing it was projected
    /// with, move, then turn
    fn update_position(&mut self, local: Vec3) {
        self.velocity = ship_to_world(local, self.facing);
        self.pos.x += self.velocity.x;
        self.pos.z += self.velocity.z;

        if self.is_flight() {
            self.pos.y += self.velocity.y;
            // can't get under the floor
            if self.pos.y < CRAFT_MIN_HEIGHT {
                self.pos.y = CRAFT_MIN_HEIGHT;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }

        // faster craft turn sharper for the same deflection
        self.facing -= local.z * self.tuning.grip * self.steering;
    }
}

/// Crafts don't fly backwards
fn snap_reverse(local: &mut Vec3) {
    if local.z > REVERSE_SNAP_SPEED {
        local.z = 0.0;
    }
}
