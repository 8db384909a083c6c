//! Course checkpoints: rings, obstacles and the final gate
//!
//! Positions are fixed once the course is laid out; only the crossing probe
//! (and the ring's triggered latch) change during a session.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{CrossingFrame, CrossingProbe};

/// A ring the craft must fly through, in course order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub pos: Vec3,
    /// Yaw of the disc plane in degrees
    pub angle: f32,
    pub outer_radius: f32,
    triggered: bool,
    probe: CrossingProbe,
}

impl Ring {
    pub fn new(pos: Vec3, angle: f32, outer_radius: f32) -> Self {
        Self {
            pos,
            angle,
            outer_radius,
            triggered: false,
            probe: CrossingProbe::new(),
        }
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    fn frame(&self, check_height: bool) -> CrossingFrame {
        CrossingFrame {
            origin: self.pos,
            angle: self.angle,
            outer_radius: self.outer_radius,
            check_height,
        }
    }

    /// Returns true exactly once: on the step the craft passes through.
    /// A triggered ring stays triggered and never reports again.
    pub fn test_crossing(&mut self, craft: Vec3, check_height: bool) -> bool {
        if self.triggered {
            return false;
        }
        let frame = self.frame(check_height);
        if self.probe.sample(craft, &frame) {
            self.triggered = true;
            log::debug!("Ring at {:?} triggered", self.pos);
            true
        } else {
            false
        }
    }
}

/// A hazard cube. Passing through it costs a penalty every time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec3,
    pub angle: f32,
    pub half_size: f32,
    probe: CrossingProbe,
}

impl Obstacle {
    pub fn new(pos: Vec3, angle: f32, half_size: f32) -> Self {
        Self {
            pos,
            angle,
            half_size,
            probe: CrossingProbe::new(),
        }
    }

    pub fn test_crossing(&mut self, craft: Vec3, check_height: bool) -> bool {
        let frame = CrossingFrame {
            origin: self.pos,
            angle: self.angle,
            outer_radius: self.half_size,
            check_height,
        };
        self.probe.sample(craft, &frame)
    }
}

/// End-of-course gate, armed once every ring is cleared in flight mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalGate {
    pub pos: Vec3,
    pub angle: f32,
    pub outer_radius: f32,
    probe: CrossingProbe,
}

impl FinalGate {
    pub fn new(pos: Vec3, angle: f32, outer_radius: f32) -> Self {
        Self {
            pos,
            angle,
            outer_radius,
            probe: CrossingProbe::new(),
        }
    }

    pub fn test_crossing(&mut self, craft: Vec3, check_height: bool) -> bool {
        let frame = CrossingFrame {
            origin: self.pos,
            angle: self.angle,
            outer_radius: self.outer_radius,
            check_height,
        };
        self.probe.sample(craft, &frame)
    }
}
