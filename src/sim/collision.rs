//! Crossing detection for rotated checkpoints
//!
//! A checkpoint is "passed through" when the craft's coordinate along the
//! checkpoint's local Z axis changes sign between two consecutive samples while
//! the craft is laterally close enough to the checkpoint center. This avoids an
//! exact torus/cube intersection test while still catching fast crafts that jump
//! across the plane in one step.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::CROSSING_BOUND_FACTOR;
use crate::to_local_frame;

/// Geometry the detector needs from a checkpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingFrame {
    pub origin: Vec3,
    /// Yaw in degrees
    pub angle: f32,
    pub outer_radius: f32,
    /// Also bound the vertical offset (flight mode)
    pub check_height: bool,
}

impl CrossingFrame {
    /// Half extent of the acceptance window around the checkpoint center
    #[inline]
    pub fn bound(&self) -> f32 {
        CROSSING_BOUND_FACTOR * self.outer_radius
    }

    /// Whether a local-frame point lies inside the acceptance window
    pub fn within_bounds(&self, local: Vec3) -> bool {
        let bound = self.bound();
        if local.x.abs() > bound {
            return false;
        }
        !(self.check_height && local.y.abs() > bound)
    }
}

/// Per-checkpoint memory of the last local Z sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossingProbe {
    /// `None` until the first sample: the first call can never trigger
    prev_z: Option<f32>,
}

impl CrossingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_sample(&self) -> bool {
        self.prev_z.is_some()
    }

    pub fn previous_z(&self) -> Option<f32> {
        self.prev_z
    }

    /// Forget the previous sample
    pub fn reset(&mut self) {
        self.prev_z = None;
    }

    /// Sample the craft position and report whether it crossed the plane.
    ///
    /// The previous sample is always updated, even out of bounds, so a craft
    /// that circles around a checkpoint and then enters the window does not
    /// register a stale crossing.
    pub fn sample(&mut self, craft: Vec3, frame: &CrossingFrame) -> bool {
        let local = to_local_frame(craft, frame.origin, frame.angle);
        let Some(prev) = self.prev_z.replace(local.z) else {
            return false;
        };
        frame.within_bounds(local) && sign_flipped(prev, local.z)
    }
}

/// `old >= 0 && new < 0` or the reverse
#[inline]
pub fn sign_flipped(old: f32, new: f32) -> bool {
    (old >= 0.0) != (new >= 0.0)
}
