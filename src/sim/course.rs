//! Seeded course layout
//!
//! Rings are spread around the spawn point by cycling through the four
//! quadrants of the floor, so consecutive rings force the player to turn.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::checkpoint::{FinalGate, Obstacle, Ring};
use crate::consts::CRAFT_MIN_HEIGHT;
use crate::tuning::CourseTuning;

/// Closest a checkpoint may be placed to the spawn point
pub const MIN_SPAWN_DISTANCE: f32 = 30.0;
/// Margin kept between checkpoints and the edge of the floor
pub const FLOOR_MARGIN: f32 = 20.0;

/// Everything the craft can cross during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub rings: Vec<Ring>,
    pub obstacles: Vec<Obstacle>,
    /// Only present in flight mode
    pub gate: Option<FinalGate>,
}

impl Course {
    /// Lay out a course deterministically from a seed
    pub fn generate(seed: u64, flight_mode: bool, tuning: &CourseTuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let rings = (0..tuning.num_rings)
            .map(|i| {
                let (x, z) = quadrant_coord(&mut rng, (i % 4) as u8, tuning.floor_size);
                let y = checkpoint_height(&mut rng, flight_mode, tuning);
                let angle = rng.random_range(0.0..360.0);
                Ring::new(Vec3::new(x, y, z), angle, tuning.ring_radius)
            })
            .collect();

        let obstacles = (0..tuning.num_obstacles)
            .map(|_| {
                let quadrant = rng.random_range(0..4u8);
                let (x, z) = quadrant_coord(&mut rng, quadrant, tuning.floor_size);
                let y = checkpoint_height(&mut rng, flight_mode, tuning);
                let angle = rng.random_range(0.0..360.0);
                Obstacle::new(Vec3::new(x, y, z), angle, tuning.obstacle_half_size)
            })
            .collect();

        let gate = flight_mode.then(|| {
            let quadrant = rng.random_range(0..4u8);
            let (x, z) = quadrant_coord(&mut rng, quadrant, tuning.floor_size);
            let y = checkpoint_height(&mut rng, true, tuning);
            let angle = rng.random_range(0.0..360.0);
            FinalGate::new(Vec3::new(x, y, z), angle, tuning.gate_radius)
        });

        log::info!(
            "Generated {} course (seed {}): {} rings, {} obstacles",
            if flight_mode { "flight" } else { "ground" },
            seed,
            tuning.num_rings,
            tuning.num_obstacles
        );

        Self {
            rings,
            obstacles,
            gate,
        }
    }

    pub fn total_rings(&self) -> usize {
        self.rings.len()
    }
}

/// Random planar point inside one quadrant of the floor.
///
/// Quadrant `q` covers polar angles `[q * 90, q * 90 + 90]` degrees measured
/// from +X towards +Z.
pub fn quadrant_coord(rng: &mut Pcg32, quadrant: u8, floor_size: f32) -> (f32, f32) {
    let base = f32::from(quadrant % 4) * 90.0;
    let angle = (base + rng.random_range(0.0..=90.0)).to_radians();
    let far = (floor_size - FLOOR_MARGIN).max(MIN_SPAWN_DISTANCE + 1.0);
    let d = rng.random_range(MIN_SPAWN_DISTANCE..far);
    (d * angle.cos(), d * angle.sin())
}

fn checkpoint_height(rng: &mut Pcg32, flight_mode: bool, tuning: &CourseTuning) -> f32 {
    if !flight_mode {
        return CRAFT_MIN_HEIGHT;
    }
    let low = CRAFT_MIN_HEIGHT + 1.0;
    let high = tuning.sky_height.max(low + 1.0);
    rng.random_range(low..high)
}
