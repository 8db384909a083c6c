//! Flappy Ship - an arcade flight game through ring checkpoints
//!
//! Core modules:
//! - `sim`: Gameplay simulation (craft kinematics, crossings, timing)
//! - `game`: Phase state machine and per-phase input dispatch
//! - `input`: Abstract key and mouse events
//! - `camera`: Camera modes and free-look control
//! - `render`: Interface to the external renderer
//! - `ranking`: Persisted leaderboard of winning times
//! - `settings`: Player toggles
//! - `tuning`: Data-driven game balance

pub mod camera;
pub mod game;
pub mod input;
pub mod ranking;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, GameContext};
pub use ranking::Ranking;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Length of one physics step in milliseconds
    pub const PHYS_STEP_MS: f64 = 10.0;
    /// Maximum physics steps per frame; leftover time is dropped
    pub const MAX_SUBSTEPS: u32 = 10;

    /// Craft spawn height, also the lowest height a flying craft may reach
    pub const CRAFT_MIN_HEIGHT: f32 = 2.0;
    /// Forward speed above which a decelerating craft is snapped to rest
    /// (forward is negative local Z, so positive speed means reversing)
    pub const REVERSE_SNAP_SPEED: f32 = 0.05;

    /// Vertical air friction for the flight variant
    pub const FLY_FRICTION: f32 = 0.98;
    /// Gravity applied to vertical speed every flight step
    pub const GRAVITY: f32 = 0.033;

    /// Crossing test accepts lateral offsets up to this many outer radii
    pub const CROSSING_BOUND_FACTOR: f32 = 2.0;

    /// Number of ranking entries shown to the player
    pub const RANKING_DISPLAY: usize = 5;

    /// Flicker half-period while a penalty is running
    pub const FLICKER_PERIOD_MS: f64 = 100.0;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Express a world point in the frame of an object at `origin` rotated by
/// `yaw_deg` around the vertical axis.
///
/// The object's "through" axis is its local Z. This is the inverse of the yaw
/// the renderer applies when drawing the object.
#[inline]
pub fn to_local_frame(point: Vec3, origin: Vec3, yaw_deg: f32) -> Vec3 {
    world_to_ship(point - origin, yaw_deg)
}

/// Rotate a world vector into the frame of a ship facing `facing_deg`.
/// Y is left untouched.
#[inline]
pub fn world_to_ship(v: Vec3, facing_deg: f32) -> Vec3 {
    let (sin, cos) = facing_deg.to_radians().sin_cos();
    Vec3::new(cos * v.x - sin * v.z, v.y, sin * v.x + cos * v.z)
}

/// Inverse of [`world_to_ship`]
#[inline]
pub fn ship_to_world(v: Vec3, facing_deg: f32) -> Vec3 {
    let (sin, cos) = facing_deg.to_radians().sin_cos();
    Vec3::new(cos * v.x + sin * v.z, v.y, -sin * v.x + cos * v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_local_frame_identity_yaw() {
        let local = to_local_frame(Vec3::new(1.0, 3.0, -5.0), Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!((local - Vec3::new(1.0, 2.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_local_frame_quarter_turn() {
        // A point on the world +X axis seen from an object yawed 90 degrees
        // lies on the object's local +Z axis.
        let local = to_local_frame(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, 90.0);
        assert!(local.x.abs() < 1e-5);
        assert!((local.z - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ship_to_world() {
        let v = ship_to_world(Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);

        // forward speed of a ship turned 90 degrees runs along world -X
        let v = ship_to_world(Vec3::new(0.0, 0.5, -2.0), 90.0);
        assert!((v - Vec3::new(-2.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_ship_frame_round_trip() {
        let v = Vec3::new(0.3, -1.0, -2.5);
        for facing in [0.0, 33.0, 90.0, -170.0] {
            let back = ship_to_world(world_to_ship(v, facing), facing);
            assert!((back - v).length() < 1e-5, "facing {facing}");
        }
    }
}
