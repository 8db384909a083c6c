//! Demo pilot
//!
//! Steers toward the next checkpoint by holding motions the same way a player
//! would, so its output goes through the regular command queue. Used by the
//! headless binary and by the integration tests.

use glam::Vec3;

use super::craft::{Command, Motion, MotionState};
use super::state::GameSession;
use crate::consts::CROSSING_BOUND_FACTOR;
use crate::{normalize_degrees, to_local_frame};

/// Heading error (degrees) below which the pilot stops steering
const DEAD_ZONE: f32 = 4.0;
/// Distance from the checkpoint plane of the approach/exit points
const APPROACH_LEAD: f32 = 8.0;
/// Flight pilot keeps this far above the target height
const CLIMB_MARGIN: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    held: MotionState,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands that move the held motions to what the pilot wants now.
    /// Only changes are emitted.
    pub fn update(&mut self, session: &GameSession) -> Vec<Command> {
        let desired = self.desired(session);
        let commands = Motion::ALL
            .into_iter()
            .filter(|&m| desired.get(m) != self.held.get(m))
            .map(|m| (m, desired.get(m)))
            .collect();
        self.held = desired;
        commands
    }

    /// Release everything the pilot holds
    pub fn release(&mut self) -> Vec<Command> {
        let commands = Motion::ALL
            .into_iter()
            .filter(|&m| self.held.get(m))
            .map(|m| (m, false))
            .collect();
        self.held = MotionState::default();
        commands
    }

    fn desired(&self, session: &GameSession) -> MotionState {
        let Some(aim) = aim_point(session) else {
            return MotionState::default();
        };

        let craft = &session.craft;
        let pos = craft.position();
        let d = aim - pos;
        // ahead is local -Z, so the heading that points at d is atan2(-x, -z)
        let wanted = (-d.x).atan2(-d.z).to_degrees();
        let error = normalize_degrees(wanted - craft.facing());

        let throttle = if craft.is_flight() {
            pos.y < aim.y + CLIMB_MARGIN
        } else {
            true
        };

        MotionState {
            throttle,
            steer_left: error > DEAD_ZONE,
            steer_right: error < -DEAD_ZONE,
            brake: false,
        }
    }
}

/// Where to head for the current target: a point in front of the checkpoint
/// until lined up with it, then a point behind it.
fn aim_point(session: &GameSession) -> Option<Vec3> {
    let (origin, angle, radius) = if session.final_stage {
        let gate = session.course.gate.as_ref()?;
        (gate.pos, gate.angle, gate.outer_radius)
    } else {
        let ring = session.active_ring()?;
        (ring.pos, ring.angle, ring.outer_radius)
    };

    let pos = session.craft.position();
    let local = to_local_frame(pos, origin, angle);
    let (sin, cos) = angle.to_radians().sin_cos();
    let axis = Vec3::new(sin, 0.0, cos);
    let side = if local.z >= 0.0 { 1.0 } else { -1.0 };

    if local.x.abs() <= CROSSING_BOUND_FACTOR * radius {
        Some(origin - axis * side * APPROACH_LEAD)
    } else {
        Some(origin + axis * side * APPROACH_LEAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::checkpoint::Ring;
    use crate::sim::state::Phase;
    use crate::sim::tick::action;
    use crate::tuning::Tuning;

    fn session_with_ring(ring: Ring) -> GameSession {
        let mut session = GameSession::new(5, false, &Tuning::default());
        session.course.rings = vec![ring];
        session.course.obstacles.clear();
        session.phase = Phase::Game;
        session
    }

    #[test]
    fn test_emits_only_changes() {
        let session = session_with_ring(Ring::new(Vec3::new(0.0, 2.0, -30.0), 0.0, 3.0));
        let mut pilot = Autopilot::new();
        let first = pilot.update(&session);
        assert_eq!(first, vec![(Motion::Throttle, true)]);
        assert!(pilot.update(&session).is_empty());
        assert_eq!(pilot.release(), vec![(Motion::Throttle, false)]);
    }

    #[test]
    fn test_turns_toward_target() {
        // target on the craft's left (+X world is to the right when facing -Z)
        let session = session_with_ring(Ring::new(Vec3::new(-30.0, 2.0, 0.0), 90.0, 3.0));
        let mut pilot = Autopilot::new();
        let commands = pilot.update(&session);
        assert!(commands.contains(&(Motion::SteerLeft, true)));
    }

    #[test]
    fn test_flies_a_ring_behind_the_spawn() {
        let mut session =
            session_with_ring(Ring::new(Vec3::new(20.0, 2.0, 25.0), 30.0, 3.0));
        session.timing.deadline_ms = 60_000.0;
        let mut pilot = Autopilot::new();
        let mut now = 0.0;
        for _ in 0..3_000 {
            for (motion, on) in pilot.update(&session) {
                session.send_command(motion, on, now);
            }
            now += 16.0;
            if action(&mut session, now).outcome.is_some() {
                break;
            }
        }
        assert!(session.course.rings[0].triggered());
    }
}
