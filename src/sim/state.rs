//! Session state and core simulation types
//!
//! Everything that is thrown away on restart lives in `GameSession`.

use serde::{Deserialize, Serialize};

use super::checkpoint::Ring;
use super::course::Course;
use super::craft::{Craft, Motion};
use super::timing::Timing;
use crate::tuning::Tuning;

/// Top-level screen the game is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, waiting for RETURN
    Splash,
    /// Settings menu over a frozen game
    Menu,
    /// Active gameplay
    Game,
    /// Victory or defeat screen
    End,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Splash, Phase::Menu, Phase::Game, Phase::End];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Splash => "SPLASH",
            Phase::Menu => "MENU",
            Phase::Game => "GAME",
            Phase::End => "END",
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_victory(&self) -> bool {
        matches!(self, Outcome::Victory)
    }
}

/// One run through a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: Phase,
    /// Course seed for this session
    pub seed: u64,
    pub flight_mode: bool,
    pub craft: Craft,
    pub course: Course,
    pub timing: Timing,
    /// Index of the first ring not yet crossed
    current_ring: usize,
    /// All rings cleared, the final gate is the only target
    pub final_stage: bool,
    pub outcome: Option<Outcome>,
    /// Unsimulated time carried to the next frame
    pub accumulator_ms: f64,
}

impl GameSession {
    pub fn new(seed: u64, flight_mode: bool, tuning: &Tuning) -> Self {
        Self {
            phase: Phase::Splash,
            seed,
            flight_mode,
            craft: Craft::new(flight_mode, tuning.craft(flight_mode)),
            course: Course::generate(seed, flight_mode, &tuning.course),
            timing: Timing::new(tuning.timing),
            current_ring: 0,
            final_stage: false,
            outcome: None,
            accumulator_ms: 0.0,
        }
    }

    pub fn current_ring(&self) -> usize {
        self.current_ring
    }

    pub fn total_rings(&self) -> usize {
        self.course.total_rings()
    }

    /// The ring the craft must cross next, if any
    pub fn active_ring(&self) -> Option<&Ring> {
        if self.final_stage {
            return None;
        }
        self.course.rings.get(self.current_ring)
    }

    pub fn active_ring_mut(&mut self) -> Option<&mut Ring> {
        if self.final_stage {
            return None;
        }
        self.course.rings.get_mut(self.current_ring)
    }

    /// Move on to the next ring. Returns true if that was the last one.
    pub fn advance_ring(&mut self) -> bool {
        let total = self.total_rings();
        debug_assert!(
            self.current_ring < total,
            "ring index advanced past the end of the course"
        );
        self.current_ring = (self.current_ring + 1).min(total);
        self.current_ring == total
    }

    /// Crossed rings plus the active one
    pub fn visible_rings(&self) -> &[Ring] {
        let end = (self.current_ring + 1).min(self.total_rings());
        &self.course.rings[..end]
    }

    /// Queue a craft command; the first one starts the clock
    pub fn send_command(&mut self, motion: Motion, on: bool, now_ms: f64) {
        self.craft.send_command(motion, on);
        self.timing.start(now_ms);
    }

    pub fn started(&self) -> bool {
        self.timing.started()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(3, false, &Tuning::default())
    }

    #[test]
    fn test_new_session() {
        let s = session();
        assert_eq!(s.phase, Phase::Splash);
        assert_eq!(s.current_ring(), 0);
        assert!(!s.started());
        assert!(s.outcome.is_none());
        assert_eq!(s.visible_rings().len(), 1);
    }

    #[test]
    fn test_advance_ring_reports_last() {
        let mut s = session();
        let total = s.total_rings();
        for i in 1..total {
            assert!(!s.advance_ring());
            assert_eq!(s.current_ring(), i);
            assert_eq!(s.visible_rings().len(), i + 1);
        }
        assert!(s.advance_ring());
        assert!(s.active_ring().is_none());
        assert_eq!(s.visible_rings().len(), total);
    }

    #[test]
    fn test_first_command_starts_clock() {
        let mut s = session();
        s.send_command(Motion::Throttle, true, 500.0);
        assert!(s.started());
        assert_eq!(s.craft.pending_commands(), 1);
    }

    #[test]
    fn test_final_stage_hides_active_ring() {
        let mut s = GameSession::new(3, true, &Tuning::default());
        assert!(s.active_ring().is_some());
        s.final_stage = true;
        assert!(s.active_ring_mut().is_none());
    }
}
