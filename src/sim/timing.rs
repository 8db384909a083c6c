//! Countdown, player clock and obstacle penalty
//!
//! All times are milliseconds on the caller's clock. Nothing advances until the
//! first craft command latches the session as started.

use serde::{Deserialize, Serialize};

use crate::consts::FLICKER_PERIOD_MS;
use crate::tuning::TimingTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    /// Remaining budget; may go negative, which means the session is lost
    pub deadline_ms: f64,
    /// Time spent playing, recorded in the ranking on victory
    pub player_ms: f64,
    /// Flicker countdown after an obstacle hit
    pub penalty_ms: f64,
    /// Clock reading at the last advance; `None` until the game starts
    last_ms: Option<f64>,
    tuning: TimingTuning,
}

impl Timing {
    pub fn new(tuning: TimingTuning) -> Self {
        Self {
            deadline_ms: tuning.initial_deadline_ms,
            player_ms: 0.0,
            penalty_ms: 0.0,
            last_ms: None,
            tuning,
        }
    }

    pub fn started(&self) -> bool {
        self.last_ms.is_some()
    }

    /// Latch the session as started. Later calls are ignored.
    pub fn start(&mut self, now_ms: f64) {
        if self.last_ms.is_none() {
            log::info!("Clock started");
            self.last_ms = Some(now_ms);
        }
    }

    /// Restart the elapsed-time reference after a pause, so time spent in the
    /// menu is not charged to the deadline
    pub fn resume(&mut self, now_ms: f64) {
        if self.last_ms.is_some() {
            self.last_ms = Some(now_ms);
        }
    }

    /// Charge the time since the last call to both clocks.
    ///
    /// Returns the elapsed milliseconds (0 before the game starts).
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let Some(last) = self.last_ms else {
            return 0.0;
        };
        let elapsed = (now_ms - last).max(0.0);
        self.deadline_ms -= elapsed;
        self.player_ms += elapsed;
        // a clock stepping backwards must not get charged twice
        self.last_ms = Some(now_ms.max(last));
        elapsed
    }

    pub fn expired(&self) -> bool {
        self.deadline_ms < 0.0
    }

    pub fn award_ring(&mut self, flight_mode: bool) -> f64 {
        let bonus = self.tuning.ring_bonus(flight_mode);
        self.deadline_ms += bonus;
        bonus
    }

    pub fn apply_penalty(&mut self) {
        self.penalty_ms = self.tuning.penalty_ms;
    }

    /// Called once per physics step
    pub fn decay_penalty(&mut self) {
        self.penalty_ms = (self.penalty_ms - self.tuning.penalty_decrement_ms).max(0.0);
    }

    /// Whether the craft should be drawn in its hit state this frame
    pub fn flicker(&self) -> bool {
        if self.penalty_ms <= 0.0 {
            return false;
        }
        ((self.penalty_ms / FLICKER_PERIOD_MS) as u64) % 2 == 0
    }

    pub fn remaining_seconds(&self) -> f64 {
        self.deadline_ms / 1000.0
    }

    pub fn player_seconds(&self) -> f64 {
        self.player_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> Timing {
        Timing::new(TimingTuning::default())
    }

    #[test]
    fn test_nothing_moves_before_start() {
        let mut t = timing();
        assert_eq!(t.advance(5_000.0), 0.0);
        assert_eq!(t.deadline_ms, TimingTuning::default().initial_deadline_ms);
        assert_eq!(t.player_ms, 0.0);
        assert!(!t.started());
    }

    #[test]
    fn test_deadline_runs_out() {
        let mut t = timing();
        t.start(1_000.0);
        t.deadline_ms = 150.0;
        t.advance(1_200.0);
        assert_eq!(t.deadline_ms, -50.0);
        assert_eq!(t.player_ms, 200.0);
        assert!(t.expired());
    }

    #[test]
    fn test_backwards_clock_is_not_charged_twice() {
        let mut t = timing();
        t.start(1_000.0);
        assert_eq!(t.advance(1_100.0), 100.0);
        assert_eq!(t.advance(900.0), 0.0);
        assert_eq!(t.advance(1_150.0), 50.0);
        assert_eq!(t.player_ms, 150.0);
        assert_eq!(t.deadline_ms, TimingTuning::default().initial_deadline_ms - 150.0);
    }

    #[test]
    fn test_start_latches_once() {
        let mut t = timing();
        t.start(100.0);
        t.start(900.0);
        assert_eq!(t.advance(200.0), 100.0);
    }

    #[test]
    fn test_resume_skips_paused_time() {
        let mut t = timing();
        t.start(0.0);
        t.advance(1_000.0);
        let before = t.deadline_ms;
        // ten seconds in the menu
        t.resume(11_000.0);
        t.advance(11_010.0);
        assert_eq!(t.deadline_ms, before - 10.0);
    }

    #[test]
    fn test_ring_bonus_is_exact() {
        let mut t = timing();
        let before = t.deadline_ms;
        let bonus = t.award_ring(false);
        assert_eq!(t.deadline_ms, before + bonus);
        assert_eq!(bonus, TimingTuning::default().ring_bonus_ms);
    }

    #[test]
    fn test_penalty_decays_to_zero() {
        let mut t = timing();
        t.apply_penalty();
        assert_eq!(t.penalty_ms, TimingTuning::default().penalty_ms);
        let steps = (t.penalty_ms / TimingTuning::default().penalty_decrement_ms) as usize;
        for _ in 0..steps + 5 {
            t.decay_penalty();
        }
        assert_eq!(t.penalty_ms, 0.0);
        assert!(!t.flicker());
    }

    #[test]
    fn test_flicker_alternates() {
        let mut t = timing();
        t.penalty_ms = 1_050.0;
        let a = t.flicker();
        t.penalty_ms = 950.0;
        assert_ne!(a, t.flicker());
    }
}
