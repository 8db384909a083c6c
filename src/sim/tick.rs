//! Fixed timestep gameplay action
//!
//! Called once per rendered frame while in GAME. Measured frame time feeds the
//! deadline and player clocks directly and is also accumulated into fixed
//! physics steps, so the craft handles the same at any frame rate.

use super::state::{GameSession, Outcome, Phase};
use crate::consts::{MAX_SUBSTEPS, PHYS_STEP_MS};

/// What happened during one call to `action`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Physics steps run this frame
    pub steps: u32,
    pub rings_crossed: usize,
    pub obstacles_hit: usize,
    /// Set on the frame the session ends
    pub outcome: Option<Outcome>,
}

/// Advance the session to `now_ms`
pub fn action(session: &mut GameSession, now_ms: f64) -> TickReport {
    let mut report = TickReport::default();
    if session.phase != Phase::Game || session.outcome.is_some() {
        return report;
    }

    let elapsed = session.timing.advance(now_ms);
    if session.timing.expired() {
        log::info!(
            "Time is up at ring {}/{}",
            session.current_ring(),
            session.total_rings()
        );
        session.outcome = Some(Outcome::Defeat);
        report.outcome = Some(Outcome::Defeat);
        return report;
    }

    session.accumulator_ms += elapsed;
    while session.accumulator_ms >= PHYS_STEP_MS && report.steps < MAX_SUBSTEPS {
        session.accumulator_ms -= PHYS_STEP_MS;
        report.steps += 1;

        if let Some(outcome) = step(session, &mut report) {
            session.outcome = Some(outcome);
            report.outcome = Some(outcome);
            session.accumulator_ms = 0.0;
            return report;
        }
    }

    // Too slow to keep up: drop the backlog instead of spiralling
    if session.accumulator_ms >= PHYS_STEP_MS {
        log::debug!("Dropping {:.1} ms of simulation", session.accumulator_ms);
        session.accumulator_ms = 0.0;
    }

    report
}

/// One physics step: integrate the craft, then test every live checkpoint
pub fn step(session: &mut GameSession, report: &mut TickReport) -> Option<Outcome> {
    session.craft.execute();
    session.timing.decay_penalty();

    let pos = session.craft.position();
    let flight = session.flight_mode;

    for obstacle in &mut session.course.obstacles {
        if obstacle.test_crossing(pos, flight) {
            log::debug!("Obstacle hit at {:?}", obstacle.pos);
            session.timing.apply_penalty();
            report.obstacles_hit += 1;
        }
    }

    if session.final_stage {
        let crossed = session
            .course
            .gate
            .as_mut()
            .is_some_and(|gate| gate.test_crossing(pos, true));
        if crossed {
            log::info!("Final gate crossed");
            return Some(Outcome::Victory);
        }
        return None;
    }

    let crossed = session
        .active_ring_mut()
        .is_some_and(|ring| ring.test_crossing(pos, flight));
    if !crossed {
        return None;
    }

    let bonus = session.timing.award_ring(flight);
    report.rings_crossed += 1;
    let last = session.advance_ring();
    log::info!(
        "Ring {}/{} crossed, +{:.1}s",
        session.current_ring(),
        session.total_rings(),
        bonus / 1000.0
    );

    if last {
        if flight && session.course.gate.is_some() {
            log::info!("All rings cleared, final gate armed");
            session.final_stage = true;
        } else {
            return Some(Outcome::Victory);
        }
    }
    None
}
