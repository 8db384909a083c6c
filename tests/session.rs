use flappy_ship::input::{InputEvent, Key};
use flappy_ship::sim::{Autopilot, Outcome, Phase};
use flappy_ship::{Game, GameContext, Ranking, Tuning};

const FRAME_MS: f64 = 16.0;

fn context(dir: &tempfile::TempDir, seed: u64, flight: bool) -> GameContext {
    let mut ctx = GameContext::new("pilot", seed);
    ctx.ranking_path = dir.path().join("ranking.txt");
    ctx.settings.flight_mode = flight;
    ctx
}

fn press(game: &mut Game, key: Key, now: f64) {
    game.dispatch(InputEvent::KeyDown(key), now);
}

/// Fly a full session with the demo pilot, checking invariants every frame.
/// Returns the final clock reading.
fn fly(game: &mut Game, max_frames: usize) -> f64 {
    let tuning = Tuning::default();
    let bonus = tuning.timing.ring_bonus(game.session().flight_mode);
    let mut pilot = Autopilot::new();
    let mut now = 0.0;
    press(game, Key::Return, now);

    for _ in 0..max_frames {
        now += FRAME_MS;
        // the clock only runs from the frame after the first command
        let was_started = game.session().started();
        let ring_before = game.session().current_ring();
        let deadline_before = game.session().timing.deadline_ms;

        for (motion, on) in pilot.update(game.session()) {
            let key = Key::for_motion(motion);
            let event = if on { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) };
            game.dispatch(event, now);
        }

        let report = game.action(now);
        let session = game.session();

        assert!(session.current_ring() >= ring_before, "ring index went backwards");
        assert!(session.current_ring() <= session.total_rings());
        assert_eq!(session.current_ring() - ring_before, report.rings_crossed);

        let triggered = session.course.rings.iter().filter(|r| r.triggered()).count();
        assert_eq!(triggered, session.current_ring());
        assert!(session.course.rings[..session.current_ring()].iter().all(|r| r.triggered()));

        if was_started {
            let expected = deadline_before - FRAME_MS + bonus * report.rings_crossed as f64;
            assert!(
                (session.timing.deadline_ms - expected).abs() < 1e-9,
                "deadline {} expected {}",
                session.timing.deadline_ms,
                expected
            );
        }

        if report.outcome.is_some() {
            assert_eq!(game.phase(), Phase::End);
            break;
        }
        assert_eq!(game.phase(), Phase::Game);
    }
    now
}

#[test]
fn test_ground_sessions_keep_invariants() {
    for seed in 0..4 {
        let dir = tempfile::tempdir().unwrap();
        let mut game = Game::new(context(&dir, seed, false));
        fly(&mut game, 20_000);

        let session = game.session();
        assert_eq!(game.phase(), Phase::End, "seed {seed} never finished");
        match session.outcome {
            Some(Outcome::Victory) => {
                assert_eq!(session.current_ring(), session.total_rings());
                let stored = Ranking::load(dir.path().join("ranking.txt"));
                assert_eq!(stored.entries.len(), 1);
            }
            Some(Outcome::Defeat) => {
                assert!(session.timing.deadline_ms < 0.0);
                assert!(!dir.path().join("ranking.txt").exists());
            }
            None => panic!("session ended without an outcome"),
        }
    }
}

#[test]
fn test_flight_sessions_keep_invariants() {
    for seed in 0..3 {
        let dir = tempfile::tempdir().unwrap();
        let mut game = Game::new(context(&dir, seed, true));
        assert!(game.session().craft.is_flight());
        fly(&mut game, 20_000);

        let session = game.session();
        assert_eq!(game.phase(), Phase::End);
        if session.outcome == Some(Outcome::Victory) {
            // flight mode only wins through the gate
            assert!(session.final_stage);
        }
        assert!(session.craft.position().y >= flappy_ship::consts::CRAFT_MIN_HEIGHT);
    }
}

#[test]
fn test_same_seed_same_flight() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut a = Game::new(context(&dir_a, 21, false));
    let mut b = Game::new(context(&dir_b, 21, false));
    fly(&mut a, 400);
    fly(&mut b, 400);
    assert_eq!(a.session().craft.position(), b.session().craft.position());
    assert_eq!(a.session().current_ring(), b.session().current_ring());
}

#[test]
fn test_screens_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = Game::new(context(&dir, 3, false));
    assert_eq!(game.phase(), Phase::Splash);

    press(&mut game, Key::Return, 0.0);
    press(&mut game, Key::S, 0.0);
    game.action(1_000.0);

    // a long pause in the menu costs nothing
    press(&mut game, Key::Esc, 1_000.0);
    assert_eq!(game.phase(), Phase::Menu);
    press(&mut game, Key::Esc, 60_000.0);
    assert_eq!(game.phase(), Phase::Game);
    game.action(60_000.0);
    let initial = Tuning::default().timing.initial_deadline_ms;
    assert_eq!(game.session().timing.deadline_ms, initial - 1_000.0);

    // idle until the deadline passes
    game.action(60_000.0 + initial);
    assert_eq!(game.phase(), Phase::End);
    assert_eq!(game.session().outcome, Some(Outcome::Defeat));

    // restart lays out the next course
    let seed = game.session().seed;
    press(&mut game, Key::Return, 80_000.0);
    assert_eq!(game.phase(), Phase::Game);
    assert_eq!(game.session().seed, seed + 1);

    press(&mut game, Key::Esc, 80_000.0);
    press(&mut game, Key::Up, 80_000.0);
    press(&mut game, Key::Return, 80_000.0);
    assert!(game.quit_requested());
}
