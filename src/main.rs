//! Flappy Ship entry point
//!
//! Native headless driver: runs one session on a simulated clock with the demo
//! pilot at the controls, logging what a renderer would draw, then prints the
//! ranking. Usage: `flappy-ship [player-name] [--flight] [--seed N]`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flappy_ship::input::{InputEvent, Key};
    use flappy_ship::render::{EndView, GameFrame, MenuView, Renderer};
    use flappy_ship::sim::{Autopilot, Phase};
    use flappy_ship::{Game, GameContext, Settings, Tuning};

    const SETTINGS_FILE: &str = "settings.json";
    const TUNING_FILE: &str = "tuning.json";
    /// Simulated frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this much simulated time
    const MAX_RUN_MS: f64 = 10.0 * 60.0 * 1000.0;
    /// Log the HUD once every this many frames
    const HUD_EVERY: u64 = 60;

    #[derive(Debug)]
    pub struct Args {
        pub player: String,
        pub flight: bool,
        pub seed: u64,
    }

    pub fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
        let mut parsed = Args {
            player: flappy_ship::ranking::ANONYMOUS.to_string(),
            flight: false,
            seed: 0,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--flight" => parsed.flight = true,
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    parsed.seed = value.parse().map_err(|e| format!("bad seed {value}: {e}"))?;
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
                name => parsed.player = name.to_string(),
            }
        }
        Ok(parsed)
    }

    /// Renderer that writes a line of HUD to the log now and then
    #[derive(Default)]
    struct LogRenderer {
        frames: u64,
    }

    impl Renderer for LogRenderer {
        fn splash(&mut self) {
            log::debug!("[splash]");
        }

        fn game(&mut self, frame: &GameFrame<'_>) {
            self.frames += 1;
            if self.frames % HUD_EVERY != 0 {
                return;
            }
            let hud = &frame.hud;
            log::info!(
                "time {:6.2}s  ring {}/{}{}  pos ({:.1}, {:.1}, {:.1}){}",
                hud.remaining_seconds,
                hud.ring,
                hud.total_rings,
                if hud.final_stage { " +gate" } else { "" },
                frame.craft.pos.x,
                frame.craft.pos.y,
                frame.craft.pos.z,
                if frame.craft.flicker { "  *hit*" } else { "" }
            );
        }

        fn menu(&mut self, _frame: &GameFrame<'_>, menu: &MenuView) {
            log::debug!("[menu] cursor on {}", menu.lines[menu.cursor].label);
        }

        fn end(&mut self, end: &EndView<'_>) {
            log::debug!("[end] victory: {}", end.victory);
        }
    }

    pub fn run(args: Args) {
        let mut ctx = GameContext::new(args.player, args.seed);
        ctx.tuning = Tuning::load(TUNING_FILE);
        ctx.settings = Settings::load(SETTINGS_FILE);
        ctx.settings_path = Some(SETTINGS_FILE.into());
        if args.flight {
            ctx.settings.flight_mode = true;
        }

        let mut game = Game::new(ctx);
        let mut pilot = Autopilot::new();
        let mut renderer = LogRenderer::default();
        let mut now = 0.0;

        game.dispatch(InputEvent::KeyDown(Key::Return), now);
        while !game.quit_requested() && now < MAX_RUN_MS {
            now += FRAME_MS;
            if game.phase() == Phase::Game {
                for (motion, on) in pilot.update(game.session()) {
                    let key = Key::for_motion(motion);
                    let event = if on { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) };
                    game.dispatch(event, now);
                }
            }
            game.action(now);
            game.render(&mut renderer);
            if game.phase() == Phase::End {
                break;
            }
        }

        let session = game.session();
        match session.outcome {
            Some(outcome) if outcome.is_victory() => println!(
                "Victory in {:.3}s (rank {})",
                session.timing.player_seconds(),
                game.last_rank().map_or("-".to_string(), |r| r.to_string())
            ),
            Some(_) => println!(
                "Time is up after {}/{} rings",
                session.current_ring(),
                session.total_rings()
            ),
            None => println!("Gave up after {:.0}s", now / 1000.0),
        }

        println!("\nRanking:");
        for (i, entry) in game.ranking().top().iter().enumerate() {
            println!("{:>2}. {:<16} {:8.3}s", i + 1, entry.name, entry.seconds);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Ship (headless) starting...");

    match headless::parse_args(std::env::args().skip(1)) {
        Ok(args) => headless::run(args),
        Err(e) => {
            eprintln!("{e}\nusage: flappy-ship [player-name] [--flight] [--seed N]");
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No windowing backend on wasm; the library is driven by the host page
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::headless::parse_args;

    fn args(list: &[&str]) -> Result<super::headless::Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["ada", "--flight", "--seed", "7"]).unwrap();
        assert_eq!(parsed.player, "ada");
        assert!(parsed.flight);
        assert_eq!(parsed.seed, 7);

        let parsed = args(&[]).unwrap();
        assert!(!parsed.flight);
        assert_eq!(parsed.seed, 0);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--seed"]).is_err());
        assert!(args(&["--seed", "x"]).is_err());
        assert!(args(&["--turbo"]).is_err());
    }
}
