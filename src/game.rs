//! Game phase state machine
//!
//! Owns the session and everything that outlives it (settings, camera,
//! ranking). Input is routed through a small dispatch table picked by the
//! current phase; every transition installs a fresh table so handlers of the
//! previous phase can never fire.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::input::{InputEvent, Key, MouseEvent};
use crate::ranking::Ranking;
use crate::render::{EndView, GameFrame, MenuLine, MenuView, Renderer};
use crate::settings::{Setting, Settings};
use crate::sim::{GameSession, Motion, Outcome, Phase, TickReport, tick};
use crate::tuning::Tuning;

/// Default ranking file, relative to the working directory
pub const RANKING_FILE: &str = "ranking.txt";

/// Explicit context handed to the game at construction
#[derive(Debug, Clone)]
pub struct GameContext {
    pub settings: Settings,
    pub tuning: Tuning,
    pub ranking_path: PathBuf,
    /// Where settings changed in the menu are written back, if anywhere
    pub settings_path: Option<PathBuf>,
    pub player_name: String,
    /// Course seed of the first session; advanced on every restart
    pub seed: u64,
}

impl GameContext {
    pub fn new(player_name: impl Into<String>, seed: u64) -> Self {
        Self {
            settings: Settings::default(),
            tuning: Tuning::default(),
            ranking_path: PathBuf::from(RANKING_FILE),
            settings_path: None,
            player_name: player_name.into(),
            seed,
        }
    }
}

/// Allowed phase changes
const TRANSITIONS: [(Phase, Phase); 6] = [
    (Phase::Splash, Phase::Game),
    (Phase::Game, Phase::Menu),
    (Phase::Menu, Phase::Game),
    (Phase::Menu, Phase::Splash),
    (Phase::Game, Phase::End),
    (Phase::End, Phase::Game),
];

pub fn transition_allowed(from: Phase, to: Phase) -> bool {
    TRANSITIONS.contains(&(from, to))
}

/// Entries of the settings menu, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    Setting(Setting),
    Restart,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 8] = [
        MenuItem::Setting(Setting::Wireframe),
        MenuItem::Setting(Setting::EnvMap),
        MenuItem::Setting(Setting::Headlight),
        MenuItem::Setting(Setting::Shadow),
        MenuItem::Setting(Setting::Blending),
        MenuItem::Setting(Setting::FlightMode),
        MenuItem::Restart,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Setting(setting) => setting.as_str(),
            MenuItem::Restart => "Restart",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Selection on the end screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndChoice {
    #[default]
    Restart,
    Quit,
}

impl EndChoice {
    pub fn toggled(&self) -> Self {
        match self {
            EndChoice::Restart => EndChoice::Quit,
            EndChoice::Quit => EndChoice::Restart,
        }
    }
}

type KeyHandler = fn(&mut Game, Key, f64);
type MouseHandler = fn(&mut Game, MouseEvent);

/// Input handlers installed for one phase
#[derive(Clone, Copy)]
pub struct Bindings {
    pub phase: Phase,
    key_down: KeyHandler,
    key_up: KeyHandler,
    mouse: MouseHandler,
}

impl Bindings {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Splash => Self {
                phase,
                key_down: splash_key_down,
                key_up: ignore_key,
                mouse: ignore_mouse,
            },
            Phase::Game => Self {
                phase,
                key_down: game_key_down,
                key_up: game_key_up,
                mouse: game_mouse,
            },
            Phase::Menu => Self {
                phase,
                key_down: menu_key_down,
                key_up: ignore_key,
                mouse: ignore_mouse,
            },
            Phase::End => Self {
                phase,
                key_down: end_key_down,
                key_up: ignore_key,
                mouse: ignore_mouse,
            },
        }
    }
}

pub struct Game {
    ctx: GameContext,
    session: GameSession,
    camera: Camera,
    ranking: Ranking,
    bindings: Bindings,
    menu_cursor: usize,
    end_choice: EndChoice,
    /// Rank of the last winning run, if it made the list
    last_rank: Option<usize>,
    quit: bool,
}

impl Game {
    pub fn new(ctx: GameContext) -> Self {
        let ranking = Ranking::load(&ctx.ranking_path);
        let session = GameSession::new(ctx.seed, ctx.settings.flight_mode, &ctx.tuning);
        log::info!(
            "New game for {} ({} mode)",
            ctx.player_name,
            if session.flight_mode { "flight" } else { "ground" }
        );
        Self {
            ctx,
            session,
            camera: Camera::default(),
            ranking,
            bindings: Bindings::for_phase(Phase::Splash),
            menu_cursor: 0,
            end_choice: EndChoice::default(),
            last_rank: None,
            quit: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Phase whose handlers are currently installed
    pub fn bound_phase(&self) -> Phase {
        self.bindings.phase
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    pub fn end_choice(&self) -> EndChoice {
        self.end_choice
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        if !self.quit {
            log::info!("Quit requested");
            self.quit = true;
        }
    }

    /// Route one input event to the handlers of the current phase
    pub fn dispatch(&mut self, event: InputEvent, now_ms: f64) {
        let bindings = self.bindings;
        match event {
            InputEvent::KeyDown(key) => (bindings.key_down)(self, key, now_ms),
            InputEvent::KeyUp(key) => (bindings.key_up)(self, key, now_ms),
            InputEvent::Mouse(mouse) => (bindings.mouse)(self, mouse),
            InputEvent::Quit => self.request_quit(),
        }
    }

    /// Per-frame simulation; only does anything during play
    pub fn action(&mut self, now_ms: f64) -> TickReport {
        if self.session.phase != Phase::Game {
            return TickReport::default();
        }
        let report = tick::action(&mut self.session, now_ms);
        if report.outcome.is_some() {
            self.change_phase(Phase::End, now_ms);
        }
        report
    }

    /// Apply a phase change if the transition table allows it.
    ///
    /// Returns false (and leaves everything untouched) otherwise.
    pub fn change_phase(&mut self, to: Phase, now_ms: f64) -> bool {
        let from = self.session.phase;
        if !transition_allowed(from, to) {
            log::error!("Unrecognized transition {} -> {}", from.as_str(), to.as_str());
            return false;
        }

        match (from, to) {
            (Phase::Game, Phase::Menu) => {
                // keys released while the menu is up would never reach the craft
                for motion in Motion::ALL {
                    self.session.craft.send_command(motion, false);
                }
                self.menu_cursor = 0;
            }
            (Phase::Menu, Phase::Game) => {
                self.save_settings();
                self.session.timing.resume(now_ms);
            }
            (Phase::Menu, Phase::Splash) => {
                self.save_settings();
                self.reset();
            }
            (Phase::Game, Phase::End) => self.finish(),
            (Phase::End, Phase::Game) => self.reset(),
            _ => {}
        }

        self.session.phase = to;
        self.bindings = Bindings::for_phase(to);
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        true
    }

    /// Throw the session away and lay out a new course
    fn reset(&mut self) {
        self.ctx.seed = self.ctx.seed.wrapping_add(1);
        self.session = GameSession::new(self.ctx.seed, self.ctx.settings.flight_mode, &self.ctx.tuning);
        self.end_choice = EndChoice::default();
        self.last_rank = None;
        log::info!("Session reset (seed {})", self.ctx.seed);
    }

    /// Entering the end screen: record a win
    fn finish(&mut self) {
        self.end_choice = EndChoice::default();
        if self.session.outcome != Some(Outcome::Victory) {
            log::info!("Defeat");
            return;
        }

        let seconds = self.session.timing.player_seconds();
        log::info!("Victory in {:.3}s", seconds);
        match Ranking::record(&self.ctx.ranking_path, &self.ctx.player_name, seconds) {
            Ok((ranking, rank)) => {
                self.ranking = ranking;
                self.last_rank = Some(rank);
            }
            Err(e) => {
                log::error!("Failed to write ranking {}: {}", self.ctx.ranking_path.display(), e);
                self.last_rank = Some(self.ranking.add(&self.ctx.player_name, seconds));
            }
        }
    }

    fn save_settings(&self) {
        if let Some(path) = &self.ctx.settings_path {
            if let Err(e) = self.ctx.settings.save(path) {
                log::error!("Failed to save settings {}: {}", path.display(), e);
            }
        }
    }

    pub fn menu_view(&self) -> MenuView {
        let lines = MenuItem::ALL
            .iter()
            .map(|&item| MenuLine {
                item,
                label: item.label(),
                value: match item {
                    MenuItem::Setting(setting) => Some(self.ctx.settings.get(setting)),
                    _ => None,
                },
            })
            .collect();
        MenuView {
            lines,
            cursor: self.menu_cursor,
        }
    }

    fn game_frame(&self) -> GameFrame<'_> {
        let craft = &self.session.craft;
        let view = self.camera.view(craft.position(), craft.facing());
        GameFrame::new(&self.session, view, &self.ctx.settings)
    }

    /// Hand the current frame to the renderer
    pub fn render<R: Renderer>(&self, renderer: &mut R) {
        match self.session.phase {
            Phase::Splash => renderer.splash(),
            Phase::Game => renderer.game(&self.game_frame()),
            Phase::Menu => renderer.menu(&self.game_frame(), &self.menu_view()),
            Phase::End => renderer.end(&EndView {
                victory: self.session.outcome.is_some_and(|o| o.is_victory()),
                player_seconds: self.session.timing.player_seconds(),
                ranking: self.ranking.top(),
                choice: self.end_choice,
            }),
        }
    }
}

fn ignore_key(_: &mut Game, _: Key, _: f64) {}

fn ignore_mouse(_: &mut Game, _: MouseEvent) {}

fn splash_key_down(game: &mut Game, key: Key, now_ms: f64) {
    match key {
        Key::Return => {
            game.change_phase(Phase::Game, now_ms);
        }
        Key::Esc => game.request_quit(),
        _ => {}
    }
}

fn game_key_down(game: &mut Game, key: Key, now_ms: f64) {
    if let Some(motion) = key.motion() {
        game.session.send_command(motion, true, now_ms);
        return;
    }
    match key {
        Key::Esc => {
            game.change_phase(Phase::Menu, now_ms);
        }
        Key::F1 => game.camera.cycle(),
        Key::F2 => {
            game.ctx.settings.toggle(Setting::Wireframe);
        }
        Key::F3 => {
            game.ctx.settings.toggle(Setting::EnvMap);
        }
        Key::F4 => {
            game.ctx.settings.toggle(Setting::Headlight);
        }
        Key::F5 => {
            game.ctx.settings.toggle(Setting::Shadow);
        }
        _ => {}
    }
}

fn game_key_up(game: &mut Game, key: Key, now_ms: f64) {
    if let Some(motion) = key.motion() {
        game.session.send_command(motion, false, now_ms);
    }
}

fn game_mouse(game: &mut Game, event: MouseEvent) {
    match event {
        MouseEvent::Motion { dx, dy, dragging } => {
            if dragging {
                game.camera.look(dx, dy);
            }
        }
        MouseEvent::Wheel { up } => game.camera.zoom(up),
    }
}

fn menu_key_down(game: &mut Game, key: Key, now_ms: f64) {
    let n = MenuItem::ALL.len();
    let item = MenuItem::ALL[game.menu_cursor];
    match key {
        Key::Up => game.menu_cursor = (game.menu_cursor + n - 1) % n,
        Key::Down => game.menu_cursor = (game.menu_cursor + 1) % n,
        Key::Left | Key::Right => {
            if let MenuItem::Setting(setting) = item {
                game.ctx.settings.set(setting, key == Key::Left);
            }
        }
        Key::Return => match item {
            MenuItem::Setting(setting) => {
                game.ctx.settings.toggle(setting);
            }
            MenuItem::Restart => {
                game.change_phase(Phase::Splash, now_ms);
            }
            MenuItem::Quit => {
                game.save_settings();
                game.request_quit();
            }
        },
        Key::Esc => {
            // a different craft needs a new course
            let target = if game.ctx.settings.flight_mode != game.session.flight_mode {
                Phase::Splash
            } else {
                Phase::Game
            };
            game.change_phase(target, now_ms);
        }
        _ => {}
    }
}

fn end_key_down(game: &mut Game, key: Key, now_ms: f64) {
    match key {
        Key::Up | Key::Down => game.end_choice = game.end_choice.toggled(),
        Key::Return => match game.end_choice {
            EndChoice::Restart => {
                game.change_phase(Phase::Game, now_ms);
            }
            EndChoice::Quit => game.request_quit(),
        },
        _ => {}
    }
}
