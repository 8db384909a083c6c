//! Interface to the renderer
//!
//! The core never draws. Each frame it builds read-only views of the session
//! and hands them to a `Renderer` picked by the current phase.

use glam::Vec3;

use crate::camera::CameraView;
use crate::game::{EndChoice, MenuItem};
use crate::ranking::RankingEntry;
use crate::settings::Settings;
use crate::sim::{FinalGate, GameSession, Obstacle, Ring};

/// Craft pose and hit state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftView {
    pub pos: Vec3,
    pub facing: f32,
    /// Control deflection, for banking the model
    pub steering: f32,
    /// Nose pitch (flight craft only)
    pub pitch: f32,
    pub flight: bool,
    /// Draw in the hit state this frame
    pub flicker: bool,
}

/// Heads-up display numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub remaining_seconds: f64,
    pub player_seconds: f64,
    /// Rings crossed so far
    pub ring: usize,
    pub total_rings: usize,
    /// Only the final gate is left
    pub final_stage: bool,
    /// Clock is running
    pub started: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct GameFrame<'a> {
    pub craft: CraftView,
    /// Crossed rings plus the active one
    pub rings: &'a [Ring],
    pub obstacles: &'a [Obstacle],
    /// Present once armed
    pub gate: Option<&'a FinalGate>,
    pub hud: Hud,
    pub camera: CameraView,
    pub settings: &'a Settings,
}

impl<'a> GameFrame<'a> {
    pub fn new(session: &'a GameSession, camera: CameraView, settings: &'a Settings) -> Self {
        let craft = &session.craft;
        Self {
            craft: CraftView {
                pos: craft.position(),
                facing: craft.facing(),
                steering: craft.steering(),
                pitch: craft.steer_flight(),
                flight: craft.is_flight(),
                flicker: session.timing.flicker(),
            },
            rings: session.visible_rings(),
            obstacles: &session.course.obstacles,
            gate: if session.final_stage {
                session.course.gate.as_ref()
            } else {
                None
            },
            hud: Hud {
                remaining_seconds: session.timing.remaining_seconds(),
                player_seconds: session.timing.player_seconds(),
                ring: session.current_ring(),
                total_rings: session.total_rings(),
                final_stage: session.final_stage,
                started: session.started(),
            },
            camera,
            settings,
        }
    }
}

/// One menu line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLine {
    pub item: MenuItem,
    pub label: &'static str,
    /// Current value for setting lines
    pub value: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub lines: Vec<MenuLine>,
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct EndView<'a> {
    pub victory: bool,
    pub player_seconds: f64,
    /// Top entries only
    pub ranking: &'a [RankingEntry],
    pub choice: EndChoice,
}

/// Implemented by whatever draws the game
pub trait Renderer {
    fn splash(&mut self);
    fn game(&mut self, frame: &GameFrame<'_>);
    /// The menu is drawn over the frozen game
    fn menu(&mut self, frame: &GameFrame<'_>, menu: &MenuView);
    fn end(&mut self, end: &EndView<'_>);
}
