//! Gameplay simulation module
//!
//! Craft kinematics, checkpoint crossing, timing and scoring. This module must
//! stay free of rendering and platform code:
//! - Fixed physics step only
//! - Seeded RNG only
//! - Time comes in from the caller as milliseconds

pub mod autopilot;
pub mod checkpoint;
pub mod collision;
pub mod course;
pub mod craft;
pub mod state;
pub mod tick;
pub mod timing;

pub use autopilot::Autopilot;
pub use checkpoint::{FinalGate, Obstacle, Ring};
pub use collision::{CrossingFrame, CrossingProbe, sign_flipped};
pub use course::Course;
pub use craft::{Command, Craft, CraftKind, Motion, MotionState};
pub use state::{GameSession, Outcome, Phase};
pub use tick::{TickReport, action};
pub use timing::Timing;
