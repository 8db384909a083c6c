//! Abstract input contract
//!
//! The windowing layer translates its native events into these before handing
//! them to `Game::dispatch`.

use serde::{Deserialize, Serialize};

use crate::sim::Motion;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Esc,
    Return,
    /// Cycle camera
    F1,
    /// Toggle wireframe
    F2,
    /// Toggle environment mapping
    F3,
    /// Toggle headlight
    F4,
    /// Toggle shadow
    F5,
}

impl Key {
    /// Craft motion driven by this key during play
    pub fn motion(&self) -> Option<Motion> {
        match self {
            Key::W | Key::Up => Some(Motion::Throttle),
            Key::A | Key::Left => Some(Motion::SteerLeft),
            Key::S | Key::Down => Some(Motion::Brake),
            Key::D | Key::Right => Some(Motion::SteerRight),
            _ => None,
        }
    }

    /// Primary key bound to a motion
    pub fn for_motion(motion: Motion) -> Self {
        match motion {
            Motion::Throttle => Key::W,
            Motion::SteerLeft => Key::A,
            Motion::Brake => Key::S,
            Motion::SteerRight => Key::D,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseEvent {
    /// Relative pointer motion in pixels; `dragging` while the left button is down
    Motion { dx: f32, dy: f32, dragging: bool },
    /// One wheel notch
    Wheel { up: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Mouse(MouseEvent),
    /// Window closed
    Quit,
}
