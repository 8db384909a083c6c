//! Chase camera
//!
//! Four fixed rigs follow the craft; the free-look mode orbits it under mouse
//! control. The core only computes where to look from, the renderer applies it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Lowest free-look elevation (degrees), keeps the eye above the craft
pub const MIN_VIEW_BETA: f32 = 5.0;
pub const MAX_VIEW_BETA: f32 = 90.0;
/// Closest free-look distance
pub const MIN_EYE_DIST: f32 = 1.0;
/// Zoom factor per wheel notch
pub const ZOOM_STEP: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Behind and above the craft
    #[default]
    Back,
    /// Close over-the-shoulder rig, offset 40 degrees
    TopFixed,
    /// High chase
    Top,
    /// Cockpit view
    Pilot,
    /// Mouse-driven orbit
    FreeLook,
}

impl CameraMode {
    pub const ALL: [CameraMode; 5] = [
        CameraMode::Back,
        CameraMode::TopFixed,
        CameraMode::Top,
        CameraMode::Pilot,
        CameraMode::FreeLook,
    ];

    pub fn next(&self) -> Self {
        match self {
            CameraMode::Back => CameraMode::TopFixed,
            CameraMode::TopFixed => CameraMode::Top,
            CameraMode::Top => CameraMode::Pilot,
            CameraMode::Pilot => CameraMode::FreeLook,
            CameraMode::FreeLook => CameraMode::Back,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::Back => "back",
            CameraMode::TopFixed => "top fixed",
            CameraMode::Top => "top",
            CameraMode::Pilot => "pilot",
            CameraMode::FreeLook => "free look",
        }
    }

    /// Rig distance and height above the craft
    fn rig(&self) -> (f32, f32) {
        match self {
            CameraMode::Back | CameraMode::Top => (2.5, 1.0),
            CameraMode::TopFixed => (0.5, 0.55),
            CameraMode::Pilot => (0.2, 0.55),
            CameraMode::FreeLook => (0.0, 0.0),
        }
    }
}

/// What the renderer should set up this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraView {
    LookAt { eye: Vec3, center: Vec3 },
    /// Rotate by `beta` around X then `alpha` around Y, `distance` back from `target`
    Orbit {
        target: Vec3,
        distance: f32,
        alpha: f32,
        beta: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub mode: CameraMode,
    /// Free-look azimuth in degrees
    pub view_alpha: f32,
    /// Free-look elevation in degrees
    pub view_beta: f32,
    pub eye_dist: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            mode: CameraMode::Back,
            view_alpha: 20.0,
            view_beta: 40.0,
            eye_dist: 5.0,
        }
    }
}

impl Camera {
    pub fn cycle(&mut self) {
        self.mode = self.mode.next();
        log::info!("Camera: {}", self.mode.as_str());
    }

    /// Apply relative mouse motion. Only moves the free-look camera.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.mode != CameraMode::FreeLook {
            return;
        }
        self.view_alpha += dx;
        self.view_beta = (self.view_beta + dy).clamp(MIN_VIEW_BETA, MAX_VIEW_BETA);
    }

    /// Wheel up moves closer, wheel down moves away
    pub fn zoom(&mut self, up: bool) {
        if up {
            self.eye_dist = (self.eye_dist * ZOOM_STEP).max(MIN_EYE_DIST);
        } else {
            self.eye_dist /= ZOOM_STEP;
        }
    }

    pub fn view(&self, craft_pos: Vec3, facing: f32) -> CameraView {
        if self.mode == CameraMode::FreeLook {
            return CameraView::Orbit {
                target: craft_pos,
                distance: self.eye_dist,
                alpha: self.view_alpha,
                beta: self.view_beta,
            };
        }

        let (d, h) = self.mode.rig();
        let (sin, cos) = facing.to_radians().sin_cos();
        let (eye_sin, eye_cos) = if self.mode == CameraMode::TopFixed {
            (facing + 40.0).to_radians().sin_cos()
        } else {
            (sin, cos)
        };
        let eye = craft_pos + Vec3::new(d * eye_sin, h, d * eye_cos);
        let center = craft_pos + Vec3::new(-d * sin, h, -d * cos);
        CameraView::LookAt { eye, center }
    }
}
