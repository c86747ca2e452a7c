use std::fs;
use std::path::{Path, PathBuf};

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::motion::{MotionController, MotionSettings, MAX_LOOK_AHEAD};
use crate::core::path_sampler::{Parameterization, PathSampler};
use crate::core::route::{Route, RouteError};
use crate::core::viewport::CameraLens;
use crate::core::wheel_spin::WheelSpin;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse scene config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),
    #[error("motion look_ahead must lie strictly between 0 and {max} of a loop, got {found}")]
    LookAhead { found: f32, max: f32 },
}

/// Everything the scene can be tuned by, loaded from a RON file.
///
/// Every field defaults to the values the scene was designed with, so a file
/// only needs the sections it overrides.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub route: RouteConfig,
    pub motion: MotionSettings,
    pub wheels: WheelSpin,
    pub camera: CameraConfig,
    pub window: WindowConfig,
    pub lane: LaneConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RouteConfig {
    pub points: Vec<[f32; 2]>,
    pub parameterization: Parameterization,
    /// Draw the route as a line on the ground.
    pub show_preview: bool,
    pub preview_divisions: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            points: vec![
                [-10.0, -27.0],
                [0.0, 0.0],
                [10.0, 27.0],
                [-10.0, 27.0],
                [0.0, 0.0],
                [10.0, -27.0],
                [2.0, -32.0],
                [-7.0, -30.0],
            ],
            parameterization: Parameterization::ArcLength,
            show_preview: false,
            preview_divisions: 50,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub lens: CameraLens,
    pub position: Vec3,
    pub focus: Vec3,
    /// Radians of orbit per pixel of mouse motion.
    pub orbit_sensitivity: f32,
    /// Fraction of the distance covered per scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            lens: CameraLens::default(),
            position: Vec3::new(15.0, 10.0, 0.0) * 3.0,
            focus: Vec3::ZERO,
            orbit_sensitivity: 0.01,
            zoom_sensitivity: 0.1,
            min_distance: 10.0,
            max_distance: 300.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub clear_color: [u8; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Spline Drive".to_string(),
            width: 1280.0,
            height: 720.0,
            clear_color: [0xaa, 0xaa, 0xaa],
        }
    }
}

/// Dashed centre line painted along the road.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LaneConfig {
    pub length: f32,
    pub dash: f32,
    pub gap: f32,
    /// Height above the ground, avoids z-fighting with the road.
    pub lift: f32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        LaneConfig {
            length: 70.0,
            dash: 6.1,
            gap: 3.0,
            lift: 0.02,
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        bevy::log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = ron::from_str(text)?;
        config.route()?;
        if !config.motion.has_usable_look_ahead() {
            return Err(ConfigError::LookAhead {
                found: config.motion.look_ahead,
                max: MAX_LOOK_AHEAD,
            });
        }
        Ok(config)
    }

    pub fn route(&self) -> Result<Route, RouteError> {
        Route::try_from(self.route.points.as_slice())
    }

    pub fn sampler(&self) -> Result<PathSampler, RouteError> {
        PathSampler::new(self.route()?, self.route.parameterization)
    }

    pub fn motion_controller(&self) -> Result<MotionController, RouteError> {
        Ok(MotionController::new(self.sampler()?, self.motion))
    }
}
