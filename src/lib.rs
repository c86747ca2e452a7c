//! A car driving laps of a closed spline route.
//!
//! - **core**: route sampling, motion, wheel spin, viewport adaptation and the
//!   frame loop, written against small collaborator traits
//! - **spawning**: static scene (road, cones, car, lights)
//! - **systems**: Bevy systems wiring the core into an app
//! - **serialization**: RON scene configuration
//! - **headless**: windowless trace runner

pub mod core;
pub mod headless;
pub mod serialization;
pub mod spawning;
pub mod systems;

pub use crate::core::drive_plugin::DrivePlugin;
pub use crate::core::motion::{MotionController, MotionSettings, Pose};
pub use crate::core::path_sampler::{Parameterization, PathSampler};
pub use crate::core::route::{Route, RouteError};
pub use crate::core::session::AnimationSession;
pub use crate::serialization::config::{ConfigError, SceneConfig};
