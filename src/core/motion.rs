use bevy_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::path_sampler::{wrap_parameter, PathSampler};

/// Displacements shorter than this carry no usable heading.
const MIN_HEADING_DISTANCE: f32 = 1e-5;

/// Heading used until the first non-degenerate frame.
pub const INITIAL_HEADING: Vec2 = Vec2::Y;

/// Look-ahead must stay below half a loop, where the target starts trailing.
pub const MAX_LOOK_AHEAD: f32 = 0.5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MotionSettings {
    /// Full loops per second.
    pub speed_factor: f64,
    /// Fraction of a loop between the current point and the heading target.
    pub look_ahead: f32,
    /// Vertical offset of the car origin above the route plane.
    pub ride_height: f32,
}

impl MotionSettings {
    /// A look-ahead of zero (or a whole number of loops) puts the target on
    /// the car, so it never turns.
    pub fn has_usable_look_ahead(&self) -> bool {
        self.look_ahead > 0.0 && self.look_ahead < MAX_LOOK_AHEAD
    }
}

impl Default for MotionSettings {
    fn default() -> Self {
        MotionSettings {
            speed_factor: 0.125,
            look_ahead: 0.01,
            ride_height: 0.0,
        }
    }
}

/// Position and heading of the car for one frame.
///
/// The route's 2-D plane maps onto the scene's horizontal plane: route `x`
/// becomes world `x`, route `y` becomes world `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub parameter: f32,
    pub position: Vec3,
    /// Unit direction of travel in route coordinates.
    pub heading: Vec2,
}

impl Pose {
    /// Point one unit ahead of the car on the horizontal plane.
    pub fn look_target(&self) -> Vec3 {
        self.position + Vec3::new(self.heading.x, 0.0, self.heading.y)
    }

    /// Rotation about the vertical axis, zero when heading along +Z.
    pub fn yaw(&self) -> f32 {
        self.heading.x.atan2(self.heading.y)
    }
}

/// Maps elapsed time onto the route and derives the car's pose.
#[derive(Debug, Clone)]
pub struct MotionController {
    sampler: PathSampler,
    settings: MotionSettings,
    heading: Vec2,
}

impl MotionController {
    pub fn new(sampler: PathSampler, settings: MotionSettings) -> Self {
        MotionController {
            sampler,
            settings,
            heading: INITIAL_HEADING,
        }
    }

    pub fn sampler(&self) -> &PathSampler {
        &self.sampler
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    /// Path parameter reached after `elapsed` seconds, always in `[0, 1)`.
    pub fn parameter_at(&self, elapsed: f64) -> f32 {
        // reduce in f64 so long runs keep sub-frame precision
        let cycles = (elapsed * self.settings.speed_factor).rem_euclid(1.0);
        wrap_parameter(cycles as f32)
    }

    pub fn step(&mut self, elapsed: f64) -> Pose {
        let parameter = self.parameter_at(elapsed);
        let look_ahead_parameter = wrap_parameter(parameter + self.settings.look_ahead);

        let current = self.sampler.position_at(parameter);
        let target = self.sampler.position_at(look_ahead_parameter);

        if let Some(heading) = heading_between(current, target) {
            self.heading = heading;
        }

        Pose {
            parameter,
            position: Vec3::new(current.x, self.settings.ride_height, current.y),
            heading: self.heading,
        }
    }

    /// Forgets the held heading, as at the start of a fresh run.
    pub fn reset(&mut self) {
        self.heading = INITIAL_HEADING;
    }
}

fn heading_between(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let distance = delta.length();
    if !distance.is_finite() || distance < MIN_HEADING_DISTANCE {
        return None;
    }
    Some(delta / distance)
}
