use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Decorative wheel rotation driven only by elapsed time.
///
/// Not coupled to the car's speed along the route; the angle is recomputed
/// from absolute time every frame so skipped frames never drift.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WheelSpin {
    /// Radians per second.
    pub angular_rate: f32,
    /// Local spin axis of a wheel in its parent's frame.
    pub axis: Vec3,
}

impl Default for WheelSpin {
    fn default() -> Self {
        WheelSpin {
            angular_rate: 3.0,
            axis: Vec3::X,
        }
    }
}

impl WheelSpin {
    pub fn angle_at(&self, elapsed: f64) -> f32 {
        // keep the angle bounded, wheels look the same every full turn
        (elapsed * self.angular_rate as f64).rem_euclid(std::f64::consts::TAU) as f32
    }

    pub fn rotation_at(&self, elapsed: f64) -> Quat {
        let axis = self.axis.try_normalize().unwrap_or(Vec3::X);
        Quat::from_axis_angle(axis, self.angle_at(elapsed))
    }
}
