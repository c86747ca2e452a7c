use std::f32::consts::FRAC_PI_2;

use bevy::app::{App, Plugin};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::core::components::MainCamera;
use crate::serialization::config::CameraConfig;

// Keeps the camera off the poles, where looking at the focus loses its up vector.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;
const PIXELS_PER_LINE: f32 = 100.0;

pub struct CameraPlugin {
    config: CameraConfig,
}

impl CameraPlugin {
    pub fn new(config: CameraConfig) -> Self {
        CameraPlugin { config }
    }
}

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(OrbitCamera::from_config(&self.config))
            .insert_resource(CameraSettings(self.config.clone()))
            .add_systems(Startup, initialize_camera_system)
            .add_systems(Update, camera_controller_system);
    }
}

#[derive(Resource, Clone, Debug)]
struct CameraSettings(CameraConfig);

/// Spherical camera placement around a focus point.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    orbit_sensitivity: f32,
    zoom_sensitivity: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let offset = config.position - config.focus;
        let distance = offset
            .length()
            .clamp(config.min_distance, config.max_distance.max(config.min_distance));
        let pitch = if offset.length_squared() > 0.0 {
            (offset.y / offset.length()).asin()
        } else {
            0.0
        };

        OrbitCamera {
            focus: config.focus,
            yaw: offset.x.atan2(offset.z),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
            orbit_sensitivity: config.orbit_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
        }
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.focus + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(self.focus, Vec3::Y)
    }

    /// Drag by `delta` pixels: horizontal turns around the focus, vertical tilts.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.orbit_sensitivity;
        self.pitch = (self.pitch + delta.y * self.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive `lines` moves closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - lines * self.zoom_sensitivity).max(0.1);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }
}

fn initialize_camera_system(
    mut commands: Commands,
    orbit: Res<OrbitCamera>,
    settings: Res<CameraSettings>,
) {
    let lens = settings.0.lens;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: lens.fov_degrees.to_radians(),
            aspect_ratio: lens.aspect_ratio,
            near: lens.near,
            far: lens.far,
        }),
        orbit.transform(),
        Name::new("MainCamera"),
        MainCamera,
    ));
}

fn camera_controller_system(
    buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mut mouse_wheel_events: EventReader<MouseWheel>,
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let drag: Vec2 = mouse_motion_events.read().map(|event| event.delta).sum();
    let scroll: f32 = mouse_wheel_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
        })
        .sum();

    let dragging = buttons.pressed(MouseButton::Right) && drag != Vec2::ZERO;
    if !dragging && scroll == 0.0 {
        return;
    }
    if dragging {
        orbit.orbit(drag);
    }
    if scroll != 0.0 {
        orbit.zoom(scroll);
    }

    if let Ok(mut cam_trans) = camera_query.get_single_mut() {
        *cam_trans = orbit.transform();
    }
}
