use bevy::app::{App, Plugin};
use bevy::prelude::*;

use crate::core::collaborators::ViewportNotifier;
use crate::core::components::{RoutePreview, Vehicle, Wheel};
use crate::core::frame_clock::FrameClock;
use crate::core::motion::MotionController;
use crate::core::route::RouteError;
use crate::core::session::AnimationSession;
use crate::serialization::config::SceneConfig;
use crate::spawning::light_spawning::spawn_lights;
use crate::spawning::road_spawning::spawn_road;
use crate::spawning::vehicle_spawning::spawn_vehicle;
use crate::systems::camera::CameraPlugin;
use crate::systems::frame_loop::{
    forward_window_resizes, run_frame, start_session, stop_on_exit, toggle_session, DriveSession,
    PauseKey, UpdateHost,
};
use crate::systems::lane_markings::{draw_lane_markings, LaneMarkings};

/// The whole scene: road, cones, lights, camera and the car driving its route.
pub struct DrivePlugin {
    config: SceneConfig,
    motion: MotionController,
}

impl DrivePlugin {
    /// Fails when the configured route cannot form a closed loop.
    pub fn new(config: SceneConfig) -> Result<Self, RouteError> {
        let motion = config.motion_controller()?;
        Ok(DrivePlugin { config, motion })
    }
}

impl Plugin for DrivePlugin {
    fn build(&self, app: &mut App) {
        let session = AnimationSession::new(
            self.motion.clone(),
            self.config.wheels,
            self.config.camera.lens,
            FrameClock::seconds(),
            UpdateHost::default(),
            ViewportNotifier::default(),
        );

        app
            .insert_resource(DriveSession(session))
            .insert_resource(LaneMarkings::from_config(&self.config.lane))
            .init_resource::<PauseKey>()
            .register_type::<Vehicle>()
            .register_type::<Wheel>()
            .register_type::<RoutePreview>()
            .add_plugins(CameraPlugin::new(self.config.camera.clone()))
            .add_systems(Startup, (spawn_road, spawn_vehicle, spawn_lights))
            .add_systems(PostStartup, start_session)
            .add_systems(Update, (forward_window_resizes, toggle_session, run_frame).chain())
            .add_systems(Update, draw_lane_markings)
            .add_systems(Last, stop_on_exit);

        if self.config.route.show_preview {
            let lift = self.config.lane.lift;
            let points = self
                .motion
                .sampler()
                .polyline(self.config.route.preview_divisions)
                .into_iter()
                .map(|p| Vec3::new(p.x, lift, p.y))
                .collect();
            app.insert_resource(RoutePreview(points));
        }

        info!(
            "route with {} control points, {:.1} units long",
            self.motion.sampler().route().len(),
            self.motion.sampler().length()
        );
    }
}
