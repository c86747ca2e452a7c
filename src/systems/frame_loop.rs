use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::core::collaborators::{apply_pose, Renderer, VehicleRig, ViewportNotifier, ViewportSource};
use crate::core::components::{MainCamera, Vehicle, Wheel};
use crate::core::motion::Pose;
use crate::core::scheduler::{FrameRequest, SchedulerHost};
use crate::core::session::AnimationSession;
use crate::core::viewport::{CameraLens, ViewportSize};

/// Scheduler host backed by Bevy's `Update` schedule.
///
/// A request is armed until the next `Update` run picks it up.
#[derive(Debug, Default)]
pub struct UpdateHost {
    next: u64,
    armed: Option<FrameRequest>,
}

impl UpdateHost {
    pub fn take_armed(&mut self) -> Option<FrameRequest> {
        self.armed.take()
    }

    pub fn armed(&self) -> Option<FrameRequest> {
        self.armed
    }
}

impl SchedulerHost for UpdateHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.armed = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.armed == Some(request) {
            self.armed = None;
        }
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct DriveSession(pub AnimationSession<UpdateHost, ViewportNotifier>);

/// Keyboard key that pauses and resumes the session.
#[derive(Resource, Clone, Copy, Debug)]
pub struct PauseKey(pub KeyCode);

impl Default for PauseKey {
    fn default() -> Self {
        PauseKey(KeyCode::Space)
    }
}

struct TransformRig<'a> {
    body: &'a mut Transform,
    wheels: Vec<(Mut<'a, Transform>, &'a Wheel)>,
}

impl VehicleRig for TransformRig<'_> {
    fn place(&mut self, pose: &Pose) {
        apply_pose(&mut *self.body, pose);
    }

    fn spin_wheels(&mut self, spin: Quat) {
        for (transform, wheel) in self.wheels.iter_mut() {
            transform.rotation = spin * wheel.rest;
        }
    }
}

// Bevy draws on its own; this only hands the projection to the camera.
struct ProjectionRenderer<'a> {
    projection: Option<Mut<'a, Projection>>,
}

impl<S> Renderer<S> for ProjectionRenderer<'_> {
    fn render(&mut self, _scene: &S, lens: &CameraLens) {
        let Some(projection) = self.projection.as_mut() else {
            return;
        };
        let wanted = PerspectiveProjection {
            fov: lens.fov_degrees.to_radians(),
            aspect_ratio: lens.aspect_ratio,
            near: lens.near,
            far: lens.far,
        };
        let up_to_date = matches!(
            &**projection,
            Projection::Perspective(current) if same_projection(current, &wanted)
        );
        if !up_to_date {
            **projection = Projection::Perspective(wanted);
        }
    }
}

fn same_projection(a: &PerspectiveProjection, b: &PerspectiveProjection) -> bool {
    a.fov == b.fov && a.aspect_ratio == b.aspect_ratio && a.near == b.near && a.far == b.far
}

pub fn start_session(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<DriveSession>,
) {
    if let Ok(window) = windows.get_single() {
        session
            .viewport_mut()
            .resize(ViewportSize::new(window.width(), window.height()));
    }
    session.start();
}

pub fn forward_window_resizes(
    mut resized: EventReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    mut session: ResMut<DriveSession>,
) {
    let primary = primary.get_single().ok();
    for event in resized.read() {
        if primary.is_some_and(|window| window != event.window) {
            continue;
        }
        session
            .viewport_mut()
            .resize(ViewportSize::new(event.width, event.height));
    }
}

pub fn toggle_session(
    keys: Res<ButtonInput<KeyCode>>,
    pause_key: Res<PauseKey>,
    mut session: ResMut<DriveSession>,
) {
    if !keys.just_pressed(pause_key.0) {
        return;
    }
    if session.is_running() {
        session.stop();
    } else {
        session.start();
    }
}

pub fn run_frame(
    time: Res<Time>,
    mut session: ResMut<DriveSession>,
    mut vehicles: Query<&mut Transform, With<Vehicle>>,
    mut wheels: Query<(&mut Transform, &Wheel), Without<Vehicle>>,
    mut cameras: Query<&mut Projection, With<MainCamera>>,
) {
    let Ok(body) = vehicles.get_single_mut() else {
        return;
    };
    let Some(request) = session.host_mut().take_armed() else {
        return;
    };

    let mut rig = TransformRig {
        body: body.into_inner(),
        wheels: wheels.iter_mut().collect(),
    };
    let mut renderer = ProjectionRenderer {
        projection: cameras.get_single_mut().ok(),
    };
    if let Some(report) = session.on_frame(request, time.elapsed_secs_f64(), &mut rig, &mut renderer) {
        trace!(
            "frame {} t={:.3} parameter={:.4} yaw={:.3}",
            report.frame,
            report.elapsed,
            report.pose.parameter,
            report.pose.yaw()
        );
    }
}

pub fn stop_on_exit(mut exits: EventReader<AppExit>, mut session: ResMut<DriveSession>) {
    if exits.read().next().is_some() {
        session.stop();
        debug!("viewport listeners left: {}", session.viewport().listener_count());
    }
}
