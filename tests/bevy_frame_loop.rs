use std::time::Duration;

use bevy::prelude::*;
use bevy::window::WindowResized;
use spline_drive::core::collaborators::{ViewportNotifier, ViewportSource};
use spline_drive::core::components::{MainCamera, Vehicle, Wheel};
use spline_drive::core::frame_clock::FrameClock;
use spline_drive::core::viewport::ViewportSize;
use spline_drive::systems::frame_loop::{forward_window_resizes, run_frame, DriveSession, UpdateHost};
use spline_drive::{AnimationSession, SceneConfig};

fn app() -> App {
    let config = SceneConfig::default();
    let session = AnimationSession::new(
        config.motion_controller().unwrap(),
        config.wheels,
        config.camera.lens,
        FrameClock::seconds(),
        UpdateHost::default(),
        ViewportNotifier::new(ViewportSize::new(800.0, 600.0)),
    );

    let mut app = App::new();
    app.add_event::<WindowResized>()
        .insert_resource(Time::<()>::default())
        .insert_resource(DriveSession(session))
        .add_systems(Update, (forward_window_resizes, run_frame).chain());

    app.world_mut().spawn((Transform::default(), Vehicle));
    app.world_mut().spawn((Transform::default(), Wheel { rest: Quat::IDENTITY }));
    app.world_mut().spawn((Projection::Perspective(PerspectiveProjection::default()), MainCamera));
    app.world_mut().resource_mut::<DriveSession>().start();
    app
}

fn vehicle_transform(app: &mut App) -> Transform {
    let mut query = app.world_mut().query_filtered::<&Transform, With<Vehicle>>();
    *query.single(app.world())
}

fn camera_aspect(app: &mut App) -> f32 {
    let mut query = app.world_mut().query_filtered::<&Projection, With<MainCamera>>();
    match query.single(app.world()) {
        Projection::Perspective(perspective) => perspective.aspect_ratio,
        _ => panic!("camera lost its perspective projection"),
    }
}

#[test]
fn first_update_places_car_at_route_start() {
    let mut app = app();
    app.update();

    let transform = vehicle_transform(&mut app);
    assert!(transform.translation.distance(Vec3::new(-10.0, 0.0, -27.0)) < 1e-3);
    assert!(transform.rotation.is_finite());
    assert_eq!(camera_aspect(&mut app), 800.0 / 600.0);
}

#[test]
fn car_moves_and_camera_follows_resize() {
    let mut app = app();
    app.update();
    let start = vehicle_transform(&mut app).translation;

    app.world_mut().send_event(WindowResized {
        window: Entity::PLACEHOLDER,
        width: 1024.0,
        height: 768.0,
    });
    app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs(2));
    app.update();

    assert!(vehicle_transform(&mut app).translation.distance(start) > 1.0);
    assert_eq!(camera_aspect(&mut app), 1024.0 / 768.0);
    assert_eq!(app.world().resource::<DriveSession>().adapter().updates(), 2);
}

#[test]
fn stopped_session_leaves_scene_alone() {
    let mut app = app();
    app.update();
    let before = vehicle_transform(&mut app);

    app.world_mut().resource_mut::<DriveSession>().stop();
    app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs(3));
    app.update();

    assert_eq!(vehicle_transform(&mut app), before);
    assert_eq!(app.world().resource::<DriveSession>().viewport().listener_count(), 0);
}
