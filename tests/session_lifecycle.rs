use spline_drive::core::collaborators::{Renderer, ViewportNotifier, ViewportSource};
use spline_drive::core::frame_clock::FrameClock;
use spline_drive::core::viewport::{CameraLens, ViewportSize};
use spline_drive::core::wheel_spin::WheelSpin;
use spline_drive::headless::{ManualHost, PoseRecorder};
use spline_drive::{AnimationSession, MotionController, MotionSettings, Parameterization, PathSampler, Route};

use bevy_math::{Vec2, Vec3};

#[derive(Default)]
struct LensLog {
    aspects: Vec<f32>,
}

impl Renderer<PoseRecorder> for LensLog {
    fn render(&mut self, _scene: &PoseRecorder, lens: &CameraLens) {
        self.aspects.push(lens.aspect_ratio);
    }
}

fn figure_eight() -> Route {
    Route::new([
        Vec2::new(-10.0, -27.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 27.0),
        Vec2::new(-10.0, 27.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, -27.0),
        Vec2::new(2.0, -32.0),
        Vec2::new(-7.0, -30.0),
    ])
    .unwrap()
}

fn session(interval_ms: f64) -> AnimationSession<ManualHost, ViewportNotifier> {
    let sampler = PathSampler::new(figure_eight(), Parameterization::ArcLength).unwrap();
    let settings = MotionSettings {
        speed_factor: 0.125,
        look_ahead: 0.01,
        ride_height: 0.0,
    };
    AnimationSession::new(
        MotionController::new(sampler, settings),
        WheelSpin::default(),
        CameraLens::default(),
        FrameClock::milliseconds(),
        ManualHost::new(0.0, interval_ms),
        ViewportNotifier::new(ViewportSize::new(800.0, 600.0)),
    )
}

fn deliver(
    session: &mut AnimationSession<ManualHost, ViewportNotifier>,
    rig: &mut PoseRecorder,
    renderer: &mut LensLog,
) -> Option<spline_drive::core::session::FrameReport> {
    let (request, timestamp) = session.host_mut().advance()?;
    session.on_frame(request, timestamp, rig, renderer)
}

#[test]
fn lap_returns_to_start() {
    let mut session = session(1000.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();
    session.start();

    let first = deliver(&mut session, &mut rig, &mut renderer).unwrap();
    assert_eq!(first.elapsed, 0.0);
    assert!(first.pose.position.distance(Vec3::new(-10.0, 0.0, -27.0)) < 1e-3);
    assert!(first.pose.heading.is_finite());
    assert!((first.pose.heading.length() - 1.0).abs() < 1e-4);

    let mut last = first;
    for _ in 0..8 {
        last = deliver(&mut session, &mut rig, &mut renderer).unwrap();
    }
    assert!((last.elapsed - 8.0).abs() < 1e-9);
    assert!(last.pose.parameter < 1e-4 || last.pose.parameter > 1.0 - 1e-4);
    assert!(last.pose.position.distance(first.pose.position) < 1e-2);
    assert_eq!(rig.placements, 9);
}

#[test]
fn resize_is_applied_once() {
    let mut session = session(16.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();
    session.start();
    assert_eq!(session.lens().aspect_ratio, 800.0 / 600.0);
    assert_eq!(session.adapter().updates(), 1);

    session.viewport_mut().resize(ViewportSize::new(1024.0, 768.0));
    session.viewport_mut().resize(ViewportSize::new(1024.0, 768.0));
    deliver(&mut session, &mut rig, &mut renderer).unwrap();
    session.viewport_mut().resize(ViewportSize::new(1024.0, 768.0));
    deliver(&mut session, &mut rig, &mut renderer).unwrap();

    assert_eq!(session.lens().aspect_ratio, 1024.0 / 768.0);
    assert_eq!(session.adapter().updates(), 2);
    assert_eq!(renderer.aspects, vec![1024.0 / 768.0; 2]);
}

#[test]
fn empty_viewport_does_not_halt_frames() {
    let mut session = session(16.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();
    session.start();

    session.viewport_mut().resize(ViewportSize::new(0.0, 0.0));
    assert!(deliver(&mut session, &mut rig, &mut renderer).is_some());
    assert!(deliver(&mut session, &mut rig, &mut renderer).is_some());
    assert_eq!(session.lens().aspect_ratio, 800.0 / 600.0);
}

#[test]
fn stop_releases_listener_and_frame() {
    let mut session = session(16.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();

    session.start();
    assert_eq!(session.viewport().listener_count(), 1);
    deliver(&mut session, &mut rig, &mut renderer).unwrap();

    session.stop();
    assert!(!session.is_running());
    assert_eq!(session.viewport().listener_count(), 0);
    assert_eq!(session.host().armed(), None);
    assert_eq!(session.host().cancelled(), 1);
    assert!(deliver(&mut session, &mut rig, &mut renderer).is_none());

    session.stop();
    assert_eq!(session.host().cancelled(), 1);
}

#[test]
fn restart_begins_a_new_run() {
    let mut session = session(250.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();

    session.start();
    session.start();
    assert_eq!(session.viewport().listener_count(), 1);
    for _ in 0..5 {
        deliver(&mut session, &mut rig, &mut renderer).unwrap();
    }
    session.stop();

    session.viewport_mut().resize(ViewportSize::new(1920.0, 1080.0));
    session.start();
    assert_eq!(session.lens().aspect_ratio, 1920.0 / 1080.0);
    let report = deliver(&mut session, &mut rig, &mut renderer).unwrap();
    assert_eq!(report.elapsed, 0.0);
}

#[test]
fn dropped_refreshes_keep_motion_on_schedule() {
    let mut smooth = session(100.0);
    let mut choppy = session(100.0);
    let mut rig = PoseRecorder::default();
    let mut renderer = LensLog::default();
    smooth.start();
    choppy.start();

    let mut smooth_last = None;
    for _ in 0..11 {
        smooth_last = deliver(&mut smooth, &mut rig, &mut renderer);
    }

    // same wall-clock span, but most refreshes lost
    deliver(&mut choppy, &mut rig, &mut renderer).unwrap();
    for _ in 0..9 {
        choppy.host_mut().skip();
    }
    let choppy_last = deliver(&mut choppy, &mut rig, &mut renderer).unwrap();

    let smooth_last = smooth_last.unwrap();
    assert!((smooth_last.elapsed - choppy_last.elapsed).abs() < 1e-9);
    assert!(smooth_last.pose.position.distance(choppy_last.pose.position) < 1e-4);
}
