//! Runs the animation without a window, printing one line per frame.

use std::io::{self, Write};

use bevy_math::Quat;
use thiserror::Error;

use crate::core::collaborators::{Renderer, VehicleRig, ViewportNotifier};
use crate::core::frame_clock::FrameClock;
use crate::core::motion::Pose;
use crate::core::route::RouteError;
use crate::core::scheduler::{FrameRequest, SchedulerHost};
use crate::core::session::AnimationSession;
use crate::core::viewport::{CameraLens, ViewportSize};
use crate::serialization::config::SceneConfig;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("could not write trace")]
    Io(#[from] io::Error),
    #[error("refresh interval must be a positive number of milliseconds, got {0}")]
    Interval(f64),
    #[error("dropping every refresh leaves no frame to render")]
    DropsEveryRefresh,
}

/// Fake display refreshing at a fixed interval, in milliseconds.
#[derive(Debug, Clone)]
pub struct ManualHost {
    interval_ms: f64,
    now_ms: f64,
    next: u64,
    armed: Option<FrameRequest>,
    cancelled: usize,
}

impl ManualHost {
    pub fn new(start_ms: f64, interval_ms: f64) -> Self {
        ManualHost {
            interval_ms,
            now_ms: start_ms,
            next: 0,
            armed: None,
            cancelled: 0,
        }
    }

    /// Moves to the next refresh and fires the armed request, if any.
    pub fn advance(&mut self) -> Option<(FrameRequest, f64)> {
        self.now_ms += self.interval_ms;
        self.armed.take().map(|request| (request, self.now_ms))
    }

    /// Lets a refresh pass without delivering it, like a host that fell behind.
    pub fn skip(&mut self) {
        self.now_ms += self.interval_ms;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn armed(&self) -> Option<FrameRequest> {
        self.armed
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl SchedulerHost for ManualHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.armed = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.armed == Some(request) {
            self.armed = None;
            self.cancelled += 1;
        }
    }
}

/// Keeps the last pose and wheel spin it was given.
#[derive(Debug, Clone, Default)]
pub struct PoseRecorder {
    pub pose: Option<Pose>,
    pub wheel_spin: Quat,
    pub placements: u64,
}

impl VehicleRig for PoseRecorder {
    fn place(&mut self, pose: &Pose) {
        self.pose = Some(*pose);
        self.placements += 1;
    }

    fn spin_wheels(&mut self, spin: Quat) {
        self.wheel_spin = spin;
    }
}

/// Writes each rendered frame as a line of `key=value` pairs.
pub struct TraceRenderer<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TraceRenderer<W> {
    pub fn new(out: W) -> Self {
        TraceRenderer { out, error: None }
    }

    /// First write error, if any frame failed to print.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Renderer<PoseRecorder> for TraceRenderer<W> {
    fn render(&mut self, scene: &PoseRecorder, lens: &CameraLens) {
        if self.error.is_some() {
            return;
        }
        let Some(pose) = scene.pose else {
            return;
        };
        let (_, wheel_angle) = scene.wheel_spin.to_axis_angle();
        let result = writeln!(
            self.out,
            "frame={} parameter={:.4} x={:.3} z={:.3} yaw={:.3} wheel={:.3} aspect={:.4}",
            scene.placements,
            pose.parameter,
            pose.position.x,
            pose.position.z,
            pose.yaw(),
            wheel_angle,
            lens.aspect_ratio,
        );
        self.error = result.err();
    }
}

/// Extra refreshes allowed on top of two per frame before a trace gives up.
const REFRESH_SLACK: u64 = 16;

#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    pub frames: u64,
    pub interval_ms: f64,
    /// Skip every n-th refresh to exercise dropped frames.
    pub drop_every: Option<u64>,
}

impl TraceOptions {
    pub fn validate(&self) -> Result<(), TraceError> {
        if !(self.interval_ms.is_finite() && self.interval_ms > 0.0) {
            return Err(TraceError::Interval(self.interval_ms));
        }
        if self.drop_every == Some(1) {
            return Err(TraceError::DropsEveryRefresh);
        }
        Ok(())
    }

    // at most one refresh in two is dropped, so this is never reached by a
    // healthy run
    fn max_refreshes(&self) -> u64 {
        self.frames.saturating_mul(2).saturating_add(REFRESH_SLACK)
    }
}

impl Default for TraceOptions {
    fn default() -> Self {
        TraceOptions {
            frames: 480,
            interval_ms: 1000.0 / 60.0,
            drop_every: None,
        }
    }
}

pub type TraceSession = AnimationSession<ManualHost, ViewportNotifier>;

pub fn trace_session(config: &SceneConfig, options: &TraceOptions) -> Result<TraceSession, RouteError> {
    let viewport = ViewportNotifier::new(ViewportSize::new(config.window.width, config.window.height));
    Ok(AnimationSession::new(
        config.motion_controller()?,
        config.wheels,
        config.camera.lens,
        FrameClock::milliseconds(),
        ManualHost::new(0.0, options.interval_ms),
        viewport,
    ))
}

/// Drives `options.frames` frames and writes them to `out`. Returns the
/// number of frames rendered.
pub fn run_trace<W: Write>(config: &SceneConfig, options: &TraceOptions, out: W) -> Result<u64, TraceError> {
    options.validate()?;
    let mut session = trace_session(config, options)?;
    let mut rig = PoseRecorder::default();
    let mut renderer = TraceRenderer::new(out);

    session.start();
    let mut refresh = 0;
    let mut rendered = 0;
    let max_refreshes = options.max_refreshes();
    while rendered < options.frames {
        if refresh >= max_refreshes {
            bevy::log::warn!("giving up after {refresh} refreshes, {rendered} of {} frames rendered", options.frames);
            break;
        }
        refresh += 1;
        if options.drop_every.is_some_and(|n| n > 0 && refresh % n == 0) {
            session.host_mut().skip();
            continue;
        }
        let Some((request, timestamp)) = session.host_mut().advance() else {
            break;
        };
        if session.on_frame(request, timestamp, &mut rig, &mut renderer).is_some() {
            rendered += 1;
        }
    }
    session.stop();

    renderer.finish()?;
    bevy::log::info!("traced {rendered} frames over {refresh} refreshes");
    Ok(rendered)
}
