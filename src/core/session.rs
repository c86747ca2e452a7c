use bevy_math::Quat;

use crate::core::collaborators::{ListenerId, Renderer, VehicleRig, ViewportSource};
use crate::core::frame_clock::FrameClock;
use crate::core::motion::{MotionController, Pose};
use crate::core::scheduler::{FrameRequest, FrameScheduler, SchedulerHost};
use crate::core::viewport::{CameraLens, ViewportAdapter, ViewportChange};
use crate::core::wheel_spin::WheelSpin;

/// What a delivered frame computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub elapsed: f64,
    pub pose: Pose,
    pub wheel_spin: Quat,
}

/// One running animation: owns the frame loop, the viewport subscription,
/// and everything derived per frame.
///
/// All per-frame state is recomputed from elapsed time, so dropped or late
/// frames never accumulate error.
pub struct AnimationSession<H, V> {
    scheduler: FrameScheduler,
    host: H,
    viewport: V,
    listener: Option<ListenerId>,
    motion: MotionController,
    wheels: WheelSpin,
    adapter: ViewportAdapter,
    lens: CameraLens,
}

impl<H: SchedulerHost, V: ViewportSource> AnimationSession<H, V> {
    pub fn new(
        motion: MotionController,
        wheels: WheelSpin,
        lens: CameraLens,
        clock: FrameClock,
        host: H,
        viewport: V,
    ) -> Self {
        AnimationSession {
            scheduler: FrameScheduler::new(clock),
            host,
            viewport,
            listener: None,
            motion,
            wheels,
            adapter: ViewportAdapter::new(),
            lens,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Subscribes to viewport changes, sizes the camera for the current
    /// surface and arms the first frame. Does nothing if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        if self.listener.is_none() {
            self.listener = Some(self.viewport.subscribe());
        }
        let size = self.viewport.size();
        if self.adapter.adapt(size, &mut self.lens) == ViewportChange::Skipped {
            bevy::log::warn!("starting with an empty viewport, projection left at defaults");
        }
        self.motion.reset();
        self.scheduler.start(&mut self.host);
        bevy::log::info!("animation session started");
    }

    /// Cancels the pending frame and releases the viewport subscription.
    pub fn stop(&mut self) {
        self.scheduler.stop(&mut self.host);
        if let Some(listener) = self.listener.take() {
            self.viewport.unsubscribe(listener);
            bevy::log::info!("animation session stopped after {} frames", self.scheduler.frames());
        }
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.scheduler.pending()
    }

    /// Runs one frame: viewport changes, motion, wheel spin, render.
    ///
    /// Returns `None` when the frame is not delivered (stopped session, stale
    /// request, non-advancing timestamp); nothing is touched in that case.
    pub fn on_frame<S, R>(
        &mut self,
        request: FrameRequest,
        timestamp: f64,
        scene: &mut S,
        renderer: &mut R,
    ) -> Option<FrameReport>
    where
        S: VehicleRig,
        R: Renderer<S>,
    {
        let elapsed = self.scheduler.on_frame(&mut self.host, request, timestamp)?;
        self.sync_viewport();

        let pose = self.motion.step(elapsed);
        scene.place(&pose);
        let wheel_spin = self.wheels.rotation_at(elapsed);
        scene.spin_wheels(wheel_spin);
        renderer.render(scene, &self.lens);

        Some(FrameReport {
            frame: self.scheduler.frames(),
            elapsed,
            pose,
            wheel_spin,
        })
    }

    fn sync_viewport(&mut self) {
        let Some(listener) = self.listener else {
            return;
        };
        for size in self.viewport.drain(listener) {
            self.adapter.adapt(size, &mut self.lens);
        }
    }

    pub fn lens(&self) -> &CameraLens {
        &self.lens
    }

    pub fn adapter(&self) -> &ViewportAdapter {
        &self.adapter
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }
}
