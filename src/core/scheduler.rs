use crate::core::frame_clock::FrameClock;

/// Handle of a pending single-shot frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Whatever delivers display refresh opportunities (a window event loop, a
/// test harness stepping a fake clock).
///
/// A request fires at most once; the scheduler re-arms after every frame.
pub trait SchedulerHost {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Turns host refresh callbacks into a strictly increasing elapsed time.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    clock: FrameClock,
    pending: Option<FrameRequest>,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(clock: FrameClock) -> Self {
        FrameScheduler {
            clock,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        match self.pending {
            Some(_) => SchedulerState::Running,
            None => SchedulerState::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Frames delivered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self, host: &mut impl SchedulerHost) {
        if self.pending.is_some() {
            return;
        }
        self.clock.reset();
        self.pending = Some(host.request_frame());
    }

    pub fn stop(&mut self, host: &mut impl SchedulerHost) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
    }

    /// Consumes the pending request and re-arms the next one.
    ///
    /// Returns the elapsed time to animate, or `None` when the frame must not
    /// run: the scheduler is stopped, `request` is not the pending one, or the
    /// timestamp did not advance.
    pub fn on_frame(
        &mut self,
        host: &mut impl SchedulerHost,
        request: FrameRequest,
        timestamp: f64,
    ) -> Option<f64> {
        if self.pending != Some(request) {
            return None;
        }
        self.pending = Some(host.request_frame());

        let elapsed = self.clock.tick(timestamp);
        match elapsed {
            Some(_) => self.frames += 1,
            None => bevy::log::trace!("dropping frame at {timestamp}, clock did not advance"),
        }
        elapsed
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FrameClock::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        next: u64,
        armed: Vec<FrameRequest>,
        cancelled: Vec<FrameRequest>,
    }

    impl SchedulerHost for CountingHost {
        fn request_frame(&mut self) -> FrameRequest {
            self.next += 1;
            let request = FrameRequest(self.next);
            self.armed.push(request);
            request
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.cancelled.push(request);
        }
    }

    #[test]
    fn rearms_once_per_frame() {
        let mut host = CountingHost::default();
        let mut scheduler = FrameScheduler::new(FrameClock::milliseconds());
        scheduler.start(&mut host);

        let first = scheduler.pending().unwrap();
        assert_eq!(scheduler.on_frame(&mut host, first, 100.0), Some(0.0));
        let second = scheduler.pending().unwrap();
        assert_ne!(first, second);
        let elapsed = scheduler.on_frame(&mut host, second, 116.0).unwrap();
        assert!((elapsed - 0.016).abs() < 1e-12);
        assert_eq!(host.armed.len(), 3);
        assert_eq!(scheduler.frames(), 2);
    }

    #[test]
    fn stale_request_is_ignored() {
        let mut host = CountingHost::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut host);
        let first = scheduler.pending().unwrap();
        scheduler.on_frame(&mut host, first, 0.0);

        assert_eq!(scheduler.on_frame(&mut host, first, 1.0), None);
        assert_eq!(host.armed.len(), 2);
    }

    #[test]
    fn stop_cancels_pending_request() {
        let mut host = CountingHost::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut host);
        let pending = scheduler.pending().unwrap();

        scheduler.stop(&mut host);
        assert_eq!(host.cancelled, vec![pending]);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.on_frame(&mut host, pending, 5.0), None);

        scheduler.stop(&mut host);
        assert_eq!(host.cancelled.len(), 1);
    }

    #[test]
    fn start_twice_keeps_one_request() {
        let mut host = CountingHost::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut host);
        scheduler.start(&mut host);
        assert_eq!(host.armed.len(), 1);
    }

    #[test]
    fn non_advancing_frame_still_rearms() {
        let mut host = CountingHost::default();
        let mut scheduler = FrameScheduler::default();
        scheduler.start(&mut host);
        let a = scheduler.pending().unwrap();
        scheduler.on_frame(&mut host, a, 2.0);
        let b = scheduler.pending().unwrap();
        assert_eq!(scheduler.on_frame(&mut host, b, 2.0), None);
        assert!(scheduler.is_running());
        let c = scheduler.pending().unwrap();
        assert_eq!(scheduler.on_frame(&mut host, c, 2.5), Some(0.5));
    }
}
