/// Elapsed time since the first frame of a run, in seconds.
///
/// Hosts report timestamps in their own unit; `seconds_per_tick` converts them
/// (0.001 for millisecond timestamps).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    seconds_per_tick: f64,
    origin: Option<f64>,
    last_elapsed: Option<f64>,
}

impl FrameClock {
    pub fn new(seconds_per_tick: f64) -> Self {
        FrameClock {
            seconds_per_tick,
            origin: None,
            last_elapsed: None,
        }
    }

    pub fn seconds() -> Self {
        Self::new(1.0)
    }

    pub fn milliseconds() -> Self {
        Self::new(0.001)
    }

    /// Elapsed seconds at `timestamp`, or `None` if it does not move past the
    /// previously reported frame.
    pub fn tick(&mut self, timestamp: f64) -> Option<f64> {
        if !timestamp.is_finite() {
            return None;
        }
        let origin = *self.origin.get_or_insert(timestamp);
        let elapsed = (timestamp - origin) * self.seconds_per_tick;

        match self.last_elapsed {
            Some(last) if elapsed <= last => None,
            _ => {
                self.last_elapsed = Some(elapsed);
                Some(elapsed)
            }
        }
    }

    pub fn elapsed(&self) -> Option<f64> {
        self.last_elapsed
    }

    /// Next tick becomes the new origin.
    pub fn reset(&mut self) {
        self.origin = None;
        self.last_elapsed = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_timestamp_is_origin() {
        let mut clock = FrameClock::milliseconds();
        assert_eq!(clock.tick(5000.0), Some(0.0));
        let elapsed = clock.tick(5500.0).unwrap();
        assert!((elapsed - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stale_timestamps_are_dropped() {
        let mut clock = FrameClock::seconds();
        clock.tick(1.0);
        clock.tick(2.0);
        assert_eq!(clock.tick(2.0), None);
        assert_eq!(clock.tick(1.5), None);
        assert_eq!(clock.tick(f64::NAN), None);
        assert_eq!(clock.tick(3.0), Some(2.0));
    }

    #[test]
    fn reset_starts_a_new_run() {
        let mut clock = FrameClock::seconds();
        clock.tick(10.0);
        clock.tick(12.0);
        clock.reset();
        assert_eq!(clock.elapsed(), None);
        assert_eq!(clock.tick(40.0), Some(0.0));
    }
}
