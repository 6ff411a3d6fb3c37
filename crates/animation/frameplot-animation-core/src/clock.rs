//! Frame clock: turns elapsed wall time into a number of due ticks.

use std::time::Duration;

use crate::timeline::frame_interval;
use crate::Result;

/// Accumulates elapsed time and releases one tick per frame interval while
/// running. Stopping keeps the partial interval so a resume does not skip.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameClock {
    interval: f64,
    pending: f64,
    running: bool,
}

impl FrameClock {
    /// A running clock ticking every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.as_secs_f64(),
            pending: 0.0,
            running: true,
        }
    }

    pub fn from_fps(fps: f64) -> Result<Self> {
        frame_interval(fps).map(Self::new)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Add `dt` seconds and return how many ticks are now due.
    pub fn elapse(&mut self, dt: f64) -> usize {
        if !self.running || !(dt.is_finite() && dt > 0.0) || self.interval <= 0.0 {
            return 0;
        }
        self.pending += dt;
        // Tolerate float noise so that n * interval yields n ticks.
        let due = ((self.pending / self.interval) + 1e-9).floor();
        self.pending = (self.pending - due * self.interval).max(0.0);
        due as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_per_elapsed_interval() {
        let mut clock = FrameClock::from_fps(10.0).unwrap();
        assert_eq!(clock.elapse(0.05), 0);
        assert_eq!(clock.elapse(0.05), 1);
        assert_eq!(clock.elapse(0.35), 3);
        assert_eq!(clock.elapse(0.05), 1);
    }

    #[test]
    fn from_fps_rejects_unrepresentable_rates() {
        assert!(FrameClock::from_fps(1e-30).is_err());
        assert!(FrameClock::from_fps(f64::NAN).is_err());
    }

    #[test]
    fn stopped_clock_does_not_tick() {
        let mut clock = FrameClock::new(Duration::from_millis(100));
        clock.stop();
        assert_eq!(clock.elapse(1.0), 0);
        clock.start();
        assert_eq!(clock.elapse(0.25), 2);
        assert!(clock.is_running());
        assert_eq!(clock.interval(), Duration::from_millis(100));
    }
}
