use std::time::{Duration, Instant};

/// Linear interpolation of one number from `start` to `end`, sampled once per
/// frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    start: f64,
    end: f64,
    started_at: Instant,
    duration: Duration,
}

impl Tween {
    pub fn new(start: f64, end: f64, started_at: Instant, duration: Duration) -> Self {
        Self {
            start,
            end,
            started_at,
            duration,
        }
    }

    /// Count up from zero, the way every card value is introduced
    pub fn from_zero(end: f64, started_at: Instant, duration: Duration) -> Self {
        Self::new(0.0, end, started_at, duration)
    }

    /// Fraction of the animation elapsed at `now`, clamped to [0, 1]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            // Land exactly on the target, no float drift
            self.end
        } else {
            progress * (self.end - self.start) + self.start
        }
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> f64 {
        self.end
    }
}
