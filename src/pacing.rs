// Frame pacing
//
// The host drives ticks from a timer. The interval is whole milliseconds,
// `1000 / max_fps`, so 60 fps ticks every 16ms and 30 fps every 33ms.

use std::time::{Duration, Instant};

pub const DEFAULT_MAX_FPS: u32 = 60;

pub fn tick_interval(max_fps: u32) -> Duration {
    Duration::from_millis(u64::from(1000 / max_fps.max(1)))
}

/// Deadline-based tick timer for `ControlFlow::WaitUntil` style loops.
#[derive(Debug)]
pub struct TickTimer {
    interval: Duration,
    next: Instant,
}

impl TickTimer {
    pub fn new(max_fps: u32, now: Instant) -> Self {
        Self {
            interval: tick_interval(max_fps),
            next: now,
        }
    }

    /// Takes effect from the next scheduled tick.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// True when a tick is due. Missed deadlines are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next < now {
            self.next = now + self.interval;
        }
        true
    }
}
