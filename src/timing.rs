//! Frame-driven timers.
//!
//! Screens do not own `setTimeout` handles. They own these deadlines and the
//! frame loop polls them with the frame timestamp, so unmounting a screen
//! (dropping its state) cancels every pending timer with it.

/// Repeating timer. Fires at most once per poll and re-arms from the
/// current time, like a `setInterval` that never queues missed ticks.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval_ms: f64,
    next_due_ms: f64,
}

impl Ticker {
    pub fn new(interval_ms: f64, now_ms: f64) -> Self {
        Self { interval_ms, next_due_ms: now_ms + interval_ms }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms + self.interval_ms;
        true
    }

    /// Restarts the interval from `now_ms`.
    pub fn reset(&mut self, now_ms: f64) {
        self.next_due_ms = now_ms + self.interval_ms;
    }
}

/// One-shot timer whose delay can be re-armed, used for steps with varying
/// intervals (prize wheel).
#[derive(Clone, Copy, Debug, Default)]
pub struct Deadline {
    due_ms: Option<f64>,
}

impl Deadline {
    pub fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.due_ms = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// True exactly once when the deadline has passed; disarms itself.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}
