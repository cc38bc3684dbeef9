//! Frame-rate sampling and metric broadcast.
//!
//! The monitor is an ordinary value owned by the app root and shared through
//! an `Rc`. It never reads a clock itself: the animation-frame loop passes the
//! frame timestamp into [`PerformanceMonitor::on_frame`], which keeps it
//! testable with a simulated clock.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Minimum window between two fps flushes.
pub const SAMPLE_WINDOW_MS: f64 = 1000.0;

/// Counts frames and turns them into an fps figure once per window.
#[derive(Clone, Debug)]
pub struct FrameRateSampler {
    frames: u32,
    last_flush_ms: f64,
    fps: u32,
}

impl FrameRateSampler {
    pub fn new(now_ms: f64) -> Self {
        Self { frames: 0, last_flush_ms: now_ms, fps: 0 }
    }

    /// Last flushed fps (0 before the first window closes).
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Registers one frame. Returns the new fps when a window closed on this frame.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<u32> {
        self.frames += 1;
        let elapsed = now_ms - self.last_flush_ms;
        if elapsed < SAMPLE_WINDOW_MS {
            return None;
        }
        self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
        self.frames = 0;
        self.last_flush_ms = now_ms;
        Some(self.fps)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeapUsage {
    pub used: u64,
    pub total: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub load_event_end: f64,
    pub dom_complete: f64,
    pub first_contentful_paint: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceSample {
    pub fps: u32,
    pub memory: Option<HeapUsage>,
    pub timing: NavigationTiming,
}

impl PerformanceSample {
    pub fn load_time_ms(&self) -> f64 {
        self.timing.load_event_end - self.timing.navigation_start
    }

    pub fn dom_complete_ms(&self) -> f64 {
        self.timing.dom_complete - self.timing.navigation_start
    }
}

/// Where timing and memory figures come from. Implementations must not fail:
/// anything the platform does not expose is left at zero / `None`.
pub trait MetricsSource {
    fn timing(&self) -> NavigationTiming;

    fn memory(&self) -> Option<HeapUsage> {
        None
    }
}

/// Source for hosts without a performance API.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMetrics;

impl MetricsSource for NoMetrics {
    fn timing(&self) -> NavigationTiming {
        NavigationTiming::default()
    }
}

type Callback = Rc<dyn Fn(&PerformanceSample)>;
type SubscriberList = RefCell<Vec<(u64, Callback)>>;

/// Returned by [`PerformanceMonitor::subscribe`].
pub struct Subscription {
    id: u64,
    list: Weak<SubscriberList>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct PerformanceMonitor {
    sampler: RefCell<FrameRateSampler>,
    source: Box<dyn MetricsSource>,
    subscribers: Rc<SubscriberList>,
    next_id: Cell<u64>,
}

impl PerformanceMonitor {
    pub fn new(source: Box<dyn MetricsSource>, now_ms: f64) -> Self {
        Self {
            sampler: RefCell::new(FrameRateSampler::new(now_ms)),
            source,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&PerformanceSample) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        Subscription { id, list: Rc::downgrade(&self.subscribers) }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn snapshot(&self, fps: u32) -> PerformanceSample {
        PerformanceSample { fps, memory: self.source.memory(), timing: self.source.timing() }
    }

    /// Called once per animation frame. On a window flush, builds a sample,
    /// pushes it to every subscriber and returns it.
    pub fn on_frame(&self, now_ms: f64) -> Option<PerformanceSample> {
        let fps = self.sampler.borrow_mut().record_frame(now_ms)?;
        let sample = self.snapshot(fps);
        // callbacks may unsubscribe themselves; do not hold the borrow while calling
        let callbacks: Vec<Callback> = self.subscribers.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for cb in callbacks {
            cb(&sample);
        }
        Some(sample)
    }

    /// Current fps plus a fresh timing/memory snapshot.
    pub fn latest_metrics(&self) -> PerformanceSample {
        let fps = self.sampler.borrow().fps();
        self.snapshot(fps)
    }

    pub fn log_metrics(&self) {
        let m = self.latest_metrics();
        tracing::info!(
            fps = m.fps,
            load_time_ms = m.load_time_ms(),
            dom_complete_ms = m.dom_complete_ms(),
            "performance metrics"
        );
    }
}
