// Frame-rate sampling and subscriber broadcast, driven with synthetic timestamps.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use surprise_journey::perf::{FrameRateSampler, HeapUsage, NavigationTiming, NoMetrics};
use surprise_journey::{MetricsSource, PerformanceMonitor, Subscription};

#[test]
fn sixty_even_frames_in_a_second_read_sixty() {
    let mut sampler = FrameRateSampler::new(0.0);
    let mut reported = Vec::new();
    for i in 1..=60 {
        if let Some(fps) = sampler.record_frame(i as f64 * 1000.0 / 60.0) {
            reported.push(fps);
        }
    }
    assert_eq!(reported, vec![60]);
    assert_eq!(sampler.fps(), 60);
}

#[test]
fn slow_window_reports_low_rate() {
    let mut sampler = FrameRateSampler::new(0.0);
    for i in 1..=10 {
        let out = sampler.record_frame(i as f64 * 200.0);
        if i < 5 {
            assert_eq!(out, None);
        }
        if i == 5 {
            // 5 frames over 1000 ms
            assert_eq!(out, Some(5));
        }
    }
}

struct ChromeLike;

impl MetricsSource for ChromeLike {
    fn timing(&self) -> NavigationTiming {
        NavigationTiming {
            navigation_start: 1_000.0,
            load_event_end: 1_850.0,
            dom_complete: 1_700.0,
            first_contentful_paint: Some(320.0),
        }
    }

    fn memory(&self) -> Option<HeapUsage> {
        Some(HeapUsage { used: 12_000_000, total: 20_000_000 })
    }
}

#[test]
fn samples_carry_timing_and_memory_when_available() {
    let monitor = PerformanceMonitor::new(Box::new(ChromeLike), 0.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = monitor.subscribe(move |s| sink.borrow_mut().push(*s));

    for i in 1..=30 {
        monitor.on_frame(i as f64 * 1000.0 / 30.0);
    }
    let samples = seen.borrow();
    assert_eq!(samples.len(), 1);
    let s = &samples[0];
    assert_eq!(s.fps, 30);
    assert_eq!(s.load_time_ms(), 850.0);
    assert_eq!(s.dom_complete_ms(), 700.0);
    assert_eq!(s.memory.map(|m| m.used), Some(12_000_000));
    assert_eq!(s.timing.first_contentful_paint, Some(320.0));
}

#[test]
fn missing_metrics_are_omitted_not_errors() {
    let monitor = PerformanceMonitor::new(Box::new(NoMetrics), 0.0);
    let latest = monitor.latest_metrics();
    assert!(latest.memory.is_none());
    assert!(latest.timing.first_contentful_paint.is_none());
    monitor.log_metrics();
}

#[test]
fn subscriber_may_unsubscribe_during_broadcast() {
    let monitor = PerformanceMonitor::new(Box::new(NoMetrics), 0.0);
    let once_calls = Rc::new(Cell::new(0));
    let steady_calls = Rc::new(Cell::new(0));

    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let (slot_in, once_in) = (slot.clone(), once_calls.clone());
    let sub = monitor.subscribe(move |_| {
        once_in.set(once_in.get() + 1);
        if let Some(sub) = slot_in.borrow_mut().take() {
            sub.unsubscribe();
        }
    });
    *slot.borrow_mut() = Some(sub);
    let steady_in = steady_calls.clone();
    let _steady = monitor.subscribe(move |_| steady_in.set(steady_in.get() + 1));
    assert_eq!(monitor.subscriber_count(), 2);

    monitor.on_frame(1000.0);
    monitor.on_frame(2000.0);

    assert_eq!(once_calls.get(), 1);
    assert_eq!(steady_calls.get(), 2);
    assert_eq!(monitor.subscriber_count(), 1);
}
