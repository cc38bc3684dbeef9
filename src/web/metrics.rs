//! Browser-backed metrics. `performance.memory` is Chromium-only and read
//! reflectively; paint entries may be missing. Neither is an error.

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Performance, PerformanceEntry};

use crate::perf::{HeapUsage, MetricsSource, NavigationTiming};

pub struct BrowserMetrics;

fn performance() -> Option<Performance> {
    web_sys::window().and_then(|w| w.performance())
}

fn number(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key)).ok()?.as_f64()
}

fn first_contentful_paint(perf: &Performance) -> Option<f64> {
    perf.get_entries_by_type("paint")
        .iter()
        .filter_map(|e| e.dyn_into::<PerformanceEntry>().ok())
        .find(|e| e.name() == "first-contentful-paint")
        .map(|e| e.start_time())
}

impl MetricsSource for BrowserMetrics {
    fn timing(&self) -> NavigationTiming {
        let Some(perf) = performance() else {
            return NavigationTiming::default();
        };
        let t = perf.timing();
        NavigationTiming {
            navigation_start: t.navigation_start(),
            load_event_end: t.load_event_end(),
            dom_complete: t.dom_complete(),
            first_contentful_paint: first_contentful_paint(&perf),
        }
    }

    fn memory(&self) -> Option<HeapUsage> {
        let perf = performance()?;
        let mem = Reflect::get(&perf, &JsValue::from_str("memory")).ok()?;
        if mem.is_undefined() || mem.is_null() {
            return None;
        }
        Some(HeapUsage {
            used: number(&mem, "usedJSHeapSize")? as u64,
            total: number(&mem, "totalJSHeapSize")? as u64,
        })
    }
}
