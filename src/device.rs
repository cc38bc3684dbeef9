//! Device / display capability probe.
//!
//! Classification is pure over a [`DisplayEnv`]; [`snapshot`] fills one from
//! the browser (or falls back to conservative defaults when there is no
//! window). Nothing is cached.

use wasm_bindgen::JsCast;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Raw inputs read from the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayEnv {
    pub user_agent: String,
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub max_touch_points: i32,
    pub has_touch_handler: bool,
    pub webgl: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DeviceSnapshot {
    pub is_mobile: bool,
    pub is_ios: bool,
    pub orientation: Orientation,
    pub device_class: DeviceClass,
    pub screen_width: f64,
    pub screen_height: f64,
    pub pixel_ratio: f64,
    pub supports_touch: bool,
    pub supports_webgl: bool,
}

impl Default for DeviceSnapshot {
    /// Answer for a host with no display (server-like context).
    fn default() -> Self {
        classify(&DisplayEnv::default())
    }
}

const TABLET_MARKERS: &[&str] = &["tablet", "ipad", "playbook", "silk"];
const MOBILE_MARKERS: &[&str] = &[
    "Mobile", "Android", "iPhone", "iPod", "IEMobile", "BlackBerry", "Kindle", "Silk-Accelerated", "hpwOS", "webOS",
    "Opera Mobi", "Opera Mini",
];
const HANDHELD_MARKERS: &[&str] = &["android", "webos", "iphone", "ipad", "ipod", "blackberry", "iemobile", "opera mini"];
const IOS_MARKERS: &[&str] = &["iPad", "iPhone", "iPod"];

pub fn device_class(user_agent: &str) -> DeviceClass {
    let lower = user_agent.to_ascii_lowercase();
    let android_tablet = lower.contains("android") && !lower.contains("mobi");
    if android_tablet || TABLET_MARKERS.iter().any(|m| lower.contains(m)) {
        return DeviceClass::Tablet;
    }
    if MOBILE_MARKERS.iter().any(|m| user_agent.contains(m)) {
        return DeviceClass::Mobile;
    }
    DeviceClass::Desktop
}

pub fn is_mobile(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    HANDHELD_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn is_ios(user_agent: &str) -> bool {
    IOS_MARKERS.iter().any(|m| user_agent.contains(m))
}

pub fn orientation(width: f64, height: f64) -> Orientation {
    // no viewport counts as portrait
    if height > width || (width == 0.0 && height == 0.0) {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    }
}

pub fn classify(env: &DisplayEnv) -> DeviceSnapshot {
    let pixel_ratio = if env.pixel_ratio > 0.0 { env.pixel_ratio } else { 1.0 };
    DeviceSnapshot {
        is_mobile: is_mobile(&env.user_agent),
        is_ios: is_ios(&env.user_agent),
        orientation: orientation(env.width, env.height),
        device_class: device_class(&env.user_agent),
        screen_width: env.width,
        screen_height: env.height,
        pixel_ratio,
        supports_touch: env.has_touch_handler || env.max_touch_points > 0,
        supports_webgl: env.webgl,
    }
}

/// Reads the current browser environment. Without a window (or off wasm)
/// every field keeps its `DisplayEnv::default()` value.
pub fn read_env() -> DisplayEnv {
    if !cfg!(target_arch = "wasm32") {
        return DisplayEnv::default();
    }
    let Some(win) = web_sys::window() else {
        return DisplayEnv::default();
    };
    let nav = win.navigator();
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    DisplayEnv {
        user_agent: nav.user_agent().unwrap_or_default(),
        width: dim(win.inner_width()),
        height: dim(win.inner_height()),
        pixel_ratio: win.device_pixel_ratio(),
        max_touch_points: nav.max_touch_points(),
        has_touch_handler: js_sys::Reflect::has(&win, &"ontouchstart".into()).unwrap_or(false),
        webgl: webgl_available(&win),
    }
}

fn webgl_available(win: &web_sys::Window) -> bool {
    let Some(doc) = win.document() else {
        return false;
    };
    let Ok(canvas) = doc.create_element("canvas").map(|el| el.unchecked_into::<web_sys::HtmlCanvasElement>()) else {
        return false;
    };
    ["webgl", "experimental-webgl"]
        .iter()
        .any(|kind| matches!(canvas.get_context(kind), Ok(Some(_))))
}

/// Capability snapshot of the current host.
pub fn snapshot() -> DeviceSnapshot {
    classify(&read_env())
}
