// User-agent classification and snapshot rules (native, no window).

use surprise_journey::device::{classify, device_class, is_ios, is_mobile, snapshot};
use surprise_journey::{DeviceClass, DisplayEnv, Orientation};

const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[test]
fn phones_tablets_and_desktops() {
    assert_eq!(device_class(IPHONE), DeviceClass::Mobile);
    assert_eq!(device_class(IPAD), DeviceClass::Tablet);
    assert_eq!(device_class(ANDROID_PHONE), DeviceClass::Mobile);
    assert_eq!(device_class(ANDROID_TABLET), DeviceClass::Tablet);
    assert_eq!(device_class(DESKTOP), DeviceClass::Desktop);
}

#[test]
fn ios_and_handheld_flags() {
    assert!(is_ios(IPHONE) && is_ios(IPAD));
    assert!(!is_ios(ANDROID_PHONE));
    assert!(is_mobile(IPHONE) && is_mobile(IPAD) && is_mobile(ANDROID_TABLET));
    assert!(!is_mobile(DESKTOP));
}

#[test]
fn phone_snapshot_in_portrait() {
    let snap = classify(&DisplayEnv {
        user_agent: IPHONE.into(),
        width: 390.0,
        height: 844.0,
        pixel_ratio: 3.0,
        max_touch_points: 5,
        has_touch_handler: true,
        webgl: true,
    });
    assert_eq!(snap.orientation, Orientation::Portrait);
    assert_eq!(snap.device_class, DeviceClass::Mobile);
    assert_eq!(snap.pixel_ratio, 3.0);
    assert!(snap.supports_touch && snap.supports_webgl && snap.is_ios);
}

#[test]
fn missing_pixel_ratio_falls_back_to_one() {
    let snap = classify(&DisplayEnv { user_agent: DESKTOP.into(), width: 1920.0, height: 1080.0, ..Default::default() });
    assert_eq!(snap.pixel_ratio, 1.0);
    assert_eq!(snap.orientation, Orientation::Landscape);
    assert!(!snap.supports_touch);
}

#[test]
fn host_without_window_gets_conservative_defaults() {
    let snap = snapshot();
    assert_eq!(snap.device_class, DeviceClass::Desktop);
    assert_eq!(snap.orientation, Orientation::Portrait);
    assert_eq!((snap.screen_width, snap.screen_height), (0.0, 0.0));
    assert!(!snap.supports_webgl && !snap.supports_touch && !snap.is_mobile);
}
