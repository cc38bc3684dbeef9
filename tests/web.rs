// Browser-only checks (`wasm-pack test --headless --chrome`).
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use surprise_journey::device::{read_env, snapshot};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn snapshot_reads_the_live_window() {
    let env = read_env();
    assert!(!env.user_agent.is_empty());
    let snap = snapshot();
    assert!(snap.pixel_ratio > 0.0);
    assert!(snap.screen_width > 0.0);
}
