//! Surprise Journey core crate.
//!
//! A birthday "journey" for the browser: a preloaded, paced sequence of
//! screens ending in a scratch-to-reveal card. The state machines (preload
//! batch, reveal mask, sequencer, prize wheel, screen controllers, shell) are
//! plain Rust and run under native `cargo test`; `web` wires them to the DOM
//! and exposes `start_experience()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod device;
pub mod error;
pub mod perf;
pub mod preload;
pub mod prize_wheel;
pub mod reveal;
pub mod screens;
pub mod sequencer;
pub mod shell;
pub mod timing;

mod web; // browser entry points

pub use config::{AssetManifest, ExperienceConfig, PreloadConfig, RevealConfig};
pub use device::{DeviceClass, DeviceSnapshot, DisplayEnv, Orientation};
pub use error::{AssetLoadError, ConfigError, GalleryError, NavigationError, SpinError};
pub use perf::{MetricsSource, PerformanceMonitor, PerformanceSample, Subscription};
pub use preload::{
    start_loading, AssetKind, AssetLoader, AssetRequest, BatchStatus, LoadStatus, PreloadBatch, PreloadHandle,
    ReadinessPolicy,
};
pub use reveal::{PointerEdge, PointerInput, RevealInteraction, RevealMask, RevealOutcome, RevealState};
pub use sequencer::{NavigationSequencer, Screen, ScreenKind};
pub use shell::{AppShell, ShellPhase};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
