//! App root: loading gate in front of the screen flow.
//!
//! The shell owns the preload handle, the sequencer and a handle to the
//! performance monitor. The frame loop calls [`AppShell::tick`]; the shell
//! stays on the loading view until the batch settles in a way the
//! [`ReadinessPolicy`](crate::preload::ReadinessPolicy) accepts, then waits
//! `min_loading_ms` more so the loading view never just flashes.

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::config::ExperienceConfig;
use crate::device::DeviceSnapshot;
use crate::error::NavigationError;
use crate::perf::{PerformanceMonitor, Subscription};
use crate::preload::{start_loading, AssetLoader, BatchStatus, PreloadHandle};
use crate::sequencer::{NavigationSequencer, Screen};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShellPhase {
    /// Assets still loading, or settled in a way the policy rejects.
    Loading,
    /// Assets accepted at `since_ms`; loading view kept for the minimum delay.
    Settled { since_ms: f64 },
    /// Screen flow mounted.
    Presenting,
}

pub struct AppShell<L: AssetLoader> {
    config: ExperienceConfig,
    preload: PreloadHandle<L>,
    monitor: Rc<PerformanceMonitor>,
    low_fps_watch: Option<Subscription>,
    low_fps_warnings: Rc<Cell<u32>>,
    sequencer: NavigationSequencer,
    device: DeviceSnapshot,
    phase: ShellPhase,
    stall_logged: bool,
}

impl<L: AssetLoader + 'static> AppShell<L> {
    /// Builds the shell and starts the preload. The returned driver must be
    /// polled for loads to make progress. `None` when `screens` is empty.
    pub fn new(
        config: ExperienceConfig,
        loader: Rc<L>,
        monitor: Rc<PerformanceMonitor>,
        device: DeviceSnapshot,
        screens: Vec<Screen>,
    ) -> Option<(Self, LocalBoxFuture<'static, ()>)> {
        let sequencer = NavigationSequencer::new(screens)?;

        if !device.supports_webgl {
            tracing::warn!("WebGL is not supported on this device");
        }
        tracing::debug!(class = ?device.device_class, touch = device.supports_touch, "device snapshot");

        let low_fps_warnings = Rc::new(Cell::new(0));
        let threshold = config.low_fps_threshold;
        let counter = low_fps_warnings.clone();
        let low_fps_watch = monitor.subscribe(move |sample| {
            if sample.fps < threshold {
                counter.set(counter.get() + 1);
                tracing::warn!(fps = sample.fps, "low fps detected");
            }
        });

        let (preload, driver) = start_loading(loader, config.assets.clone());
        tracing::info!(assets = preload.with_batch(|b| b.len()), "preload started");

        let shell = AppShell {
            config,
            preload,
            monitor,
            low_fps_watch: Some(low_fps_watch),
            low_fps_warnings,
            sequencer,
            device,
            phase: ShellPhase::Loading,
            stall_logged: false,
        };
        Some((shell, driver))
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn is_presenting(&self) -> bool {
        self.phase == ShellPhase::Presenting
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn preload(&self) -> &PreloadHandle<L> {
        &self.preload
    }

    pub fn monitor(&self) -> &Rc<PerformanceMonitor> {
        &self.monitor
    }

    pub fn device(&self) -> &DeviceSnapshot {
        &self.device
    }

    pub fn sequencer(&self) -> &NavigationSequencer {
        &self.sequencer
    }

    pub fn low_fps_warnings(&self) -> u32 {
        self.low_fps_warnings.get()
    }

    /// Frame-loop entry. Returns the phase after this tick.
    pub fn tick(&mut self, now_ms: f64) -> ShellPhase {
        match self.phase {
            ShellPhase::Loading => {
                let status = self.preload.status();
                if self.config.preload.policy.accepts(status) {
                    tracing::info!(?status, "assets accepted");
                    self.phase = ShellPhase::Settled { since_ms: now_ms };
                } else if status == BatchStatus::PartiallyFailed && !self.stall_logged {
                    self.stall_logged = true;
                    tracing::warn!(
                        failed = self.preload.failed_count(),
                        "strict readiness policy: staying on the loading view"
                    );
                }
            }
            ShellPhase::Settled { since_ms } => {
                if now_ms - since_ms >= self.config.min_loading_ms {
                    tracing::info!(screen = self.sequencer.current_screen().id, "presenting");
                    self.phase = ShellPhase::Presenting;
                }
            }
            ShellPhase::Presenting => {}
        }
        self.phase
    }

    /// The `on_next` every non-terminal screen receives.
    pub fn on_next(&mut self) -> Result<usize, NavigationError> {
        if !self.is_presenting() {
            tracing::warn!("on_next before the flow is mounted");
        }
        self.sequencer.advance()
    }

    /// Drops the low-fps watcher and releases preloaded audio.
    pub fn teardown(&mut self) {
        if let Some(sub) = self.low_fps_watch.take() {
            sub.unsubscribe();
        }
        self.preload.teardown();
    }
}
