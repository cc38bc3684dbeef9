//! Browser glue: entry points, frame loop and DOM rendering.
//!
//! One `App` lives in a thread-local. Everything that mutates it runs inside
//! the `requestAnimationFrame` callback: DOM handlers push [`Action`]s onto a
//! queue, the frame drains it, ticks the shell and the mounted screen, and
//! re-renders.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{window, Document, Element, HtmlAudioElement};

#[cfg(feature = "serde_json")]
use crate::config::AssetManifest;
use crate::config::ExperienceConfig;
use crate::device;
use crate::perf::PerformanceMonitor;
use crate::screens::{LoadingIndicator, LOADING_TICK_MS};
use crate::sequencer::default_screens;
use crate::shell::{AppShell, ShellPhase};
use crate::timing::Ticker;

mod confetti;
mod dom;
mod loader;
mod metrics;
mod scratch;
mod timer;
mod view;

use confetti::Confetti;
use dom::{now_ms, ActionQueue};
use loader::{play_track, release_track, track, BrowserLoader};
use metrics::BrowserMetrics;
use view::{ScreenView, ViewEffect};

const DEFAULT_ROOT_ID: &str = "app";
const BACKGROUND_VOLUME: f64 = 0.5;

/// User intent recorded by DOM handlers, applied on the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Next,
    SelectPhoto(usize),
    ClosePhoto,
    NextWish,
    TogglePlay,
    ShowMemory(usize),
    Spin,
    OpenBox,
}

struct App {
    doc: Document,
    root: Element,
    shell: AppShell<BrowserLoader>,
    queue: ActionQueue,
    loading: LoadingIndicator,
    loading_ticker: Ticker,
    shown_percent: Option<u32>,
    view: Option<ScreenView>,
    background: Option<HtmlAudioElement>,
    music_started: bool,
    confetti: Option<Confetti>,
    /// Frame loop that owns this app; stale loops stop when it changes.
    loop_id: u32,
}

impl App {
    fn frame(&mut self, now: f64) {
        self.shell.monitor().on_frame(now);
        let was_presenting = self.shell.is_presenting();
        match self.shell.tick(now) {
            ShellPhase::Loading | ShellPhase::Settled { .. } => self.render_loading(now),
            ShellPhase::Presenting => {
                if !was_presenting {
                    self.shell.monitor().log_metrics();
                }
                if self.view.is_none() {
                    self.mount_current(now);
                }
            }
        }

        let actions: Vec<Action> = self.queue.borrow_mut().drain(..).collect();
        for action in actions {
            if !self.music_started {
                // autoplay policies need a user gesture first
                self.music_started = true;
                if let Some(audio) = &self.background {
                    play_track(audio);
                }
            }
            let effect = match self.view.as_mut() {
                Some(view) => view.apply(action, now),
                None => ViewEffect::None,
            };
            self.handle(effect, now);
        }

        if let Some(view) = self.view.as_mut() {
            let effect = view.tick(now);
            self.handle(effect, now);
        }
        if let Some(view) = self.view.as_mut() {
            if let Err(err) = view.render_if_dirty() {
                tracing::error!(?err, screen = view.screen().id, "render failed");
            }
        }
        if let Some(c) = self.confetti.as_mut() {
            if !c.tick(now) {
                self.confetti = None;
            }
        }
    }

    fn handle(&mut self, effect: ViewEffect, now: f64) {
        match effect {
            ViewEffect::None => {}
            ViewEffect::Next => match self.shell.on_next() {
                Ok(index) => {
                    tracing::info!(index, "next screen");
                    if let Some(old) = self.view.take() {
                        old.unmount();
                    }
                    self.mount_current(now);
                }
                Err(err) => tracing::warn!(%err, "navigation rejected"),
            },
            ViewEffect::Celebrate => match Confetti::burst(&self.doc, now) {
                Ok(c) => self.confetti = Some(c),
                Err(err) => tracing::warn!(?err, "confetti unavailable"),
            },
        }
    }

    fn mount_current(&mut self, now: f64) {
        let seq = self.shell.sequencer();
        let screen = *seq.current_screen();
        let is_last = seq.is_last();
        self.view = Some(ScreenView::mount(&self.doc, &self.root, &self.queue, screen, is_last, self.shell.config(), now));
    }

    fn render_loading(&mut self, now: f64) {
        if self.loading_ticker.poll(now) {
            self.loading.tick();
        }
        self.loading.set_real_progress(self.shell.preload().progress());
        let percent = self.loading.percent();
        if self.shown_percent == Some(percent) {
            return;
        }
        self.shown_percent = Some(percent);
        self.root.set_inner_html(&format!(
            r#"<section class="sj-loading"><div class="sj-bar"><div class="sj-fill" style="width:{percent}%"></div></div><p class="sj-percent">{percent}%</p><p class="sj-message">{}</p></section>"#,
            dom::escape(self.loading.message())
        ));
    }

    fn teardown(mut self) {
        if let Some(view) = self.view.take() {
            view.unmount();
        }
        if let Some(audio) = &self.background {
            release_track(audio);
        }
        self.shell.teardown();
        self.root.set_inner_html("");
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static NEXT_LOOP_ID: Cell<u32> = const { Cell::new(0) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

// The callback keeps itself alive through `f`; once its app is gone (or
// replaced) it simply stops re-arming.
fn start_frame_loop(loop_id: u32) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let running = APP.with(|cell| match cell.borrow_mut().as_mut() {
            Some(app) if app.loop_id == loop_id => {
                app.frame(ts);
                true
            }
            _ => false,
        });
        if !running {
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn resolve_root(doc: &Document, id: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_id(id);
    doc.body().ok_or_else(|| JsValue::from_str("no body"))?.append_child(&el)?;
    Ok(el)
}

fn build_config(manifest_json: Option<String>) -> Result<ExperienceConfig, JsValue> {
    let config = ExperienceConfig::default();
    let Some(json) = manifest_json else {
        return Ok(config);
    };
    #[cfg(feature = "serde_json")]
    {
        let manifest = AssetManifest::from_json(&json)?;
        Ok(config.with_manifest(manifest))
    }
    #[cfg(not(feature = "serde_json"))]
    {
        let _ = json;
        tracing::warn!("built without serde_json; manifest ignored");
        Ok(config)
    }
}

/// Mounts the experience into `#root_id` (default `app`, created when
/// missing). `manifest_json` replaces the default asset list. Calling this
/// again tears the previous instance down first.
#[wasm_bindgen]
pub fn start_experience(root_id: Option<String>, manifest_json: Option<String>) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let root = resolve_root(&doc, root_id.as_deref().unwrap_or(DEFAULT_ROOT_ID))?;
    let config = build_config(manifest_json)?;

    stop_experience();

    let loop_id = NEXT_LOOP_ID.with(|n| {
        n.set(n.get().wrapping_add(1));
        n.get()
    });
    let now = now_ms();
    let monitor = Rc::new(PerformanceMonitor::new(Box::new(BrowserMetrics), now));
    let loader = Rc::new(BrowserLoader::new(config.preload.timeout_ms));
    let background = config.background_track.as_deref().and_then(|uri| match track(uri, BACKGROUND_VOLUME) {
        Ok(audio) => Some(audio),
        Err(err) => {
            tracing::warn!(uri, ?err, "background track unavailable");
            None
        }
    });
    let (shell, driver) = AppShell::new(config, loader, monitor, device::snapshot(), default_screens())
        .ok_or_else(|| JsValue::from_str("no screens configured"))?;
    wasm_bindgen_futures::spawn_local(driver);

    let app = App {
        doc,
        root,
        shell,
        queue: Rc::new(RefCell::new(Vec::new())),
        loading: LoadingIndicator::default(),
        loading_ticker: Ticker::new(LOADING_TICK_MS as f64, now),
        shown_percent: None,
        view: None,
        background,
        music_started: false,
        confetti: None,
        loop_id,
    };
    APP.with(|cell| cell.replace(Some(app)));
    start_frame_loop(loop_id);
    tracing::info!("experience started");
    Ok(())
}

/// Tears the running experience down: timers, listeners, the low-fps watcher
/// and preloaded audio. No-op when nothing is running.
#[wasm_bindgen]
pub fn stop_experience() {
    if let Some(app) = APP.with(|cell| cell.borrow_mut().take()) {
        app.teardown();
        tracing::info!("experience stopped");
    }
}

/// Current device snapshot as JSON.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn device_snapshot_json() -> Result<String, JsValue> {
    serde_json::to_string(&device::snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
}
