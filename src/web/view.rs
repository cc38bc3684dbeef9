//! Mounted screen: controller state, frame timers and the DOM it renders.
//!
//! Rendering replaces the root's markup and rewires click listeners, so it
//! only happens from the frame loop (never inside a handler). The surprise
//! screen is the exception once its scratch canvas is attached: after that it
//! is patched in place, since a re-render would wipe the canvas.

use std::fmt::Write as _;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement};

use crate::config::{ExperienceConfig, RevealConfig};
use crate::prize_wheel::{draw_prize_index, PrizeWheel, SpinStep, DEFAULT_PRIZES};
use crate::reveal::RevealOutcome;
use crate::screens::content::{
    SCRATCH_PROMPT, SURPRISE_BODY, SURPRISE_FOOTER, SURPRISE_IMAGE, SURPRISE_REVEALED_HEADING, SURPRISE_TITLE,
};
use crate::screens::{
    MemorySlideshow, PhotoGallery, StepOutcome, TrackCommand, Typewriter, WishesStepper, MEMORIES, PHOTOS, RECIPIENT_NAME,
    SLIDESHOW_INTERVAL_MS, TYPEWRITER_TICK_MS, WISHES,
};
use crate::sequencer::{Screen, ScreenKind};
use crate::timing::{Deadline, Ticker};

use super::dom::{escape, on_click, ActionQueue, Listener};
use super::loader::{play_track, release_track, track};
use super::scratch::ScratchCard;
use super::Action;

const GIFT_OPEN_DELAY_MS: f64 = 1000.0;
const SCRATCH_CANVAS_ID: &str = "sj-scratch";
const FOOTER_ID: &str = "sj-surprise-footer";
const HEADING_ID: &str = "sj-surprise-heading";
const MEMORIES_VOLUME: f64 = 0.3;

/// What the app must do after a view handled an action or a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ViewEffect {
    None,
    Next,
    Celebrate,
}

enum ScreenState {
    Welcome {
        writer: Typewriter,
        ticker: Ticker,
    },
    Photos(PhotoGallery),
    Wishes(WishesStepper),
    Memories {
        slides: MemorySlideshow,
        ticker: Ticker,
        track: Option<HtmlAudioElement>,
    },
    Letter {
        wheel: PrizeWheel,
        next_step: Deadline,
    },
    Surprise {
        opening: bool,
        open_at: Deadline,
        card: Option<ScratchCard>,
        revealed: bool,
    },
}

pub(crate) struct ScreenView {
    doc: Document,
    root: Element,
    queue: ActionQueue,
    screen: Screen,
    is_last: bool,
    state: ScreenState,
    reveal_cfg: RevealConfig,
    listeners: Vec<Listener>,
    dirty: bool,
}

fn initial_state(kind: ScreenKind, config: &ExperienceConfig, now: f64) -> ScreenState {
    match kind {
        ScreenKind::Welcome => ScreenState::Welcome {
            writer: Typewriter::new(RECIPIENT_NAME),
            ticker: Ticker::new(TYPEWRITER_TICK_MS as f64, now),
        },
        ScreenKind::Photos => ScreenState::Photos(PhotoGallery::new(PHOTOS.to_vec())),
        ScreenKind::Wishes => ScreenState::Wishes(WishesStepper::new(WISHES.to_vec())),
        ScreenKind::Memories => {
            let track = config.memories_track.as_deref().and_then(|uri| match track(uri, MEMORIES_VOLUME) {
                Ok(audio) => Some(audio),
                Err(err) => {
                    tracing::warn!(uri, ?err, "memories track unavailable");
                    None
                }
            });
            ScreenState::Memories {
                slides: MemorySlideshow::new(MEMORIES.to_vec()),
                ticker: Ticker::new(SLIDESHOW_INTERVAL_MS as f64, now),
                track,
            }
        }
        ScreenKind::Letter => ScreenState::Letter {
            wheel: PrizeWheel::new(DEFAULT_PRIZES.to_vec(), config.spin),
            next_step: Deadline::default(),
        },
        ScreenKind::Surprise => {
            ScreenState::Surprise { opening: false, open_at: Deadline::default(), card: None, revealed: false }
        }
    }
}

impl ScreenView {
    pub fn mount(
        doc: &Document,
        root: &Element,
        queue: &ActionQueue,
        screen: Screen,
        is_last: bool,
        config: &ExperienceConfig,
        now: f64,
    ) -> Self {
        tracing::debug!(screen = screen.id, "mount");
        Self {
            doc: doc.clone(),
            root: root.clone(),
            queue: queue.clone(),
            screen,
            is_last,
            state: initial_state(screen.kind, config, now),
            reveal_cfg: config.reveal.clone(),
            listeners: Vec::new(),
            dirty: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn apply(&mut self, action: Action, now: f64) -> ViewEffect {
        match (&mut self.state, action) {
            (_, Action::Next) if !self.is_last => return ViewEffect::Next,
            (ScreenState::Photos(gallery), Action::SelectPhoto(i)) => {
                if let Err(err) = gallery.select(i) {
                    tracing::warn!(%err, "photo selection rejected");
                }
            }
            (ScreenState::Photos(gallery), Action::ClosePhoto) => gallery.close(),
            (ScreenState::Wishes(stepper), Action::NextWish) => {
                if stepper.next() == StepOutcome::Finished {
                    return ViewEffect::Next;
                }
            }
            (ScreenState::Memories { slides, ticker, track }, Action::TogglePlay) => {
                let cmd = slides.toggle_play();
                ticker.reset(now);
                if let Some(audio) = track {
                    match cmd {
                        TrackCommand::Play => play_track(audio),
                        TrackCommand::Pause => {
                            let _ = audio.pause();
                        }
                    }
                }
            }
            (ScreenState::Memories { slides, ticker, .. }, Action::ShowMemory(i)) => {
                if slides.show(i) {
                    ticker.reset(now);
                }
            }
            (ScreenState::Letter { wheel, next_step }, Action::Spin) => {
                let index = draw_prize_index(wheel.prizes().len(), now);
                match wheel.spin(index) {
                    Ok(()) => next_step.arm(now, 0.0),
                    Err(err) => tracing::debug!(%err, "spin ignored"),
                }
            }
            (ScreenState::Surprise { opening, open_at, .. }, Action::OpenBox) => {
                if !*opening {
                    *opening = true;
                    open_at.arm(now, GIFT_OPEN_DELAY_MS);
                }
            }
            (_, other) => {
                tracing::debug!(?other, screen = self.screen.id, "action not handled here");
                return ViewEffect::None;
            }
        }
        self.dirty = true;
        ViewEffect::None
    }

    /// Polls this screen's timers and input for one frame.
    pub fn tick(&mut self, now: f64) -> ViewEffect {
        match &mut self.state {
            ScreenState::Welcome { writer, ticker } => {
                if !writer.show_button() && ticker.poll(now) {
                    writer.tick();
                    self.dirty = true;
                }
            }
            ScreenState::Memories { slides, ticker, .. } => {
                if slides.is_playing() && ticker.poll(now) {
                    slides.tick();
                    self.dirty = true;
                }
            }
            ScreenState::Letter { wheel, next_step } => {
                if next_step.poll(now) {
                    self.dirty = true;
                    match wheel.step() {
                        SpinStep::Continue { next_delay_ms, .. } => next_step.arm(now, next_delay_ms as f64),
                        SpinStep::Finished { prize } => {
                            tracing::info!(prize, "wheel stopped");
                            return ViewEffect::Celebrate;
                        }
                    }
                }
            }
            ScreenState::Surprise { open_at, card, revealed, .. } => {
                if open_at.poll(now) {
                    self.dirty = true;
                }
                if let (Some(card), false) = (card.as_mut(), *revealed) {
                    if card.tick() == RevealOutcome::JustRevealed {
                        *revealed = true;
                        card.clear();
                        if let Some(heading) = self.doc.get_element_by_id(HEADING_ID) {
                            heading.set_text_content(Some(SURPRISE_REVEALED_HEADING));
                        }
                        if let Some(footer) = self.doc.get_element_by_id(FOOTER_ID) {
                            let _ = footer.set_attribute("class", "sj-footer sj-visible");
                        }
                        return ViewEffect::Celebrate;
                    }
                }
            }
            ScreenState::Photos(_) | ScreenState::Wishes(_) => {}
        }
        ViewEffect::None
    }

    pub fn render_if_dirty(&mut self) -> Result<(), JsValue> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        if let ScreenState::Surprise { card: Some(_), .. } = self.state {
            return Ok(());
        }
        let mut actions: Vec<(String, Action)> = Vec::new();
        let html = self.markup(&mut actions);
        // old listeners belong to elements about to be replaced
        self.listeners.clear();
        self.root.set_inner_html(&html);
        for (id, action) in actions {
            if let Some(l) = on_click(&self.doc, &id, &self.queue, action)? {
                self.listeners.push(l);
            }
        }
        if let ScreenState::Surprise { open_at, opening: true, card, .. } = &mut self.state {
            if !open_at.is_armed() {
                *card = Some(ScratchCard::attach(&self.doc, SCRATCH_CANVAS_ID, &self.reveal_cfg)?);
            }
        }
        Ok(())
    }

    fn markup(&self, actions: &mut Vec<(String, Action)>) -> String {
        let mut html = String::new();
        let next_button = |html: &mut String, label: &str, actions: &mut Vec<(String, Action)>| {
            if !self.is_last {
                let _ = write!(html, r#"<button id="sj-next" class="sj-next">{}</button>"#, escape(label));
                actions.push(("sj-next".into(), Action::Next));
            }
        };
        let _ = write!(html, r#"<section class="sj-screen sj-{}">"#, self.screen.id);
        match &self.state {
            ScreenState::Welcome { writer, .. } => {
                let _ = write!(html, r#"<p class="sj-greeting">Happy birthday</p><h1 class="sj-name">{}</h1>"#, escape(&writer.visible()));
                if writer.show_button() {
                    next_button(&mut html, "Begin the journey", actions);
                }
            }
            ScreenState::Photos(gallery) => {
                html.push_str(r#"<div class="sj-gallery">"#);
                for (i, photo) in gallery.photos().iter().enumerate() {
                    let id = format!("sj-photo-{i}");
                    let _ = write!(
                        html,
                        r#"<figure id="{id}" class="sj-photo"><img src="{}" alt="{}"><figcaption>{}</figcaption></figure>"#,
                        escape(photo.src),
                        escape(photo.caption),
                        escape(photo.caption)
                    );
                    actions.push((id, Action::SelectPhoto(i)));
                }
                html.push_str("</div>");
                if let Some(photo) = gallery.selected() {
                    let _ = write!(
                        html,
                        r#"<div id="sj-lightbox" class="sj-lightbox"><img src="{}" alt="{}"><p>{}</p></div>"#,
                        escape(photo.src),
                        escape(photo.caption),
                        escape(photo.caption)
                    );
                    actions.push(("sj-lightbox".into(), Action::ClosePhoto));
                }
                next_button(&mut html, "Next", actions);
            }
            ScreenState::Wishes(stepper) => {
                if let Some(wish) = stepper.current() {
                    let _ = write!(
                        html,
                        r#"<blockquote class="sj-wish"><p>{}</p><cite>{}</cite></blockquote>"#,
                        escape(wish.text),
                        escape(wish.from)
                    );
                }
                html.push_str(r#"<button id="sj-wish-next" class="sj-next">Next wish</button>"#);
                actions.push(("sj-wish-next".into(), Action::NextWish));
            }
            ScreenState::Memories { slides, .. } => {
                if let Some(memory) = slides.current() {
                    let _ = write!(
                        html,
                        r#"<article class="sj-memory"><img src="{}" alt="{}"><h2>{}</h2><time>{}</time><p>{}</p></article>"#,
                        escape(memory.image),
                        escape(memory.title),
                        escape(memory.title),
                        escape(memory.date),
                        escape(memory.description)
                    );
                }
                html.push_str(r#"<nav class="sj-dots">"#);
                for i in 0..MEMORIES.len() {
                    let id = format!("sj-dot-{i}");
                    let active = if i == slides.current_index() { " sj-active" } else { "" };
                    let _ = write!(html, r#"<span id="{id}" class="sj-dot{active}"></span>"#);
                    actions.push((id, Action::ShowMemory(i)));
                }
                html.push_str("</nav>");
                let label = if slides.is_playing() { "Pause" } else { "Play" };
                let _ = write!(html, r#"<button id="sj-play" class="sj-play">{label}</button>"#);
                actions.push(("sj-play".into(), Action::TogglePlay));
                next_button(&mut html, "Next", actions);
            }
            ScreenState::Letter { wheel, .. } => {
                html.push_str(r#"<h2>Spin for a little gift</h2><div class="sj-wheel">"#);
                for (i, prize) in wheel.prizes().iter().enumerate() {
                    let lit = if wheel.highlighted() == Some(i) { " sj-lit" } else { "" };
                    let _ = write!(
                        html,
                        r#"<div class="sj-prize{lit}"><span>{}</span><small>{}</small></div>"#,
                        escape(prize.icon),
                        escape(prize.name)
                    );
                }
                html.push_str("</div>");
                if let Some(prize) = wheel.result_prize() {
                    let _ = write!(html, r#"<p class="sj-won">You won: {} {}</p>"#, escape(prize.icon), escape(prize.name));
                    next_button(&mut html, "One more surprise", actions);
                } else if !wheel.is_spinning() {
                    html.push_str(r#"<button id="sj-spin" class="sj-spin">Spin</button>"#);
                    actions.push(("sj-spin".into(), Action::Spin));
                }
            }
            ScreenState::Surprise { opening, open_at, .. } => {
                if *opening && !open_at.is_armed() {
                    let _ = write!(
                        html,
                        r#"<h2 id="{HEADING_ID}">{}</h2><div class="sj-card"><div class="sj-card-inner"><h3>{}</h3><p>{}</p><img src="{}" alt=""></div><canvas id="{SCRATCH_CANVAS_ID}" class="sj-scratch"></canvas></div><p id="{FOOTER_ID}" class="sj-footer">{}</p>"#,
                        escape(SCRATCH_PROMPT),
                        escape(SURPRISE_TITLE),
                        escape(SURPRISE_BODY),
                        escape(SURPRISE_IMAGE),
                        escape(SURPRISE_FOOTER)
                    );
                } else {
                    let shaking = if *opening { " sj-opening" } else { "" };
                    let _ = write!(html, r#"<div id="sj-gift" class="sj-gift{shaking}">🎁</div><p>Tap the box</p>"#);
                    actions.push(("sj-gift".into(), Action::OpenBox));
                }
            }
        }
        html.push_str("</section>");
        html
    }

    /// Drops timers and listeners. The memories track is stopped and unloaded.
    pub fn unmount(self) {
        if let ScreenState::Memories { track: Some(audio), .. } = &self.state {
            release_track(audio);
        }
        tracing::debug!(screen = self.screen.id, "unmount");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen_test::*;
    use web_sys::window;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(kind: ScreenKind, config: &ExperienceConfig) -> ScreenView {
        let doc = window().and_then(|w| w.document()).expect("document");
        let root = doc.create_element("div").unwrap();
        doc.body().unwrap().append_child(&root).unwrap();
        let queue: ActionQueue = Rc::new(RefCell::new(Vec::new()));
        ScreenView::mount(&doc, &root, &queue, Screen::new("test", kind), false, config, 0.0)
    }

    #[wasm_bindgen_test]
    fn finished_spin_celebrates_once() {
        let mut view = mount(ScreenKind::Letter, &ExperienceConfig::default());
        assert_eq!(view.apply(Action::Spin, 0.0), ViewEffect::None);
        let mut celebrations = 0;
        let mut now = 0.0;
        while now < 10_000.0 {
            if view.tick(now) == ViewEffect::Celebrate {
                celebrations += 1;
            }
            now += 16.0;
        }
        assert_eq!(celebrations, 1);
    }

    #[wasm_bindgen_test]
    fn unmount_unloads_the_memories_track() {
        let mut view = mount(ScreenKind::Memories, &ExperienceConfig::default());
        let audio = match &view.state {
            ScreenState::Memories { track: Some(audio), .. } => audio.clone(),
            _ => panic!("memories track not created"),
        };
        assert!((audio.volume() - MEMORIES_VOLUME).abs() < 1e-9);
        view.render_if_dirty().unwrap();
        view.unmount();
        assert!(audio.paused());
        assert!(!audio.has_attribute("src"));
    }

    #[wasm_bindgen_test]
    fn opened_gift_shows_the_scratch_prompt_and_clear_hides_the_cover() {
        let mut view = mount(ScreenKind::Surprise, &ExperienceConfig::default());
        view.apply(Action::OpenBox, 0.0);
        view.tick(GIFT_OPEN_DELAY_MS);
        view.render_if_dirty().unwrap();
        let heading = view.doc.get_element_by_id(HEADING_ID).expect("heading rendered");
        assert_eq!(heading.text_content().as_deref(), Some(SCRATCH_PROMPT));

        let ScreenState::Surprise { card: Some(card), .. } = &view.state else {
            panic!("scratch card not attached");
        };
        card.clear();
        let canvas = view.doc.get_element_by_id(SCRATCH_CANVAS_ID).unwrap();
        assert!(canvas.has_attribute("hidden"));
    }
}
