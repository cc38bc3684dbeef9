//! Per-screen interaction state.
//!
//! Each screen's local UI state is a small controller with explicit
//! transitions. Timers live in the web layer; controllers only receive
//! `tick`/`next` calls, so they run under plain `cargo test`.

use crate::error::GalleryError;

pub mod content;

pub use content::{LOADING_MESSAGES, MEMORIES, PHOTOS, RECIPIENT_NAME, WISHES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Photo {
    pub src: &'static str,
    pub caption: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wish {
    pub text: &'static str,
    pub from: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Memory {
    pub image: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
}

/// Returned by controllers whose last step hands control back to the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Stepped(usize),
    Finished,
}

// --- Loading indicator --------------------------------------------------------

pub const LOADING_TICK_MS: u32 = 30;

/// Cosmetic progress shown while assets load: a steady ticker, never behind
/// the real batch progress.
#[derive(Clone, Debug, Default)]
pub struct LoadingIndicator {
    ticker: u32,
    real: u32,
}

impl LoadingIndicator {
    /// One ticker step (every `LOADING_TICK_MS`).
    pub fn tick(&mut self) {
        self.ticker = (self.ticker + 1).min(100);
    }

    /// Feeds real batch progress in `[0, 1]`.
    pub fn set_real_progress(&mut self, fraction: f64) {
        self.real = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
    }

    pub fn percent(&self) -> u32 {
        self.ticker.max(self.real)
    }

    pub fn message(&self) -> &'static str {
        let n = LOADING_MESSAGES.len();
        let idx = (self.percent() as usize * n / 100).min(n - 1);
        LOADING_MESSAGES[idx]
    }
}

// --- Welcome ------------------------------------------------------------------

pub const TYPEWRITER_TICK_MS: u32 = 200;

/// Reveals a name one character per tick, then shows the continue button.
#[derive(Clone, Debug)]
pub struct Typewriter {
    target: Vec<char>,
    shown: usize,
    done: bool,
}

impl Typewriter {
    pub fn new(target: &str) -> Self {
        Self { target: target.chars().collect(), shown: 0, done: false }
    }

    /// Returns true while more ticks are needed.
    pub fn tick(&mut self) -> bool {
        if self.shown < self.target.len() {
            self.shown += 1;
        } else {
            self.done = true;
        }
        !self.done
    }

    pub fn visible(&self) -> String {
        self.target[..self.shown].iter().collect()
    }

    pub fn show_button(&self) -> bool {
        self.done
    }
}

// --- Photos -------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct PhotoGallery {
    photos: Vec<Photo>,
    selected: Option<usize>,
}

impl PhotoGallery {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos, selected: None }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn selected(&self) -> Option<&Photo> {
        self.selected.and_then(|i| self.photos.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<(), GalleryError> {
        if index >= self.photos.len() {
            return Err(GalleryError { index, len: self.photos.len() });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

// --- Wishes -------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct WishesStepper {
    wishes: Vec<Wish>,
    current: usize,
}

impl WishesStepper {
    pub fn new(wishes: Vec<Wish>) -> Self {
        Self { wishes, current: 0 }
    }

    pub fn current(&self) -> Option<&Wish> {
        self.wishes.get(self.current)
    }

    /// Shows the next wish; on the last one the screen is done.
    pub fn next(&mut self) -> StepOutcome {
        if self.current + 1 < self.wishes.len() {
            self.current += 1;
            StepOutcome::Stepped(self.current)
        } else {
            StepOutcome::Finished
        }
    }
}

// --- Memories -----------------------------------------------------------------

pub const SLIDESHOW_INTERVAL_MS: u32 = 3000;

/// What the host should do with the memories track after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackCommand {
    Play,
    Pause,
}

#[derive(Clone, Debug)]
pub struct MemorySlideshow {
    memories: Vec<Memory>,
    current: usize,
    playing: bool,
}

impl MemorySlideshow {
    pub fn new(memories: Vec<Memory>) -> Self {
        Self { memories, current: 0, playing: false }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Memory> {
        self.memories.get(self.current)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_play(&mut self) -> TrackCommand {
        self.playing = !self.playing;
        if self.playing { TrackCommand::Play } else { TrackCommand::Pause }
    }

    /// Manual selection (dot navigation).
    pub fn show(&mut self, index: usize) -> bool {
        if index < self.memories.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Auto-advance tick (every `SLIDESHOW_INTERVAL_MS` while playing).
    /// Returns true when the slide changed. At the last memory playback
    /// stops; the track is left as is.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        if self.current + 1 >= self.memories.len() {
            self.playing = false;
            return false;
        }
        self.current += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_messages_rotate_and_clamp() {
        let mut l = LoadingIndicator::default();
        assert_eq!(l.message(), LOADING_MESSAGES[0]);
        for _ in 0..150 {
            l.tick();
        }
        assert_eq!(l.percent(), 100);
        assert_eq!(l.message(), LOADING_MESSAGES[4]);
    }

    #[test]
    fn loading_follows_real_progress() {
        let mut l = LoadingIndicator::default();
        l.tick();
        l.set_real_progress(0.5);
        assert_eq!(l.percent(), 50);
        assert_eq!(l.message(), LOADING_MESSAGES[2]);
    }

    #[test]
    fn typewriter_counts_chars_not_bytes() {
        let mut t = Typewriter::new("小美");
        assert!(t.tick());
        assert_eq!(t.visible(), "小");
        assert!(t.tick());
        assert!(!t.show_button());
        assert!(!t.tick());
        assert!(t.show_button());
        assert_eq!(t.visible(), "小美");
    }

    #[test]
    fn gallery_selection() {
        let mut g = PhotoGallery::new(PHOTOS.to_vec());
        assert!(g.select(3).is_err());
        g.select(1).unwrap();
        assert_eq!(g.selected().unwrap().src, "/images/photo2.jpg");
        g.close();
        assert!(g.selected().is_none());
    }

    #[test]
    fn wishes_finish_on_last() {
        let mut w = WishesStepper::new(WISHES.to_vec());
        assert_eq!(w.next(), StepOutcome::Stepped(1));
        assert_eq!(w.next(), StepOutcome::Stepped(2));
        assert_eq!(w.next(), StepOutcome::Finished);
        assert_eq!(w.current().unwrap().text, WISHES[2].text);
    }

    #[test]
    fn slideshow_stops_at_end() {
        let mut s = MemorySlideshow::new(MEMORIES.to_vec());
        assert!(!s.tick());
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.toggle_play(), TrackCommand::Play);
        assert!(s.tick());
        assert!(s.tick());
        assert_eq!(s.current_index(), 2);
        assert!(s.is_playing());
        assert!(!s.tick());
        assert!(!s.is_playing());
        assert_eq!(s.current_index(), 2);
        assert_eq!(s.toggle_play(), TrackCommand::Play);
    }
}
