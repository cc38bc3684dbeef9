//! Linear screen flow.
//!
//! Screens never see the sequencer itself, only an `on_next` callback. The
//! last screen has no `on_next` and owns its own completion.

use crate::error::NavigationError;

/// Which controller/renderer a screen uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    Welcome,
    Photos,
    Wishes,
    Memories,
    Letter,
    Surprise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub id: &'static str,
    pub kind: ScreenKind,
}

impl Screen {
    pub const fn new(id: &'static str, kind: ScreenKind) -> Self {
        Self { id, kind }
    }
}

/// Default flow: welcome, photos, wishes, memories, prize-wheel letter, scratch-card surprise.
pub fn default_screens() -> Vec<Screen> {
    vec![
        Screen::new("welcome", ScreenKind::Welcome),
        Screen::new("photos", ScreenKind::Photos),
        Screen::new("wishes", ScreenKind::Wishes),
        Screen::new("memories", ScreenKind::Memories),
        Screen::new("letter", ScreenKind::Letter),
        Screen::new("surprise", ScreenKind::Surprise),
    ]
}

#[derive(Clone, Debug)]
pub struct NavigationSequencer {
    screens: Vec<Screen>,
    current: usize,
}

impl NavigationSequencer {
    /// Starts at index 0. An empty list is not a valid flow and yields `None`.
    pub fn new(screens: Vec<Screen>) -> Option<Self> {
        if screens.is_empty() {
            return None;
        }
        Some(Self { screens, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_screen(&self) -> &Screen {
        &self.screens[self.current]
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.screens.len()
    }

    /// Moves to the next screen. At the last screen the index is left alone.
    pub fn advance(&mut self) -> Result<usize, NavigationError> {
        if self.is_last() {
            return Err(NavigationError::AtLastScreen);
        }
        self.current += 1;
        tracing::debug!(screen = self.screens[self.current].id, index = self.current, "advance");
        Ok(self.current)
    }

    pub fn go_to(&mut self, index: usize) -> Result<usize, NavigationError> {
        if index >= self.screens.len() {
            return Err(NavigationError::OutOfRange { index, len: self.screens.len() });
        }
        self.current = index;
        tracing::debug!(screen = self.screens[index].id, index, "go_to");
        Ok(index)
    }
}
