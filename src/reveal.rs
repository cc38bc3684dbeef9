//! Scratch-card reveal interaction.
//!
//! [`RevealMask`] is a fixed grid of revealed/hidden cells with a running
//! revealed counter, so the revealed fraction is O(1) after every stroke.
//! [`RevealInteraction`] wraps it in the `Hidden -> Revealing -> Revealed`
//! state machine and only accepts strokes between `begin_gesture` and
//! `end_gesture`.

/// Fraction that must be exceeded (strictly) before the card counts as revealed.
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct RevealMask {
    width: u32,
    height: u32,
    /// Canvas pixels per mask cell (square cells).
    cell_size: u32,
    cells: Vec<bool>,
    revealed: usize,
}

impl RevealMask {
    /// Mask covering a `canvas_width` x `canvas_height` pixel area. Partial
    /// cells at the right/bottom edge are kept.
    pub fn new(canvas_width: u32, canvas_height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let width = canvas_width.div_ceil(cell_size);
        let height = canvas_height.div_ceil(cell_size);
        Self {
            width,
            height,
            cell_size,
            cells: vec![false; width as usize * height as usize],
            revealed: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn revealed_cells(&self) -> usize {
        self.revealed
    }

    pub fn is_revealed(&self, cx: u32, cy: u32) -> bool {
        cx < self.width && cy < self.height && self.cells[(cy * self.width + cx) as usize]
    }

    pub fn revealed_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.revealed as f64 / self.cells.len() as f64
    }

    /// Marks every cell whose centre lies within `radius` pixels of `(x, y)`.
    /// Returns the number of cells that flipped from hidden to revealed.
    pub fn reveal(&mut self, x: f64, y: f64, radius: f64) -> usize {
        if self.cells.is_empty() || radius.is_nan() || radius < 0.0 || !x.is_finite() || !y.is_finite() {
            return 0;
        }
        let cs = self.cell_size as f64;
        let r2 = radius * radius;
        // bounding box in cell coordinates, clipped to the grid
        let min_cx = (((x - radius) / cs).floor().max(0.0)) as u32;
        let min_cy = (((y - radius) / cs).floor().max(0.0)) as u32;
        let max_cx = ((x + radius) / cs).floor().min(self.width as f64 - 1.0);
        let max_cy = ((y + radius) / cs).floor().min(self.height as f64 - 1.0);
        if max_cx < 0.0 || max_cy < 0.0 {
            return 0;
        }
        let (max_cx, max_cy) = (max_cx as u32, max_cy as u32);

        let mut flipped = 0;
        for cy in min_cy..=max_cy {
            let py = (cy as f64 + 0.5) * cs - y;
            for cx in min_cx..=max_cx {
                let px = (cx as f64 + 0.5) * cs - x;
                if px * px + py * py > r2 {
                    continue;
                }
                let idx = (cy * self.width + cx) as usize;
                if !self.cells[idx] {
                    self.cells[idx] = true;
                    flipped += 1;
                }
            }
        }
        self.revealed += flipped;
        flipped
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealing,
    Revealed,
}

/// Result of one `reveal` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealOutcome {
    /// Outside a gesture, or the card is already revealed.
    Ignored,
    /// Stroke applied; carries the new revealed fraction.
    Progress(f64),
    /// This stroke crossed the threshold. Returned exactly once per interaction.
    JustRevealed,
}

#[derive(Clone, Debug)]
pub struct RevealInteraction {
    mask: RevealMask,
    state: RevealState,
    threshold: f64,
    gesture_active: bool,
    latched: bool,
}

impl RevealInteraction {
    pub fn new(mask: RevealMask) -> Self {
        Self::with_threshold(mask, DEFAULT_REVEAL_THRESHOLD)
    }

    pub fn with_threshold(mask: RevealMask, threshold: f64) -> Self {
        Self {
            mask,
            state: RevealState::Hidden,
            threshold: threshold.clamp(0.0, 1.0),
            gesture_active: false,
            latched: false,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn mask(&self) -> &RevealMask {
        &self.mask
    }

    pub fn revealed_fraction(&self) -> f64 {
        self.mask.revealed_fraction()
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// Pointer down / touch start.
    pub fn begin_gesture(&mut self) {
        if self.state != RevealState::Revealed {
            self.gesture_active = true;
        }
    }

    /// Pointer up / touch end / pointer leaving the card.
    pub fn end_gesture(&mut self) {
        self.gesture_active = false;
    }

    pub fn reveal(&mut self, x: f64, y: f64, radius: f64) -> RevealOutcome {
        if !self.gesture_active || self.state == RevealState::Revealed {
            return RevealOutcome::Ignored;
        }
        if self.mask.reveal(x, y, radius) > 0 && self.state == RevealState::Hidden {
            self.state = RevealState::Revealing;
        }
        let fraction = self.mask.revealed_fraction();
        if fraction > self.threshold && !self.latched {
            self.latched = true;
            self.state = RevealState::Revealed;
            self.gesture_active = false;
            tracing::info!(fraction, "scratch card revealed");
            return RevealOutcome::JustRevealed;
        }
        RevealOutcome::Progress(fraction)
    }
}

/// Pointer edge recorded by an input handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEdge {
    Down,
    /// Release, carrying the last position seen while the pointer was down.
    Up(Option<(f64, f64)>),
}

/// Pointer input gathered between two frames.
///
/// Handlers record edges and the latest position; [`PointerInput::drain`]
/// replays them once per frame. Moves are coalesced, but a position is only
/// stroked inside the gesture it was recorded in.
#[derive(Clone, Debug, Default)]
pub struct PointerInput {
    edges: Vec<PointerEdge>,
    latest: Option<(f64, f64)>,
}

impl PointerInput {
    pub fn press(&mut self, at: Option<(f64, f64)>) {
        self.edges.push(PointerEdge::Down);
        self.latest = at;
    }

    pub fn moved(&mut self, at: Option<(f64, f64)>) {
        self.latest = at;
    }

    pub fn release(&mut self) {
        let at = self.latest.take();
        self.edges.push(PointerEdge::Up(at));
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.latest.is_none()
    }

    /// Replays the recorded input into `interaction`. `paint` is called for
    /// every stroke the mask accepted. Returns `JustRevealed` if any stroke
    /// crossed the threshold, else the last accepted outcome.
    pub fn drain(
        &mut self,
        interaction: &mut RevealInteraction,
        radius: f64,
        mut paint: impl FnMut(f64, f64),
    ) -> RevealOutcome {
        let mut result = RevealOutcome::Ignored;
        let mut stroke = |interaction: &mut RevealInteraction, (x, y): (f64, f64)| {
            let outcome = interaction.reveal(x, y, radius);
            if outcome != RevealOutcome::Ignored {
                paint(x, y);
                if result != RevealOutcome::JustRevealed {
                    result = outcome;
                }
            }
        };
        for edge in std::mem::take(&mut self.edges) {
            match edge {
                PointerEdge::Down => interaction.begin_gesture(),
                PointerEdge::Up(at) => {
                    // a stroke recorded before release still counts
                    if let Some(at) = at {
                        stroke(interaction, at);
                    }
                    interaction.end_gesture();
                }
            }
        }
        if let Some(at) = self.latest.take() {
            stroke(interaction, at);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strokes_outside_gesture_are_ignored() {
        let mut ri = RevealInteraction::new(RevealMask::new(10, 10, 1));
        assert_eq!(ri.reveal(5.0, 5.0, 3.0), RevealOutcome::Ignored);
        assert_eq!(ri.state(), RevealState::Hidden);
        ri.begin_gesture();
        assert!(matches!(ri.reveal(5.0, 5.0, 3.0), RevealOutcome::Progress(_)));
        assert_eq!(ri.state(), RevealState::Revealing);
        ri.end_gesture();
        let before = ri.revealed_fraction();
        assert_eq!(ri.reveal(1.0, 1.0, 3.0), RevealOutcome::Ignored);
        assert_eq!(ri.revealed_fraction(), before);
    }

    #[test]
    fn clipped_at_corner() {
        let mut m = RevealMask::new(10, 10, 1);
        let n = m.reveal(0.0, 0.0, 2.0);
        // centres (0.5,0.5), (1.5,0.5), (0.5,1.5); (1.5,1.5) is just outside
        assert_eq!(n, 3);
        assert!(m.is_revealed(0, 0));
        assert!(!m.is_revealed(1, 1));
        assert!(!m.is_revealed(3, 3));
    }

    #[test]
    fn stroke_fully_outside_does_nothing() {
        let mut m = RevealMask::new(10, 10, 1);
        assert_eq!(m.reveal(-50.0, -50.0, 5.0), 0);
        assert_eq!(m.reveal(500.0, 5.0, 5.0), 0);
        assert_eq!(m.revealed_cells(), 0);
    }

    #[test]
    fn coarse_cells() {
        let m = RevealMask::new(401, 300, 4);
        assert_eq!(m.width(), 101);
        assert_eq!(m.height(), 75);
    }

    #[test]
    fn full_reveal_latches_once() {
        let mut ri = RevealInteraction::new(RevealMask::new(4, 4, 1));
        ri.begin_gesture();
        assert_eq!(ri.reveal(2.0, 2.0, 10.0), RevealOutcome::JustRevealed);
        assert_eq!(ri.state(), RevealState::Revealed);
        ri.begin_gesture();
        assert_eq!(ri.reveal(2.0, 2.0, 10.0), RevealOutcome::Ignored);
        assert!(!ri.gesture_active());
    }

    #[test]
    fn tap_within_one_frame_strokes_the_press_point() {
        let mut ri = RevealInteraction::new(RevealMask::new(100, 100, 1));
        let mut input = PointerInput::default();
        input.press(Some((20.0, 20.0)));
        input.release();
        let mut painted = Vec::new();
        let outcome = input.drain(&mut ri, 5.0, |x, y| painted.push((x, y)));
        assert!(matches!(outcome, RevealOutcome::Progress(_)));
        assert_eq!(painted, vec![(20.0, 20.0)]);
        assert!(!ri.gesture_active());
        assert!(input.is_empty());
    }
}
