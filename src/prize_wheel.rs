//! Prize-wheel ("lucky grid") spin used on the letter screen.
//!
//! The highlight walks the 3x3 prize grid one cell per step. Steps are driven
//! by a repeated delayed task owned by the host: every `step()` returns the
//! delay before the next one. The first `total_steps * slowdown_after` steps
//! run at `start_interval_ms`; afterwards each step adds
//! `slowdown_increment_ms`. The starting cell is chosen so the walk ends on the
//! drawn prize.

use crate::error::SpinError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prize {
    pub name: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_PRIZES: [Prize; 9] = [
    Prize { name: "Romantic dinner", icon: "🍽️" },
    Prize { name: "Movie date", icon: "🎬" },
    Prize { name: "Shopping spree", icon: "🛍️" },
    Prize { name: "Trip planning", icon: "✈️" },
    Prize { name: "Surprise gift", icon: "🎁" },
    Prize { name: "Hot spring getaway", icon: "♨️" },
    Prize { name: "Theme park date", icon: "🎡" },
    Prize { name: "Baking class", icon: "🧁" },
    Prize { name: "Flower workshop", icon: "💐" },
];

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SpinSchedule {
    pub total_steps: u32,
    pub start_interval_ms: u32,
    pub slowdown_increment_ms: u32,
    /// Fraction of `total_steps` after which every step slows down.
    pub slowdown_after: f64,
}

impl Default for SpinSchedule {
    fn default() -> Self {
        Self { total_steps: 30, start_interval_ms: 50, slowdown_increment_ms: 20, slowdown_after: 0.7 }
    }
}

impl SpinSchedule {
    /// Delay scheduled after step `count` (1-based).
    pub fn delay_after(&self, count: u32) -> u32 {
        let threshold = self.total_steps as f64 * self.slowdown_after;
        // number of steps so far that were past the slowdown point
        let slowed = (1..=count).filter(|&c| c as f64 > threshold).count() as u32;
        self.start_interval_ms + slowed * self.slowdown_increment_ms
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinStep {
    /// `highlighted` is now lit; call `step()` again after `next_delay_ms`.
    Continue { highlighted: usize, next_delay_ms: u32 },
    /// Walk finished on `prize`.
    Finished { prize: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WheelState {
    Idle,
    Spinning { cursor: usize, count: u32, interval: u32 },
    Finished { prize: usize },
}

#[derive(Clone, Debug)]
pub struct PrizeWheel {
    prizes: Vec<Prize>,
    schedule: SpinSchedule,
    state: WheelState,
    highlighted: Option<usize>,
}

impl PrizeWheel {
    pub fn new(prizes: Vec<Prize>, schedule: SpinSchedule) -> Self {
        Self { prizes, schedule, state: WheelState::Idle, highlighted: None }
    }

    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, WheelState::Spinning { .. })
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Prize index once a spin has finished.
    pub fn result(&self) -> Option<usize> {
        match self.state {
            WheelState::Finished { prize } => Some(prize),
            _ => None,
        }
    }

    pub fn result_prize(&self) -> Option<&Prize> {
        self.result().and_then(|i| self.prizes.get(i))
    }

    /// Starts a spin that ends on `final_index`. The host should call
    /// `step()` right away; the first step has no delay.
    pub fn spin(&mut self, final_index: usize) -> Result<(), SpinError> {
        let len = self.prizes.len();
        if len == 0 {
            return Err(SpinError::NoPrizes);
        }
        if final_index >= len {
            return Err(SpinError::InvalidPrize { index: final_index, len });
        }
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        let walk = self.schedule.total_steps.saturating_sub(1) as usize % len;
        let cursor = (final_index + len - walk) % len;
        self.state = WheelState::Spinning { cursor, count: 0, interval: self.schedule.start_interval_ms };
        tracing::debug!(final_index, start = cursor, "prize wheel spin");
        Ok(())
    }

    /// Advances one step. Outside a spin this reports the last result (or
    /// `Finished` on the current highlight if nothing ever ran).
    pub fn step(&mut self) -> SpinStep {
        let WheelState::Spinning { cursor, count, interval } = self.state else {
            return SpinStep::Finished { prize: self.result().or(self.highlighted).unwrap_or(0) };
        };
        if count >= self.schedule.total_steps {
            // zero-step schedules end where they started
            let prize = if count == 0 { cursor } else { self.highlighted.unwrap_or(cursor) };
            self.state = WheelState::Finished { prize };
            self.highlighted = Some(prize);
            tracing::info!(prize = self.prizes[prize].name, "prize wheel stopped");
            return SpinStep::Finished { prize };
        }
        let len = self.prizes.len();
        self.highlighted = Some(cursor);
        let count = count + 1;
        let mut interval = interval;
        if count as f64 > self.schedule.total_steps as f64 * self.schedule.slowdown_after {
            interval += self.schedule.slowdown_increment_ms;
        }
        self.state = WheelState::Spinning { cursor: (cursor + 1) % len, count, interval };
        SpinStep::Continue { highlighted: cursor, next_delay_ms: interval }
    }

    /// Stops a spin early (screen unmounted). Keeps the last highlight.
    pub fn cancel(&mut self) {
        if self.is_spinning() {
            self.state = WheelState::Idle;
        }
    }
}

/// Draws a prize index in `0..len`.
///
/// With the `rng` feature this uses `getrandom`; otherwise (or if the source
/// errors) it falls back to an LCG over `seed`, typically `performance.now()`.
pub fn draw_prize_index(len: usize, seed: f64) -> usize {
    if len == 0 {
        return 0;
    }
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 4];
        if getrandom::getrandom(&mut buf).is_ok() {
            return u32::from_le_bytes(buf) as usize % len;
        }
        tracing::debug!("getrandom unavailable, falling back to lcg");
    }
    (seed as u64 as usize).wrapping_mul(1664525).wrapping_add(1013904223) % len
}
